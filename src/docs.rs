//! Service documentation
//!
//! Service adapters describe their API surface as an [`ApiDocInfo`]; the
//! stateless [`ServiceDocBuilder`] turns that into an OpenAPI 3 document
//! rooted under the service instance's name.

use serde::Serialize;
use serde_json::{json, Map, Value};

pub const OPENAPI_VERSION: &str = "3.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Patch => "patch",
            Verb::Delete => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiOperation {
    pub verb: Verb,
    /// Short action name, combined with the service name into an operation id
    pub action: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiPath {
    /// Path relative to the service root, always starting with `/`
    pub path: String,
    pub operations: Vec<ApiOperation>,
}

/// API surface of a live service instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiDocInfo {
    pub description: String,
    pub paths: Vec<ApiPath>,
}

impl ApiDocInfo {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            paths: Vec::new(),
        }
    }

    /// Add a path with its operations, given as `(verb, action, summary)`
    pub fn path(mut self, path: &str, operations: &[(Verb, &str, &str)]) -> Self {
        self.paths.push(ApiPath {
            path: path.to_string(),
            operations: operations
                .iter()
                .map(|(verb, action, summary)| ApiOperation {
                    verb: *verb,
                    action: action.to_string(),
                    summary: summary.to_string(),
                })
                .collect(),
        });
        self
    }

    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|p| p.operations.len()).sum()
    }
}

/// Generated documentation for one service instance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDoc {
    pub service: String,
    pub format: &'static str,
    pub content: Value,
}

/// Stateless formatter for service documentation
#[derive(Debug, Clone, Copy, Default)]
pub struct ServiceDocBuilder;

impl ServiceDocBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build_service_doc(&self, service_name: &str, info: &ApiDocInfo) -> ServiceDoc {
        let service_pascal = pascal_case(service_name);
        let mut paths = Map::new();

        for api_path in &info.paths {
            let full_path = if api_path.path == "/" {
                format!("/{}", service_name)
            } else {
                format!("/{}{}", service_name, api_path.path)
            };

            let mut operations = Map::new();
            for op in &api_path.operations {
                operations.insert(
                    op.verb.as_str().to_string(),
                    json!({
                        "summary": op.summary,
                        "operationId": format!(
                            "{}{}{}",
                            op.verb.as_str(),
                            service_pascal,
                            pascal_case(&op.action)
                        ),
                        "tags": [service_name],
                        "responses": {
                            "200": { "description": "Success" },
                            "default": { "description": "Error" }
                        }
                    }),
                );
            }
            paths.insert(full_path, Value::Object(operations));
        }

        ServiceDoc {
            service: service_name.to_string(),
            format: "openapi",
            content: json!({
                "openapi": OPENAPI_VERSION,
                "info": {
                    "title": service_name,
                    "description": info.description,
                    "version": env!("CARGO_PKG_VERSION"),
                },
                "tags": [{ "name": service_name, "description": info.description }],
                "paths": Value::Object(paths),
            }),
        }
    }
}

/// `aws_s3-files` -> `AwsS3Files`
fn pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}
