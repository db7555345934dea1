//! Configuration handlers for the AWS service types
//!
//! Handlers read a raw JSON object and collect every problem they find into
//! field-level errors rather than stopping at the first one.

use crate::config::AwsDefaults;
use crate::error::ValidationErrors;
use crate::registry::{ConfigField, ConfigHandler, DriverConfig, FieldKind};
use serde_json::{json, Map, Value};
use std::fmt;

pub struct AwsCredentials {
    pub key: String,
    pub secret: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("key", &self.key)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Settings shared by every AWS-backed service
#[derive(Debug)]
pub struct AwsConfig {
    /// `None` means the ambient credential chain of the host
    pub credentials: Option<AwsCredentials>,
    pub region: String,
    pub endpoint: Option<String>,
    pub service_name: Option<String>,
}

#[derive(Debug)]
pub struct AwsS3Config {
    pub aws: AwsConfig,
    pub container: String,
}

#[derive(Debug)]
pub struct RedshiftDbConfig {
    pub driver: DriverConfig,
    pub service_name: Option<String>,
}

pub struct AwsConfigHandler {
    defaults: AwsDefaults,
}

impl AwsConfigHandler {
    pub fn new(defaults: AwsDefaults) -> Self {
        Self { defaults }
    }
}

impl ConfigHandler for AwsConfigHandler {
    type Config = AwsConfig;

    fn validate(&self, raw: &Value) -> Result<AwsConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let obj = as_object(raw, &mut errors);
        let config = read_aws_config(&obj, &self.defaults, &mut errors);
        errors.into_result(config)
    }

    fn fields(&self) -> Vec<ConfigField> {
        aws_fields(&self.defaults)
    }
}

pub struct AwsS3ConfigHandler {
    defaults: AwsDefaults,
}

impl AwsS3ConfigHandler {
    pub fn new(defaults: AwsDefaults) -> Self {
        Self { defaults }
    }
}

impl ConfigHandler for AwsS3ConfigHandler {
    type Config = AwsS3Config;

    fn validate(&self, raw: &Value) -> Result<AwsS3Config, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let obj = as_object(raw, &mut errors);
        let aws = read_aws_config(&obj, &self.defaults, &mut errors);

        // "bucket" is accepted as an alias for "container"
        let recorded = errors.len();
        let container = string_field(&obj, "container", &mut errors)
            .or_else(|| string_field(&obj, "bucket", &mut errors));

        let container = match container {
            Some(name) => {
                if let Err(message) = check_bucket_name(&name) {
                    errors.add("container", message);
                }
                name
            }
            None => {
                // A type error on container or bucket already explains the miss
                if errors.len() == recorded {
                    errors.add("container", "is required");
                }
                String::new()
            }
        };

        errors.into_result(AwsS3Config { aws, container })
    }

    fn fields(&self) -> Vec<ConfigField> {
        let mut fields = aws_fields(&self.defaults);
        fields.push(
            ConfigField::new("container", FieldKind::String, "Container")
                .required()
                .describe("Name of the S3 bucket backing this service. Alias: bucket."),
        );
        fields
    }
}

pub struct RedshiftDbConfigHandler;

impl ConfigHandler for RedshiftDbConfigHandler {
    type Config = RedshiftDbConfig;

    fn validate(&self, raw: &Value) -> Result<RedshiftDbConfig, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut obj = as_object(raw, &mut errors);

        for field in ["host", "database", "username"] {
            let recorded = errors.len();
            match string_field(&obj, field, &mut errors) {
                Some(value) => {
                    obj.insert(field.to_string(), Value::String(value));
                }
                None if errors.len() == recorded => errors.add(field, "is required"),
                None => {}
            }
        }

        match string_field(&obj, "schema", &mut errors) {
            Some(schema) => {
                if let Err(message) = check_identifier(&schema) {
                    errors.add("schema", message);
                }
                obj.insert("schema".to_string(), Value::String(schema));
            }
            None => {
                obj.remove("schema");
            }
        }

        typed_field(&mut obj, "password", Value::is_string, "must be a string", &mut errors);
        typed_field(&mut obj, "prefix", Value::is_string, "must be a string", &mut errors);
        typed_field(&mut obj, "options", Value::is_object, "must be a JSON object", &mut errors);
        integer_field(&mut obj, "port", 1, u16::MAX as u64, &mut errors);
        integer_field(&mut obj, "max_connections", 1, u32::MAX as u64, &mut errors);
        integer_field(&mut obj, "connect_timeout_secs", 0, u32::MAX as u64, &mut errors);

        let service_name = string_field(&obj, "service_name", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        // This service type always speaks the redshift driver
        obj.insert("driver".to_string(), json!(crate::redshift::DRIVER_NAME));

        let driver = DriverConfig::from_value(&Value::Object(obj))
            .map_err(|e| ValidationErrors::single("config", e.to_string()))?;

        Ok(RedshiftDbConfig {
            driver,
            service_name,
        })
    }

    fn fields(&self) -> Vec<ConfigField> {
        vec![
            ConfigField::new("host", FieldKind::String, "Host")
                .required()
                .describe("Cluster endpoint, e.g. examplecluster.abc123.us-west-2.redshift.amazonaws.com"),
            ConfigField::new("port", FieldKind::Integer, "Port").default_value(json!(5439)),
            ConfigField::new("database", FieldKind::String, "Database").required(),
            ConfigField::new("username", FieldKind::String, "Username").required(),
            ConfigField::new("password", FieldKind::Password, "Password"),
            ConfigField::new("schema", FieldKind::String, "Schema").default_value(json!("public")),
            ConfigField::new("prefix", FieldKind::String, "Table Prefix"),
            ConfigField::new("max_connections", FieldKind::Integer, "Max Connections")
                .default_value(json!(10)),
            ConfigField::new("connect_timeout_secs", FieldKind::Integer, "Connect Timeout")
                .default_value(json!(5)),
            ConfigField::new("options", FieldKind::Object, "Driver Options"),
            ConfigField::new("service_name", FieldKind::String, "Service Name"),
        ]
    }
}

fn aws_fields(defaults: &AwsDefaults) -> Vec<ConfigField> {
    vec![
        ConfigField::new("key", FieldKind::String, "Access Key ID")
            .describe("Leave empty to use the host's credential chain."),
        ConfigField::new("secret", FieldKind::Password, "Secret Access Key"),
        ConfigField::new("region", FieldKind::String, "Region")
            .default_value(json!(defaults.region)),
        ConfigField::new("endpoint", FieldKind::String, "Endpoint")
            .describe("Override for S3-compatible or local endpoints."),
        ConfigField::new("service_name", FieldKind::String, "Service Name"),
    ]
}

fn as_object(raw: &Value, errors: &mut ValidationErrors) -> Map<String, Value> {
    match raw {
        Value::Object(obj) => obj.clone(),
        Value::Null => Map::new(),
        _ => {
            errors.add("config", "must be a JSON object");
            Map::new()
        }
    }
}

/// Trimmed, non-empty string value of `name`; non-string values are errors
fn string_field(obj: &Map<String, Value>, name: &str, errors: &mut ValidationErrors) -> Option<String> {
    match obj.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(_) => {
            errors.add(name, "must be a string");
            None
        }
    }
}

/// Type-check an optional field; explicit nulls are dropped so defaults apply
fn typed_field(
    obj: &mut Map<String, Value>,
    name: &str,
    is_type: fn(&Value) -> bool,
    message: &str,
    errors: &mut ValidationErrors,
) {
    if obj.get(name).map(Value::is_null).unwrap_or(false) {
        obj.remove(name);
        return;
    }

    if let Some(value) = obj.get(name) {
        if !is_type(value) {
            errors.add(name, message);
        }
    }
}

fn integer_field(
    obj: &mut Map<String, Value>,
    name: &str,
    min: u64,
    max: u64,
    errors: &mut ValidationErrors,
) {
    if obj.get(name).map(Value::is_null).unwrap_or(false) {
        obj.remove(name);
        return;
    }

    if let Some(value) = obj.get(name) {
        match value.as_u64() {
            Some(n) if (min..=max).contains(&n) => {}
            _ => errors.add(name, format!("must be an integer between {} and {}", min, max)),
        }
    }
}

fn read_aws_config(
    obj: &Map<String, Value>,
    defaults: &AwsDefaults,
    errors: &mut ValidationErrors,
) -> AwsConfig {
    let key = string_field(obj, "key", errors);
    let secret = string_field(obj, "secret", errors);

    let credentials = match (key, secret) {
        (Some(key), Some(secret)) => Some(AwsCredentials { key, secret }),
        (None, None) => None,
        (Some(_), None) => {
            errors.add("secret", "is required when key is set");
            None
        }
        (None, Some(_)) => {
            errors.add("key", "is required when secret is set");
            None
        }
    };

    let region = string_field(obj, "region", errors).unwrap_or_else(|| defaults.region.clone());
    if !is_valid_region(&region) {
        errors.add("region", format!("'{}' is not a valid AWS region", region));
    }

    let endpoint = string_field(obj, "endpoint", errors);
    if let Some(url) = &endpoint {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            errors.add("endpoint", "must be an http or https URL");
        }
    }

    AwsConfig {
        credentials,
        region,
        endpoint,
        service_name: string_field(obj, "service_name", errors),
    }
}

/// `us-east-1`, `us-gov-west-1`, `cn-north-1`
fn is_valid_region(region: &str) -> bool {
    let parts: Vec<&str> = region.split('-').collect();
    if parts.len() < 3 {
        return false;
    }

    let (last, rest) = match parts.split_last() {
        Some(split) => split,
        None => return false,
    };

    !last.is_empty()
        && last.chars().all(|c| c.is_ascii_digit())
        && rest
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_lowercase()))
}

fn check_bucket_name(name: &str) -> Result<(), String> {
    if name.len() < 3 || name.len() > 63 {
        return Err("must be between 3 and 63 characters".to_string());
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err("may only contain lowercase letters, digits, '.' and '-'".to_string());
    }

    let starts_ok = name.chars().next().map(|c| c.is_ascii_alphanumeric()).unwrap_or(false);
    let ends_ok = name.chars().last().map(|c| c.is_ascii_alphanumeric()).unwrap_or(false);
    if !starts_ok || !ends_ok {
        return Err("must start and end with a letter or digit".to_string());
    }

    Ok(())
}

fn check_identifier(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 127 {
        return Err("must be between 1 and 127 characters".to_string());
    }

    let first_ok = name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !first_ok || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return Err(format!("'{}' is not a valid identifier", name));
    }

    Ok(())
}
