//! Service type descriptors
//!
//! A descriptor ties a stable type name to the configuration handler that
//! validates raw configuration for it and the factory that builds a live
//! instance from the validated result. The handler's typed configuration is
//! erased at construction time so descriptors of different types can share
//! one registry.

use crate::docs::{ApiDocInfo, ServiceDoc, ServiceDocBuilder};
use crate::error::ValidationErrors;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// Grouping category used to present service types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTypeGroup {
    File,
    Database,
    Notification,
    Email,
    Cache,
    Script,
    Other,
}

impl fmt::Display for ServiceTypeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServiceTypeGroup::File => "File",
            ServiceTypeGroup::Database => "Database",
            ServiceTypeGroup::Notification => "Notification",
            ServiceTypeGroup::Email => "Email",
            ServiceTypeGroup::Cache => "Cache",
            ServiceTypeGroup::Script => "Script",
            ServiceTypeGroup::Other => "Other",
        };
        f.write_str(s)
    }
}

/// A live, configured service instance
pub trait Service: Send + Sync + fmt::Debug {
    /// Name of the service type this instance was built from
    fn service_type(&self) -> &str;

    /// Instance name, used as the root of its API paths
    fn name(&self) -> &str;

    fn api_doc_info(&self) -> ApiDocInfo;

    fn as_any(&self) -> &dyn Any;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Password,
    Integer,
    Boolean,
    Object,
}

/// Self-description of one configuration field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigField {
    pub name: String,
    pub kind: FieldKind,
    pub label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConfigField {
    pub fn new(name: &str, kind: FieldKind, label: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            label: label.to_string(),
            required: false,
            default: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Validates raw configuration into the typed configuration a factory consumes
pub trait ConfigHandler: Send + Sync + 'static {
    type Config: Send + 'static;

    fn validate(&self, raw: &Value) -> std::result::Result<Self::Config, ValidationErrors>;

    fn fields(&self) -> Vec<ConfigField> {
        Vec::new()
    }
}

/// Output of a descriptor's handler, consumed by the same descriptor's factory
pub struct ValidatedConfig(Box<dyn Any + Send>);

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValidatedConfig(..)")
    }
}

type ValidateFn =
    Box<dyn Fn(&Value) -> std::result::Result<ValidatedConfig, ValidationErrors> + Send + Sync>;
type FactoryFn = Box<dyn Fn(ValidatedConfig) -> anyhow::Result<Box<dyn Service>> + Send + Sync>;

/// Builds documentation for a live instance; the formatter is passed in
pub type DocGenerator = Box<dyn Fn(&dyn Service, &ServiceDocBuilder) -> ServiceDoc + Send + Sync>;

/// Presentation metadata of a service type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceTypeMeta {
    pub name: String,
    pub label: String,
    pub description: String,
    pub group: ServiceTypeGroup,
}

impl ServiceTypeMeta {
    pub fn new(name: &str, label: &str, description: &str, group: ServiceTypeGroup) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            group,
        }
    }
}

pub struct ServiceTypeDescriptor {
    meta: ServiceTypeMeta,
    config_fields: Vec<ConfigField>,
    validate: ValidateFn,
    factory: FactoryFn,
    doc_generator: DocGenerator,
}

impl ServiceTypeDescriptor {
    /// Create a descriptor whose documentation is the instance's own API surface
    pub fn new<H, F>(meta: ServiceTypeMeta, handler: H, factory: F) -> Self
    where
        H: ConfigHandler,
        F: Fn(H::Config) -> anyhow::Result<Box<dyn Service>> + Send + Sync + 'static,
    {
        let config_fields = handler.fields();
        let service_type = meta.name.clone();

        let validate: ValidateFn = Box::new(move |raw| {
            handler
                .validate(raw)
                .map(|config| ValidatedConfig(Box::new(config)))
        });

        let factory: FactoryFn = Box::new(move |validated: ValidatedConfig| {
            let config = validated.0.downcast::<H::Config>().map_err(|_| {
                anyhow::anyhow!("configuration was not produced by the {} handler", service_type)
            })?;
            factory(*config)
        });

        Self {
            meta,
            config_fields,
            validate,
            factory,
            doc_generator: Box::new(|service, builder| {
                builder.build_service_doc(service.name(), &service.api_doc_info())
            }),
        }
    }

    pub fn with_doc_generator<G>(mut self, generator: G) -> Self
    where
        G: Fn(&dyn Service, &ServiceDocBuilder) -> ServiceDoc + Send + Sync + 'static,
    {
        self.doc_generator = Box::new(generator);
        self
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn label(&self) -> &str {
        &self.meta.label
    }

    pub fn description(&self) -> &str {
        &self.meta.description
    }

    pub fn group(&self) -> ServiceTypeGroup {
        self.meta.group
    }

    pub fn meta(&self) -> &ServiceTypeMeta {
        &self.meta
    }

    pub fn config_fields(&self) -> &[ConfigField] {
        &self.config_fields
    }

    pub fn validate(&self, raw: &Value) -> std::result::Result<ValidatedConfig, ValidationErrors> {
        (self.validate)(raw)
    }

    pub fn build(&self, config: ValidatedConfig) -> anyhow::Result<Box<dyn Service>> {
        (self.factory)(config)
    }

    pub fn document(&self, service: &dyn Service, builder: &ServiceDocBuilder) -> ServiceDoc {
        (self.doc_generator)(service, builder)
    }
}

impl fmt::Debug for ServiceTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTypeDescriptor")
            .field("meta", &self.meta)
            .field("config_fields", &self.config_fields.len())
            .finish_non_exhaustive()
    }
}
