//! Service Type Registry
//!
//! Catalog of every service type the application can expose.

use crate::docs::{ServiceDoc, ServiceDocBuilder};
use crate::error::{RegistryError, Result};
use crate::registry::service_type::{
    ConfigField, Service, ServiceTypeDescriptor, ServiceTypeGroup, ServiceTypeMeta,
    ValidatedConfig,
};
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

struct TypeEntry {
    descriptor: Arc<ServiceTypeDescriptor>,
    registered_at: DateTime<Utc>,
}

/// Catalog view of a registered service type
#[derive(Debug, Clone, Serialize)]
pub struct ServiceTypeInfo {
    #[serde(flatten)]
    pub meta: ServiceTypeMeta,
    pub config_schema: Vec<ConfigField>,
    pub registered_at: DateTime<Utc>,
}

pub struct ServiceTypeRegistry {
    types: DashMap<String, TypeEntry>,
    doc_builder: ServiceDocBuilder,
}

impl ServiceTypeRegistry {
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
            doc_builder: ServiceDocBuilder::new(),
        }
    }

    /// Register a service type. Names are unique for the life of the registry.
    pub fn register(&self, descriptor: ServiceTypeDescriptor) -> Result<()> {
        match self.types.entry(descriptor.name().to_string()) {
            Entry::Occupied(entry) => Err(RegistryError::DuplicateType {
                service_type: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                info!(
                    "Registered service type: {} ({})",
                    descriptor.name(),
                    descriptor.group()
                );
                entry.insert(TypeEntry {
                    descriptor: Arc::new(descriptor),
                    registered_at: Utc::now(),
                });
                Ok(())
            }
        }
    }

    pub fn lookup(&self, service_type: &str) -> Result<Arc<ServiceTypeDescriptor>> {
        self.types
            .get(service_type)
            .map(|entry| entry.descriptor.clone())
            .ok_or_else(|| RegistryError::UnknownType {
                service_type: service_type.to_string(),
            })
    }

    pub fn contains(&self, service_type: &str) -> bool {
        self.types.contains_key(service_type)
    }

    /// Run only the type's configuration handler
    pub fn validate_config(&self, service_type: &str, raw: &Value) -> Result<ValidatedConfig> {
        let descriptor = self.lookup(service_type)?;
        validate_with(&descriptor, raw)
    }

    /// Validate `raw` and build a new instance of `service_type`
    pub fn construct(&self, service_type: &str, raw: &Value) -> Result<Box<dyn Service>> {
        // Hold only the Arc while user code runs, never a map guard
        let descriptor = self.lookup(service_type)?;
        let config = validate_with(&descriptor, raw)?;

        let service = descriptor.build(config).map_err(|e| {
            warn!("Failed to construct {} service: {:#}", service_type, e);
            RegistryError::Construction {
                service_type: service_type.to_string(),
                cause: format!("{:#}", e),
            }
        })?;

        debug!("Constructed {} service '{}'", service_type, service.name());
        Ok(service)
    }

    pub fn documentation_for(&self, service: &dyn Service) -> Result<ServiceDoc> {
        let descriptor = self.lookup(service.service_type())?;
        Ok(descriptor.document(service, &self.doc_builder))
    }

    pub fn info(&self, service_type: &str) -> Result<ServiceTypeInfo> {
        self.types
            .get(service_type)
            .map(|entry| type_info(&entry))
            .ok_or_else(|| RegistryError::UnknownType {
                service_type: service_type.to_string(),
            })
    }

    /// Registered types sorted by name, optionally restricted to one group
    pub fn list(&self, group: Option<ServiceTypeGroup>) -> Vec<ServiceTypeInfo> {
        let mut types: Vec<ServiceTypeInfo> = self
            .types
            .iter()
            .filter(|entry| group.map(|g| entry.descriptor.group() == g).unwrap_or(true))
            .map(|entry| type_info(&entry))
            .collect();

        types.sort_by(|a, b| a.meta.name.cmp(&b.meta.name));
        types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for ServiceTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_with(descriptor: &ServiceTypeDescriptor, raw: &Value) -> Result<ValidatedConfig> {
    descriptor.validate(raw).map_err(|errors| {
        warn!("Rejected {} configuration: {}", descriptor.name(), errors);
        RegistryError::InvalidConfig {
            service_type: descriptor.name().to_string(),
            errors,
        }
    })
}

fn type_info(entry: &TypeEntry) -> ServiceTypeInfo {
    ServiceTypeInfo {
        meta: entry.descriptor.meta().clone(),
        config_schema: entry.descriptor.config_fields().to_vec(),
        registered_at: entry.registered_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::{ApiDocInfo, Verb};
    use crate::error::ValidationErrors;
    use crate::registry::service_type::{ConfigHandler, FieldKind};
    use serde_json::json;
    use std::any::Any;
    use std::sync::Mutex;

    #[derive(Debug)]
    struct Marker {
        bucket: String,
    }

    impl Service for Marker {
        fn service_type(&self) -> &str {
            "aws_s3"
        }

        fn name(&self) -> &str {
            "files"
        }

        fn api_doc_info(&self) -> ApiDocInfo {
            ApiDocInfo::new("marker").path("/", &[(Verb::Get, "containers", "List")])
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Accepts `{bucket: "..."}` and records every call into `log`
    struct BucketHandler {
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    impl ConfigHandler for BucketHandler {
        type Config = String;

        fn validate(&self, raw: &Value) -> std::result::Result<String, ValidationErrors> {
            self.log.lock().unwrap().push("validate");
            raw.get("bucket")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| ValidationErrors::single("bucket", "is required"))
        }

        fn fields(&self) -> Vec<ConfigField> {
            vec![ConfigField::new("bucket", FieldKind::String, "Bucket").required()]
        }
    }

    fn s3_descriptor(log: Arc<Mutex<Vec<&'static str>>>) -> ServiceTypeDescriptor {
        let factory_log = log.clone();
        ServiceTypeDescriptor::new(
            ServiceTypeMeta::new("aws_s3", "AWS S3", "File storage", ServiceTypeGroup::File),
            BucketHandler { log },
            move |bucket| {
                factory_log.lock().unwrap().push("factory");
                Ok(Box::new(Marker { bucket }) as Box<dyn Service>)
            },
        )
    }

    fn failing_descriptor(calls: Arc<Mutex<usize>>) -> ServiceTypeDescriptor {
        ServiceTypeDescriptor::new(
            ServiceTypeMeta::new("aws_sns", "AWS SNS", "Push", ServiceTypeGroup::Notification),
            BucketHandler {
                log: Arc::new(Mutex::new(Vec::new())),
            },
            move |_| {
                *calls.lock().unwrap() += 1;
                Err(anyhow::anyhow!("credentials check failed: endpoint unreachable"))
            },
        )
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ServiceTypeRegistry::new();
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        let descriptor = registry.lookup("aws_s3").unwrap();
        assert_eq!(descriptor.label(), "AWS S3");
        assert_eq!(descriptor.group(), ServiceTypeGroup::File);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = ServiceTypeRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(s3_descriptor(log.clone())).unwrap();

        let err = registry.register(s3_descriptor(log)).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { ref service_type } if service_type == "aws_s3"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_type() {
        let registry = ServiceTypeRegistry::new();
        assert!(matches!(
            registry.lookup("aws_glacier"),
            Err(RegistryError::UnknownType { .. })
        ));
        assert!(matches!(
            registry.construct("aws_glacier", &json!({})),
            Err(RegistryError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_construct_returns_factory_output() {
        let registry = ServiceTypeRegistry::new();
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        let service = registry.construct("aws_s3", &json!({"bucket": "x"})).unwrap();
        let marker = service.as_any().downcast_ref::<Marker>().unwrap();
        assert_eq!(marker.bucket, "x");
    }

    #[test]
    fn test_handler_runs_before_factory() {
        let registry = ServiceTypeRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(s3_descriptor(log.clone())).unwrap();

        registry.construct("aws_s3", &json!({"bucket": "x"})).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["validate", "factory"]);
    }

    #[test]
    fn test_invalid_config_skips_factory() {
        let registry = ServiceTypeRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.register(s3_descriptor(log.clone())).unwrap();

        let err = registry.construct("aws_s3", &json!({})).unwrap_err();
        match err {
            RegistryError::InvalidConfig { service_type, errors } => {
                assert_eq!(service_type, "aws_s3");
                assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["bucket"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(*log.lock().unwrap(), vec!["validate"]);
    }

    #[test]
    fn test_factory_failure_leaves_registry_intact() {
        let registry = ServiceTypeRegistry::new();
        let calls = Arc::new(Mutex::new(0));
        registry.register(failing_descriptor(calls.clone())).unwrap();

        let err = registry.construct("aws_sns", &json!({"bucket": "x"})).unwrap_err();
        match err {
            RegistryError::Construction { service_type, cause } => {
                assert_eq!(service_type, "aws_sns");
                assert!(cause.contains("endpoint unreachable"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(*calls.lock().unwrap(), 1);
        assert!(registry.lookup("aws_sns").is_ok());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_documentation_for_instance() {
        let registry = ServiceTypeRegistry::new();
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        let service = registry.construct("aws_s3", &json!({"bucket": "x"})).unwrap();
        let doc = registry.documentation_for(service.as_ref()).unwrap();
        assert_eq!(doc.service, "files");
        assert!(doc.content["paths"]["/files"]["get"].is_object());
    }

    #[test]
    fn test_documentation_for_unregistered_type() {
        #[derive(Debug)]
        struct Orphan;

        impl Service for Orphan {
            fn service_type(&self) -> &str {
                "aws_glacier"
            }

            fn name(&self) -> &str {
                "archive"
            }

            fn api_doc_info(&self) -> ApiDocInfo {
                ApiDocInfo::new("orphan")
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }

        let registry = ServiceTypeRegistry::new();
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        match registry.documentation_for(&Orphan) {
            Err(RegistryError::UnknownType { service_type }) => {
                assert_eq!(service_type, "aws_glacier")
            }
            other => panic!("expected UnknownType, got {:?}", other.map(|d| d.service)),
        }
    }

    #[test]
    fn test_custom_doc_generator_receives_builder() {
        let registry = ServiceTypeRegistry::new();
        let descriptor = s3_descriptor(Arc::new(Mutex::new(Vec::new()))).with_doc_generator(
            |service, builder| {
                let info = ApiDocInfo::new("custom");
                builder.build_service_doc(&format!("{}_v2", service.name()), &info)
            },
        );
        registry.register(descriptor).unwrap();

        let service = registry.construct("aws_s3", &json!({"bucket": "x"})).unwrap();
        let doc = registry.documentation_for(service.as_ref()).unwrap();
        assert_eq!(doc.service, "files_v2");
        assert_eq!(doc.content["info"]["description"], "custom");
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let registry = ServiceTypeRegistry::new();
        registry
            .register(failing_descriptor(Arc::new(Mutex::new(0))))
            .unwrap();
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        let all: Vec<String> = registry.list(None).into_iter().map(|t| t.meta.name).collect();
        assert_eq!(all, vec!["aws_s3", "aws_sns"]);

        let files = registry.list(Some(ServiceTypeGroup::File));
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].config_schema[0].name, "bucket");
        assert!(registry.list(Some(ServiceTypeGroup::Email)).is_empty());
    }

    #[test]
    fn test_concurrent_construct() {
        let registry = Arc::new(ServiceTypeRegistry::new());
        registry
            .register(s3_descriptor(Arc::new(Mutex::new(Vec::new()))))
            .unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    let bucket = format!("bucket-{}", i);
                    let service = registry
                        .construct("aws_s3", &json!({ "bucket": bucket }))
                        .unwrap();
                    service.as_any().downcast_ref::<Marker>().unwrap().bucket.clone()
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("bucket-{}", i));
        }
    }
}
