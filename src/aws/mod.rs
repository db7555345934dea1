//! AWS service types
//!
//! Adapters for S3, DynamoDB, SNS, SES and Redshift. Each adapter holds its
//! validated configuration and describes its API surface; talking to AWS is
//! left to the clients the host application wires in.

pub mod config;
pub mod dynamodb;
pub mod redshift_db;
pub mod s3;
pub mod ses;
pub mod sns;

pub use config::{
    AwsConfig, AwsConfigHandler, AwsCredentials, AwsS3Config, AwsS3ConfigHandler,
    RedshiftDbConfig, RedshiftDbConfigHandler,
};
pub use dynamodb::DynamoDb;
pub use redshift_db::RedshiftDb;
pub use s3::S3;
pub use ses::Ses;
pub use sns::Sns;

use crate::config::AwsDefaults;
use crate::docs::{ApiDocInfo, Verb};
use crate::error::Result;
use crate::registry::{Service, ServiceTypeDescriptor, ServiceTypeGroup, ServiceTypeMeta, ServiceTypeRegistry};
use tracing::info;

/// Register every AWS service type. Call once during bootstrap.
pub fn register_service_types(registry: &ServiceTypeRegistry, defaults: &AwsDefaults) -> Result<()> {
    registry.register(ServiceTypeDescriptor::new(
        ServiceTypeMeta::new(
            s3::SERVICE_TYPE,
            "AWS S3",
            "File storage service supporting the AWS S3 file system.",
            ServiceTypeGroup::File,
        ),
        AwsS3ConfigHandler::new(defaults.clone()),
        |config| Ok(Box::new(S3::new(config)) as Box<dyn Service>),
    ))?;

    registry.register(ServiceTypeDescriptor::new(
        ServiceTypeMeta::new(
            dynamodb::SERVICE_TYPE,
            "AWS DynamoDB",
            "A database service supporting the AWS DynamoDB system.",
            ServiceTypeGroup::Database,
        ),
        AwsConfigHandler::new(defaults.clone()),
        |config| Ok(Box::new(DynamoDb::new(config)) as Box<dyn Service>),
    ))?;

    registry.register(ServiceTypeDescriptor::new(
        ServiceTypeMeta::new(
            sns::SERVICE_TYPE,
            "AWS SNS",
            "Push notification service supporting the AWS SNS system.",
            ServiceTypeGroup::Notification,
        ),
        AwsConfigHandler::new(defaults.clone()),
        |config| Ok(Box::new(Sns::new(config)) as Box<dyn Service>),
    ))?;

    registry.register(ServiceTypeDescriptor::new(
        ServiceTypeMeta::new(
            ses::SERVICE_TYPE,
            "AWS SES",
            "Email service supporting the AWS SES system.",
            ServiceTypeGroup::Email,
        ),
        AwsConfigHandler::new(defaults.clone()),
        |config| Ok(Box::new(Ses::new(config)) as Box<dyn Service>),
    ))?;

    registry.register(ServiceTypeDescriptor::new(
        ServiceTypeMeta::new(
            redshift_db::SERVICE_TYPE,
            "AWS Redshift DB",
            "A database service supporting AWS Redshift.",
            ServiceTypeGroup::Database,
        ),
        RedshiftDbConfigHandler,
        |config| Ok(Box::new(RedshiftDb::new(config)) as Box<dyn Service>),
    ))?;

    info!("Registered AWS service types (default region {})", defaults.region);
    Ok(())
}

/// Schema and record paths shared by the table-oriented database services
pub(crate) fn table_api(info: ApiDocInfo) -> ApiDocInfo {
    info.path(
        "/_schema",
        &[
            (Verb::Get, "schemas", "List resources available for database schema."),
            (Verb::Post, "schemas", "Create one or more tables."),
        ],
    )
    .path(
        "/_schema/{table_name}",
        &[
            (Verb::Get, "schema", "Retrieve table definition for the given table."),
            (Verb::Put, "schema", "Replace the definition of the given table."),
            (Verb::Patch, "schema", "Update the definition of the given table."),
            (Verb::Delete, "schema", "Delete (aka drop) the given table."),
        ],
    )
    .path("/_table", &[(Verb::Get, "tables", "List resources available for database tables.")])
    .path(
        "/_table/{table_name}",
        &[
            (Verb::Get, "records", "Retrieve one or more records."),
            (Verb::Post, "records", "Create one or more records."),
            (Verb::Put, "records", "Replace the content of one or more records."),
            (Verb::Patch, "records", "Update one or more records."),
            (Verb::Delete, "records", "Delete one or more records."),
        ],
    )
    .path(
        "/_table/{table_name}/{id}",
        &[
            (Verb::Get, "record", "Retrieve one record by identifier."),
            (Verb::Put, "record", "Replace the content of one record by identifier."),
            (Verb::Patch, "record", "Update one record by identifier."),
            (Verb::Delete, "record", "Delete one record by identifier."),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use serde_json::json;

    fn registry() -> ServiceTypeRegistry {
        let registry = ServiceTypeRegistry::new();
        register_service_types(&registry, &AwsDefaults::default()).unwrap();
        registry
    }

    #[test]
    fn test_registers_all_types() {
        let registry = registry();
        let names: Vec<String> = registry.list(None).into_iter().map(|t| t.meta.name).collect();
        assert_eq!(
            names,
            vec!["aws_dynamodb", "aws_redshift_db", "aws_s3", "aws_ses", "aws_sns"]
        );

        assert_eq!(registry.lookup("aws_s3").unwrap().group(), ServiceTypeGroup::File);
        assert_eq!(registry.lookup("aws_sns").unwrap().group(), ServiceTypeGroup::Notification);
        assert_eq!(registry.lookup("aws_ses").unwrap().group(), ServiceTypeGroup::Email);
        assert_eq!(registry.list(Some(ServiceTypeGroup::Database)).len(), 2);
    }

    #[test]
    fn test_registering_twice_fails() {
        let registry = registry();
        let err = register_service_types(&registry, &AwsDefaults::default()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateType { .. }));
    }

    #[test]
    fn test_construct_s3() {
        let registry = registry();
        let service = registry
            .construct(
                "aws_s3",
                &json!({"bucket": "media-assets", "region": "us-west-2", "service_name": "files"}),
            )
            .unwrap();

        assert_eq!(service.service_type(), "aws_s3");
        assert_eq!(service.name(), "files");
        let s3 = service.as_any().downcast_ref::<S3>().unwrap();
        assert_eq!(s3.bucket_url(), "https://media-assets.s3.us-west-2.amazonaws.com");

        let err = registry.construct("aws_s3", &json!({})).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidConfig { .. }));
    }

    #[test]
    fn test_s3_endpoint_override() {
        let service = registry()
            .construct(
                "aws_s3",
                &json!({"container": "local", "endpoint": "http://localhost:9000/"}),
            )
            .unwrap();
        let s3 = service.as_any().downcast_ref::<S3>().unwrap();
        assert_eq!(s3.bucket_url(), "http://localhost:9000/local");
    }

    #[test]
    fn test_service_docs() {
        let registry = registry();

        let sns = registry.construct("aws_sns", &json!({"service_name": "push"})).unwrap();
        let doc = registry.documentation_for(sns.as_ref()).unwrap();
        assert_eq!(doc.service, "push");
        assert_eq!(
            doc.content["paths"]["/push/topic/{topic_name}"]["post"]["operationId"],
            "postPushPublishTopic"
        );

        let ses = registry.construct("aws_ses", &json!({})).unwrap();
        let doc = registry.documentation_for(ses.as_ref()).unwrap();
        assert!(doc.content["paths"]["/aws_ses"]["post"].is_object());

        let dynamo = registry.construct("aws_dynamodb", &json!({})).unwrap();
        assert_eq!(dynamo.api_doc_info().paths.len(), 5);
    }

    #[test]
    fn test_sns_topic_arn() {
        let service = registry()
            .construct("aws_sns", &json!({"region": "eu-central-1"}))
            .unwrap();
        let sns = service.as_any().downcast_ref::<Sns>().unwrap();
        assert_eq!(
            sns.topic_arn("123456789012", "orders"),
            "arn:aws:sns:eu-central-1:123456789012:orders"
        );
    }

    #[test]
    fn test_construct_redshift_db() {
        let registry = registry();
        let service = registry
            .construct(
                "aws_redshift_db",
                &json!({"host": "cluster.example.com", "database": "dev", "username": "awsuser"}),
            )
            .unwrap();

        let redshift = service.as_any().downcast_ref::<RedshiftDb>().unwrap();
        assert_eq!(redshift.driver_config().driver, "redshift");
        assert!(redshift
            .api_doc_info()
            .paths
            .iter()
            .any(|p| p.path == "/_proc/{procedure_name}"));
    }
}
