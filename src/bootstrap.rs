//! Application bootstrap
//!
//! Each extension module exposes one registration function taking the
//! registry it populates. They run here once, in a fixed order.

use crate::aws;
use crate::config::Config;
use crate::error::Result;
use crate::redshift;
use crate::registry::{DriverExtensionRegistry, ServiceTypeRegistry};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Registries {
    pub services: Arc<ServiceTypeRegistry>,
    pub drivers: Arc<DriverExtensionRegistry>,
}

pub fn bootstrap(config: &Config) -> Result<Registries> {
    let services = ServiceTypeRegistry::new();
    let drivers = DriverExtensionRegistry::new();

    aws::register_service_types(&services, &config.aws)?;
    redshift::register_driver(&drivers)?;

    info!(
        "Bootstrap complete: {} service types, drivers {:?}",
        services.len(),
        drivers.drivers()
    );

    Ok(Registries {
        services: Arc::new(services),
        drivers: Arc::new(drivers),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AwsDefaults;
    use std::path::PathBuf;

    fn test_config() -> Config {
        Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_dir: PathBuf::from("./logs"),
            aws: AwsDefaults::default(),
        }
    }

    #[test]
    fn test_bootstrap_populates_registries() {
        let registries = bootstrap(&test_config()).unwrap();
        assert_eq!(registries.services.len(), 5);
        assert!(registries.services.contains("aws_redshift_db"));
        assert_eq!(registries.drivers.drivers(), vec!["redshift"]);
        assert!(registries.drivers.has_schema("redshift"));
    }

    #[tokio::test]
    async fn test_redshift_service_resolves_driver_lazily() {
        let registries = bootstrap(&test_config()).unwrap();
        let service = registries
            .services
            .construct(
                "aws_redshift_db",
                &serde_json::json!({
                    "host": "cluster.example.com",
                    "database": "dev",
                    "username": "awsuser",
                    "prefix": "df_"
                }),
            )
            .unwrap();

        let redshift = service
            .as_any()
            .downcast_ref::<aws::RedshiftDb>()
            .unwrap();

        let first = redshift.connection(&registries.drivers).unwrap();
        let second = redshift.connection(&registries.drivers).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let schema = redshift.schema(&registries.drivers).unwrap();
        assert!(Arc::ptr_eq(schema.connection(), &first));
        assert_eq!(schema.connection().table_prefix(), "df_");
    }
}
