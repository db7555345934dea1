//! Redshift driver extension
//!
//! Redshift speaks the PostgreSQL wire protocol, so connections are plain
//! `deadpool-postgres` pools. The schema wrapper always receives the live
//! connection, which carries the database name, table prefix and full
//! driver configuration.

mod connection;
mod connector;
mod schema;

pub use connection::RedshiftConnection;
pub use connector::RedshiftConnector;
pub use schema::{ColumnInfo, RedshiftSchema};

use crate::error::Result;
use crate::registry::{DbConnection, DriverExtensionRegistry, SchemaIntrospector};
use std::sync::Arc;

pub const DRIVER_NAME: &str = "redshift";

/// Register the redshift connection and schema factories. Call once during bootstrap.
pub fn register_driver(drivers: &DriverExtensionRegistry) -> Result<()> {
    drivers.register_connection(DRIVER_NAME, |config| {
        let connection = RedshiftConnector::new().connect(config)?;
        Ok(Arc::new(connection) as Arc<dyn DbConnection>)
    })?;

    drivers.register_schema(DRIVER_NAME, |connection| {
        Ok(Box::new(RedshiftSchema::new(connection)?) as Box<dyn SchemaIntrospector>)
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::registry::DriverConfig;
    use serde_json::json;

    fn config() -> DriverConfig {
        DriverConfig::from_value(&json!({
            "driver": "redshift",
            "host": "cluster.example.com",
            "database": "analytics",
            "username": "awsuser",
            "prefix": "df_"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_connect_then_schema() {
        let drivers = DriverExtensionRegistry::new();
        register_driver(&drivers).unwrap();

        let connection = drivers.connect(&config()).unwrap();
        assert_eq!(connection.driver(), "redshift");
        assert_eq!(connection.database(), "analytics");
        assert_eq!(connection.table_prefix(), "df_");

        let schema = drivers.schema_for(connection.clone()).unwrap();
        assert!(Arc::ptr_eq(schema.connection(), &connection));
        assert_eq!(schema.default_schema(), "public");
    }

    #[test]
    fn test_register_twice_fails() {
        let drivers = DriverExtensionRegistry::new();
        register_driver(&drivers).unwrap();
        assert!(matches!(
            register_driver(&drivers),
            Err(RegistryError::DuplicateDriver { .. })
        ));
    }

    #[derive(Debug)]
    struct ForeignConnection(DriverConfig);

    impl DbConnection for ForeignConnection {
        fn driver(&self) -> &str {
            DRIVER_NAME
        }

        fn database(&self) -> &str {
            &self.0.database
        }

        fn table_prefix(&self) -> &str {
            &self.0.prefix
        }

        fn config(&self) -> &DriverConfig {
            &self.0
        }

        fn into_any(self: Arc<Self>) -> Arc<dyn std::any::Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn test_schema_rejects_foreign_connection() {
        let drivers = DriverExtensionRegistry::new();
        register_driver(&drivers).unwrap();

        let result = drivers.schema_for(Arc::new(ForeignConnection(config())));
        assert!(matches!(result, Err(RegistryError::Internal(_))));
    }
}
