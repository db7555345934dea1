use crate::aws::config::RedshiftDbConfig;
use crate::aws::table_api;
use crate::docs::{ApiDocInfo, Verb};
use crate::error::Result;
use crate::registry::{DbConnection, DriverConfig, DriverExtensionRegistry, SchemaIntrospector, Service};
use std::any::Any;
use std::sync::{Arc, OnceLock};

pub const SERVICE_TYPE: &str = "aws_redshift_db";

/// SQL database service on a Redshift cluster.
///
/// The connection is opened on first use through the driver registry and
/// reused by later calls on the same instance.
#[derive(Debug)]
pub struct RedshiftDb {
    name: String,
    config: RedshiftDbConfig,
    connection: OnceLock<Arc<dyn DbConnection>>,
}

impl RedshiftDb {
    pub fn new(config: RedshiftDbConfig) -> Self {
        let name = config
            .service_name
            .clone()
            .unwrap_or_else(|| SERVICE_TYPE.to_string());
        Self {
            name,
            config,
            connection: OnceLock::new(),
        }
    }

    pub fn driver_config(&self) -> &DriverConfig {
        &self.config.driver
    }

    pub fn connection(&self, drivers: &DriverExtensionRegistry) -> Result<Arc<dyn DbConnection>> {
        if let Some(connection) = self.connection.get() {
            return Ok(connection.clone());
        }

        let connection = drivers.connect(&self.config.driver)?;
        // A concurrent caller may have won the race; keep whichever landed first
        Ok(self.connection.get_or_init(|| connection).clone())
    }

    pub fn schema(&self, drivers: &DriverExtensionRegistry) -> Result<Box<dyn SchemaIntrospector>> {
        let connection = self.connection(drivers)?;
        drivers.schema_for(connection)
    }
}

impl Service for RedshiftDb {
    fn service_type(&self) -> &str {
        SERVICE_TYPE
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn api_doc_info(&self) -> ApiDocInfo {
        table_api(ApiDocInfo::new(format!(
            "SQL access to Redshift database '{}' on {}.",
            self.config.driver.database, self.config.driver.host
        )))
        .path(
            "/_proc/{procedure_name}",
            &[
                (Verb::Get, "stored_procedure", "Call a stored procedure."),
                (Verb::Post, "stored_procedure", "Call a stored procedure with parameters."),
            ],
        )
        .path(
            "/_func/{function_name}",
            &[
                (Verb::Get, "stored_function", "Call a stored function."),
                (Verb::Post, "stored_function", "Call a stored function with parameters."),
            ],
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
