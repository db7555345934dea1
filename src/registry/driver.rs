//! Driver Extension Registry
//!
//! Lets the SQL layer acquire non-default database drivers by name.
//! Resolution is two-stage: a connection factory turns raw driver
//! configuration into an open connection handle, and a schema factory wraps
//! an already-open connection for introspection.

use crate::error::{RegistryError, Result};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

fn default_port() -> u16 {
    5439
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout() -> u64 {
    5
}

/// Raw connection settings handed to a connection factory
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverConfig {
    pub driver: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: String,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Table name prefix applied by the SQL layer
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_schema")]
    pub schema: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Driver-specific options passed through untouched
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl DriverConfig {
    pub fn from_value(raw: &Value) -> std::result::Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }
}

/// An open connection handle produced by a driver
pub trait DbConnection: Send + Sync + fmt::Debug {
    fn driver(&self) -> &str;

    fn database(&self) -> &str;

    fn table_prefix(&self) -> &str;

    fn config(&self) -> &DriverConfig;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// Schema introspection over an open connection
#[async_trait]
pub trait SchemaIntrospector: Send + Sync {
    fn connection(&self) -> &Arc<dyn DbConnection>;

    fn default_schema(&self) -> &str;

    fn quote_name(&self, name: &str) -> String;

    async fn table_names(&self) -> Result<Vec<String>>;
}

pub type ConnectionFactory =
    Arc<dyn Fn(&DriverConfig) -> anyhow::Result<Arc<dyn DbConnection>> + Send + Sync>;
pub type SchemaFactory =
    Arc<dyn Fn(Arc<dyn DbConnection>) -> anyhow::Result<Box<dyn SchemaIntrospector>> + Send + Sync>;

pub struct DriverExtensionRegistry {
    connections: DashMap<String, ConnectionFactory>,
    schemas: DashMap<String, SchemaFactory>,
}

impl DriverExtensionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            schemas: DashMap::new(),
        }
    }

    pub fn register_connection<F>(&self, driver: &str, factory: F) -> Result<()>
    where
        F: Fn(&DriverConfig) -> anyhow::Result<Arc<dyn DbConnection>> + Send + Sync + 'static,
    {
        let factory: ConnectionFactory = Arc::new(factory);
        insert_unique(&self.connections, driver, "connection", factory)
    }

    pub fn register_schema<F>(&self, driver: &str, factory: F) -> Result<()>
    where
        F: Fn(Arc<dyn DbConnection>) -> anyhow::Result<Box<dyn SchemaIntrospector>>
            + Send
            + Sync
            + 'static,
    {
        let factory: SchemaFactory = Arc::new(factory);
        insert_unique(&self.schemas, driver, "schema", factory)
    }

    /// Open a connection with the driver named in `config.driver`
    pub fn connect(&self, config: &DriverConfig) -> Result<Arc<dyn DbConnection>> {
        let factory = self
            .connections
            .get(&config.driver)
            .map(|f| f.value().clone())
            .ok_or_else(|| RegistryError::UnknownDriver {
                driver: config.driver.clone(),
            })?;

        let connection = factory(config).map_err(|e| RegistryError::ConnectionFailed {
            database: config.database.clone(),
            cause: format!("{:#}", e),
        })?;

        debug!(
            "Opened {} connection to database {}",
            config.driver, config.database
        );
        Ok(connection)
    }

    /// Wrap an open connection with its driver's schema introspector
    pub fn schema_for(&self, connection: Arc<dyn DbConnection>) -> Result<Box<dyn SchemaIntrospector>> {
        let driver = connection.driver().to_string();
        let factory = self
            .schemas
            .get(&driver)
            .map(|f| f.value().clone())
            .ok_or_else(|| RegistryError::UnknownDriver {
                driver: driver.clone(),
            })?;

        factory(connection).map_err(|e| {
            RegistryError::Internal(format!("Failed to build {} schema: {:#}", driver, e))
        })
    }

    /// Drivers with a registered connection factory, sorted
    pub fn drivers(&self) -> Vec<String> {
        let mut drivers: Vec<String> = self.connections.iter().map(|e| e.key().clone()).collect();
        drivers.sort();
        drivers
    }

    pub fn has_schema(&self, driver: &str) -> bool {
        self.schemas.contains_key(driver)
    }
}

impl Default for DriverExtensionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_unique<T>(
    map: &DashMap<String, T>,
    driver: &str,
    kind: &'static str,
    factory: T,
) -> Result<()> {
    match map.entry(driver.to_string()) {
        Entry::Occupied(_) => Err(RegistryError::DuplicateDriver {
            driver: driver.to_string(),
            kind,
        }),
        Entry::Vacant(entry) => {
            entry.insert(factory);
            info!("Registered {} factory for driver: {}", kind, driver);
            Ok(())
        }
    }
}
