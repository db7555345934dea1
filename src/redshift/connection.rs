use crate::redshift::DRIVER_NAME;
use crate::registry::{DbConnection, DriverConfig};
use deadpool_postgres::Pool;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Open Redshift connection: the pool plus the state schema wrappers need
pub struct RedshiftConnection {
    pool: Pool,
    config: DriverConfig,
}

impl RedshiftConnection {
    pub fn new(pool: Pool, config: DriverConfig) -> Self {
        Self { pool, config }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.config.schema
    }
}

impl fmt::Debug for RedshiftConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedshiftConnection")
            .field("host", &self.config.host)
            .field("database", &self.config.database)
            .field("prefix", &self.config.prefix)
            .finish_non_exhaustive()
    }
}

impl DbConnection for RedshiftConnection {
    fn driver(&self) -> &str {
        DRIVER_NAME
    }

    fn database(&self) -> &str {
        &self.config.database
    }

    fn table_prefix(&self) -> &str {
        &self.config.prefix
    }

    fn config(&self) -> &DriverConfig {
        &self.config
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}
