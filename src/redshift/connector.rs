use crate::redshift::RedshiftConnection;
use crate::registry::DriverConfig;
use anyhow::Context;
use deadpool_postgres::{Config as PoolConfig, Pool, Runtime};
use std::time::Duration;
use tokio_postgres::NoTls;
use tracing::debug;

/// Builds Redshift connections over the PostgreSQL wire protocol
pub struct RedshiftConnector;

impl RedshiftConnector {
    pub fn new() -> Self {
        Self
    }

    /// Create the connection's pool. No round trip happens until first use.
    pub fn connect(&self, config: &DriverConfig) -> anyhow::Result<RedshiftConnection> {
        let url = connection_url(config);
        let pool = create_pool(&url, config)
            .with_context(|| format!("Failed to create pool for {}", config.database))?;

        debug!(
            "Created redshift pool for {}:{}/{} (max {} connections)",
            config.host, config.port, config.database, config.max_connections
        );

        Ok(RedshiftConnection::new(pool, config.clone()))
    }
}

impl Default for RedshiftConnector {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn connection_url(config: &DriverConfig) -> String {
    // URL-encode credentials to handle special characters
    let user = urlencoding::encode(&config.username);
    let credentials = if config.password.is_empty() {
        user.into_owned()
    } else {
        format!("{}:{}", user, urlencoding::encode(&config.password))
    };

    let mut url = format!(
        "postgres://{}@{}:{}/{}",
        credentials,
        config.host,
        config.port,
        urlencoding::encode(&config.database)
    );

    let mut params = vec![format!("connect_timeout={}", config.connect_timeout_secs)];
    for (key, value) in &config.options {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        params.push(format!(
            "{}={}",
            urlencoding::encode(key),
            urlencoding::encode(&value)
        ));
    }
    url.push('?');
    url.push_str(&params.join("&"));
    url
}

fn create_pool(database_url: &str, config: &DriverConfig) -> anyhow::Result<Pool> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);

    let mut cfg = PoolConfig::new();
    cfg.url = Some(database_url.to_string());

    cfg.pool = Some(deadpool_postgres::PoolConfig {
        max_size: config.max_connections as usize,
        timeouts: deadpool_postgres::Timeouts {
            wait: Some(timeout),
            create: Some(timeout),
            recycle: Some(timeout),
        },
        ..Default::default()
    });

    Ok(cfg.create_pool(Some(Runtime::Tokio1), NoTls)?)
}
