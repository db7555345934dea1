//! Redshift schema introspection
//!
//! Queries `information_schema` through the connection's pool. Only tables
//! carrying the connection's table prefix are reported.

use crate::error::{RegistryError, Result};
use crate::redshift::RedshiftConnection;
use crate::registry::{DbConnection, SchemaIntrospector};
use async_trait::async_trait;
use deadpool_postgres::Client;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub default: Option<String>,
}

pub struct RedshiftSchema {
    connection: Arc<dyn DbConnection>,
    redshift: Arc<RedshiftConnection>,
}

impl RedshiftSchema {
    /// Wrap an open connection; fails if it was not opened by the redshift driver
    pub fn new(connection: Arc<dyn DbConnection>) -> anyhow::Result<Self> {
        let redshift = connection
            .clone()
            .into_any()
            .downcast::<RedshiftConnection>()
            .map_err(|_| {
                anyhow::anyhow!(
                    "expected a redshift connection, got driver '{}'",
                    connection.driver()
                )
            })?;

        Ok(Self {
            connection,
            redshift,
        })
    }

    async fn client(&self) -> Result<Client> {
        self.redshift
            .pool()
            .get()
            .await
            .map_err(|e| RegistryError::ConnectionFailed {
                database: self.connection.database().to_string(),
                cause: e.to_string(),
            })
    }

    fn query_failed(&self, query: &str, e: tokio_postgres::Error) -> RegistryError {
        RegistryError::QueryFailed {
            database: self.connection.database().to_string(),
            query: query.to_string(),
            cause: e.to_string(),
        }
    }

    /// Round trip to the cluster
    pub async fn ping(&self) -> Result<()> {
        let client = self.client().await?;
        client
            .execute("SELECT 1", &[])
            .await
            .map_err(|e| self.query_failed("ping", e))?;
        Ok(())
    }

    pub async fn columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let client = self.client().await?;

        let rows = client
            .query(
                r#"
                SELECT column_name::text, data_type::text, is_nullable::text, column_default::text
                FROM information_schema.columns
                WHERE table_schema = $1
                AND table_name = $2
                ORDER BY ordinal_position
                "#,
                &[&self.default_schema(), &table],
            )
            .await
            .map_err(|e| self.query_failed("columns", e))?;

        Ok(rows
            .iter()
            .map(|r| ColumnInfo {
                name: r.get(0),
                data_type: r.get(1),
                nullable: r.get::<_, String>(2) == "YES",
                default: r.get(3),
            })
            .collect())
    }
}

#[async_trait]
impl SchemaIntrospector for RedshiftSchema {
    fn connection(&self) -> &Arc<dyn DbConnection> {
        &self.connection
    }

    fn default_schema(&self) -> &str {
        self.redshift.schema()
    }

    fn quote_name(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let client = self.client().await?;
        let pattern = format!("{}%", escape_like(self.connection.table_prefix()));

        let rows = client
            .query(
                r#"
                SELECT table_name::text
                FROM information_schema.tables
                WHERE table_schema = $1
                AND table_type = 'BASE TABLE'
                AND table_name LIKE $2
                ORDER BY table_name
                "#,
                &[&self.default_schema(), &pattern],
            )
            .await
            .map_err(|e| self.query_failed("table_names", e))?;

        Ok(rows.iter().map(|r| r.get(0)).collect())
    }
}

/// Escape LIKE wildcards so a prefix such as `df_` matches literally
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
