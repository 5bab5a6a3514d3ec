//! Postgres-backed [`QueryExecutor`].
//!
//! Statements are wrapped in a data-modifying CTE and their `RETURNING`
//! projection is read back with `to_jsonb`, so no per-table row type is
//! needed. All SQL is runtime-checked (`sqlx::query_scalar`, not the macros).

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{error, info, warn};

use super::{QueryExecutor, Row, SqlParam};
use crate::config::{mask_database_url, DatabaseConfig};

#[derive(Debug, Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        info!(
            "Connecting to database: {}",
            mask_database_url(&config.database_url)
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connection_timeout)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Wrap a writing statement so each returned row comes back as one JSON object.
pub(crate) fn wrap_returning(sql: &str) -> String {
    let body = sql.trim().trim_end_matches(';').trim_end();
    format!("WITH written AS ({body}) SELECT to_jsonb(written) FROM written")
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        let wrapped = wrap_returning(sql);
        let mut query = sqlx::query_scalar::<_, Value>(&wrapped);
        for param in params {
            query = match param {
                SqlParam::Text(s) | SqlParam::Json(s) => query.bind(s.as_str()),
                SqlParam::Bool(b) => query.bind(*b),
                SqlParam::Int(i) => query.bind(*i),
            };
        }

        let values = query.fetch_all(&self.pool).await.map_err(|e| {
            error!("Error in query execution: {}", e);
            anyhow!(e)
        })?;

        values
            .into_iter()
            .map(|value| match value {
                Value::Object(row) => Ok(row),
                other => Err(anyhow!("expected a row object, got {other}")),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_strips_trailing_semicolon() {
        assert_eq!(
            wrap_returning("  INSERT INTO t (a) VALUES ($1) RETURNING *;\n"),
            "WITH written AS (INSERT INTO t (a) VALUES ($1) RETURNING *) SELECT to_jsonb(written) FROM written"
        );
    }
}
