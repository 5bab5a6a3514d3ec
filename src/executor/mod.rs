//! Query executor boundary.
//!
//! The engine builds parameterized statements and hands them to a
//! [`QueryExecutor`]. It never retries and never inspects driver errors.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

#[cfg(feature = "database")]
pub mod postgres;
pub mod recording;

#[cfg(feature = "database")]
pub use postgres::PgExecutor;
pub use recording::{RecordedCall, RecordingExecutor};

/// One returned row, column name to value.
pub type Row = Map<String, Value>;

/// Positional parameter for a `$n` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Bool(bool),
    Int(i64),
    /// Canonical JSON text; the statement casts it with `::jsonb`.
    Json(String),
}

impl SqlParam {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn json(object: &Map<String, Value>) -> Self {
        Self::Json(Value::Object(object.clone()).to_string())
    }

    /// The parameter as a JSON value, for logging and test doubles.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Text(s) | Self::Json(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(i) => Value::from(*i),
        }
    }
}

/// A statement ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    pub async fn run(&self, executor: &dyn QueryExecutor) -> Result<Vec<Row>> {
        executor.execute(&self.sql, &self.params).await
    }
}

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Send one statement and return its rows; fails on any store error.
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>>;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        (**self).execute(sql, params).await
    }
}
