//! In-memory [`QueryExecutor`] that records statements instead of running them.
//!
//! Used by the tests and for dry runs of the engine without a database.
//! By default each call returns one row echoing its call index and bound
//! parameters.

use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{QueryExecutor, Row, SqlParam};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl RecordedCall {
    /// First SQL keyword, upper-cased (`INSERT`, `UPDATE`, `DELETE`).
    pub fn verb(&self) -> String {
        self.sql
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }
}

#[derive(Debug)]
enum Failure {
    OnCall(usize),
    SqlContains(String),
    ParamEquals(String),
}

#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedCall>>,
    completed: Mutex<Vec<RecordedCall>>,
    rows: Option<Vec<Row>>,
    failures: Vec<(Failure, String)>,
    delays: Vec<(String, Duration)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these rows from every call instead of the echo row.
    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Fail the `n`-th call (zero based, in dispatch order).
    pub fn fail_on_call(mut self, n: usize, message: impl Into<String>) -> Self {
        self.failures.push((Failure::OnCall(n), message.into()));
        self
    }

    pub fn fail_when_sql_contains(
        mut self,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.failures
            .push((Failure::SqlContains(pattern.into()), message.into()));
        self
    }

    /// Fail any call binding a text parameter equal to `value`.
    pub fn fail_when_param(mut self, value: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures
            .push((Failure::ParamEquals(value.into()), message.into()));
        self
    }

    /// Hold back the reply of calls binding a text parameter equal to `value`.
    pub fn delay_when_param(mut self, value: impl Into<String>, delay: Duration) -> Self {
        self.delays.push((value.into(), delay));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        lock(&self.calls).last().cloned()
    }

    /// Calls that ran to the end and returned rows, in completion order.
    pub fn completed(&self) -> Vec<RecordedCall> {
        lock(&self.completed).clone()
    }
}

fn lock(log: &Mutex<Vec<RecordedCall>>) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
    // A poisoned lock only means a test panicked mid-call; the log is still usable.
    log.lock().unwrap_or_else(|e| e.into_inner())
}

fn binds_text(params: &[SqlParam], value: &str) -> bool {
    params
        .iter()
        .any(|p| matches!(p, SqlParam::Text(s) if s == value))
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, sql: &str, params: &[SqlParam]) -> Result<Vec<Row>> {
        let call = RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
        };
        let index = {
            let mut calls = lock(&self.calls);
            calls.push(call.clone());
            calls.len() - 1
        };

        let delay = self
            .delays
            .iter()
            .filter(|(value, _)| binds_text(params, value))
            .map(|(_, d)| *d)
            .max();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        for (failure, message) in &self.failures {
            let hit = match failure {
                Failure::OnCall(n) => *n == index,
                Failure::SqlContains(pattern) => sql.contains(pattern.as_str()),
                Failure::ParamEquals(value) => binds_text(params, value),
            };
            if hit {
                return Err(anyhow!("{message}"));
            }
        }

        lock(&self.completed).push(call);

        if let Some(rows) = &self.rows {
            return Ok(rows.clone());
        }

        let echoed: Vec<Value> = params.iter().map(SqlParam::to_value).collect();
        let row = json!({ "call": index, "params": echoed });
        Ok(row.as_object().cloned().into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_in_order() {
        let exec = RecordingExecutor::new();
        exec.execute("INSERT INTO t VALUES ($1)", &[SqlParam::text("a")])
            .await
            .unwrap();
        exec.execute("DELETE FROM t", &[]).await.unwrap();

        let calls = exec.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].verb(), "INSERT");
        assert_eq!(calls[1].verb(), "DELETE");
    }

    #[tokio::test]
    async fn echo_row_carries_call_index_and_params() {
        let exec = RecordingExecutor::new();
        let rows = exec
            .execute("SELECT $1, $2", &[SqlParam::text("x"), SqlParam::Bool(true)])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["call"], json!(0));
        assert_eq!(rows[0]["params"], json!(["x", true]));
    }

    #[tokio::test]
    async fn injected_failures_still_record_the_call() {
        let exec = RecordingExecutor::new().fail_when_sql_contains("DELETE", "boom");
        let err = exec.execute("DELETE FROM t", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert_eq!(exec.call_count(), 1);
        assert!(exec.completed().is_empty());
    }

    #[tokio::test]
    async fn fixed_rows_replace_echo() {
        let row = json!({"id": "c-1"}).as_object().cloned().unwrap();
        let exec = RecordingExecutor::new().with_rows(vec![row.clone()]);
        let rows = exec.execute("INSERT", &[]).await.unwrap();
        assert_eq!(rows, vec![row]);
    }
}
