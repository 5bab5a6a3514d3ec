//! Company ↔ industrial-sector membership.
//!
//! A batch of `{industrial_sector_id, action}` items is turned into one write
//! per item (`add` inserts, `remove` deletes), dispatched concurrently, and
//! answered position by position in input order. Unknown actions issue no
//! write and answer `None`.

use std::sync::Arc;

use anyhow::Context;
use futures::future::{join_all, try_join_all};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use tracing::{debug, info_span, warn, Instrument, Span};
use uuid::Uuid;

use crate::config::KeyType;
use crate::error::{Result, WriteError};
use crate::executor::{QueryExecutor, Row, SqlParam, Statement};
use crate::shape;

pub const SECTOR_KEY: &str = "industrial_sector_id";
pub const ACTION_KEY: &str = "action";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectorAction {
    Add,
    Remove,
}

impl SectorAction {
    pub fn parse(action: &str) -> Option<Self> {
        match action {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    fn statement(self, company_id: &str, sector_id: &str, keys: KeyType) -> Statement {
        let company = keys.placeholder(1);
        let sector = keys.placeholder(2);
        let sql = match self {
            Self::Add => format!(
                "INSERT INTO business_industrials_sector (company_id, industrial_id)
        VALUES ({company}, {sector})
        RETURNING id, company_id, industrial_id"
            ),
            Self::Remove => format!(
                "DELETE FROM business_industrials_sector
        WHERE company_id = {company} AND industrial_id = {sector}
        RETURNING id, company_id, industrial_id"
            ),
        };
        Statement::new(
            sql,
            vec![SqlParam::text(company_id), SqlParam::text(sector_id)],
        )
    }
}

/// Per-item result when the batch reports instead of aborting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Applied { rows: Vec<Row> },
    Skipped { action: String },
    Failed { message: String },
}

/// Validate the batch and build one optional write per item, in input order.
pub fn plan(company_id: &str, items: &Value, keys: KeyType) -> Result<Vec<Option<Statement>>> {
    shape::check(items, &[SECTOR_KEY, ACTION_KEY])?;
    if company_id.trim().is_empty() {
        return Err(WriteError::validation(
            "'company_id' is required and must be a string",
        ));
    }

    // Shape check guarantees an array of objects with string values.
    let items = items.as_array().map(Vec::as_slice).unwrap_or_default();
    Ok(items
        .iter()
        .map(|item| {
            let sector_id = item[SECTOR_KEY].as_str().unwrap_or_default();
            let action = item[ACTION_KEY].as_str().unwrap_or_default();
            match SectorAction::parse(action) {
                Some(parsed) => Some(parsed.statement(company_id, sector_id, keys)),
                None => {
                    warn!(
                        company_id,
                        sector_id, action, "unrecognized sector action, no write issued"
                    );
                    None
                }
            }
        })
        .collect())
}

/// Apply the batch; the first failing write fails the whole call.
///
/// Each write runs as its own task, so writes already sent keep going after
/// a failure ends the wait. Nothing is rolled back.
pub async fn reconcile(
    executor: &Arc<dyn QueryExecutor>,
    company_id: &str,
    items: &Value,
    keys: KeyType,
) -> Result<Vec<Option<Vec<Row>>>> {
    let planned = plan(company_id, items, keys)?;
    let span = info_span!("reconcile", batch_id = %Uuid::new_v4(), company_id, items = planned.len());

    async move {
        let writes: Vec<_> = planned
            .into_iter()
            .map(|statement| {
                statement.map(|statement| {
                    let executor = Arc::clone(executor);
                    tokio::spawn(
                        async move { statement.run(executor.as_ref()).await }
                            .instrument(Span::current()),
                    )
                })
            })
            .collect();
        let results = try_join_all(writes.into_iter().map(joined)).await?;
        debug!("sector batch applied");
        Ok::<_, WriteError>(results)
    }
    .instrument(span)
    .await
}

async fn joined(
    write: Option<JoinHandle<anyhow::Result<Vec<Row>>>>,
) -> anyhow::Result<Option<Vec<Row>>> {
    match write {
        Some(handle) => Ok(Some(handle.await.context("sector write task failed")??)),
        None => Ok(None),
    }
}

/// Apply the batch, letting every write finish and reporting each one.
pub async fn reconcile_report(
    executor: &dyn QueryExecutor,
    company_id: &str,
    items: &Value,
    keys: KeyType,
) -> Result<Vec<ItemOutcome>> {
    let planned = plan(company_id, items, keys)?;
    let actions: Vec<String> = items
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|item| item[ACTION_KEY].as_str().unwrap_or_default().to_string())
                .collect()
        })
        .unwrap_or_default();
    let span = info_span!("reconcile_report", batch_id = %Uuid::new_v4(), company_id, items = planned.len());

    async move {
        let writes = planned
            .iter()
            .zip(actions)
            .map(|(statement, action)| async move {
                match statement {
                    None => ItemOutcome::Skipped { action },
                    Some(statement) => match statement.run(executor).await {
                        Ok(rows) => ItemOutcome::Applied { rows },
                        Err(e) => {
                            warn!(error = %e, "sector write failed");
                            ItemOutcome::Failed {
                                message: e.to_string(),
                            }
                        }
                    },
                }
            });
        Ok::<_, WriteError>(join_all(writes).await)
    }
    .instrument(span)
    .await
}

/// Link a company to every listed sector.
pub async fn attach_sectors(
    executor: &Arc<dyn QueryExecutor>,
    company_id: &str,
    sector_ids: &[String],
    keys: KeyType,
) -> Result<Vec<Option<Vec<Row>>>> {
    let items: Vec<Value> = sector_ids
        .iter()
        .map(|id| json!({ SECTOR_KEY: id, ACTION_KEY: "add" }))
        .collect();
    reconcile(executor, company_id, &Value::Array(items), keys).await
}
