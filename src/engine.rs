//! Entry point bundling an executor with the key type used in statements.

use std::sync::Arc;

use serde_json::Value;

use crate::config::KeyType;
use crate::error::Result;
use crate::executor::{QueryExecutor, Row};
use crate::fields::Fields;
use crate::reconcile::{self, ItemOutcome};
use crate::upsert::{self, EntityKind};

/// Stateless write engine; cheap to clone and share across requests.
#[derive(Clone)]
pub struct WriteEngine {
    executor: Arc<dyn QueryExecutor>,
    keys: KeyType,
}

impl WriteEngine {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self {
            executor,
            keys: KeyType::default(),
        }
    }

    pub fn with_key_type(mut self, keys: KeyType) -> Self {
        self.keys = keys;
        self
    }

    pub async fn upsert(&self, kind: EntityKind, fields: &Fields) -> Result<Vec<Row>> {
        upsert::upsert(self.executor.as_ref(), kind, fields, self.keys).await
    }

    /// Returns the company identifier row (generated or echoed).
    pub async fn register_company(&self, fields: &Fields) -> Result<Vec<Row>> {
        self.upsert(EntityKind::Company, fields).await
    }

    pub async fn setup_branch(&self, fields: &Fields) -> Result<Vec<Row>> {
        self.upsert(EntityKind::Branch, fields).await
    }

    pub async fn setup_section(&self, fields: &Fields) -> Result<Vec<Row>> {
        self.upsert(EntityKind::Section, fields).await
    }

    pub async fn setup_navigation(&self, fields: &Fields) -> Result<Vec<Row>> {
        self.upsert(EntityKind::Navigation, fields).await
    }

    pub async fn reconcile_sectors(
        &self,
        company_id: &str,
        items: &Value,
    ) -> Result<Vec<Option<Vec<Row>>>> {
        reconcile::reconcile(&self.executor, company_id, items, self.keys).await
    }

    pub async fn reconcile_sectors_report(
        &self,
        company_id: &str,
        items: &Value,
    ) -> Result<Vec<ItemOutcome>> {
        reconcile::reconcile_report(self.executor.as_ref(), company_id, items, self.keys).await
    }

    pub async fn attach_sectors(
        &self,
        company_id: &str,
        sector_ids: &[String],
    ) -> Result<Vec<Option<Vec<Row>>>> {
        reconcile::attach_sectors(&self.executor, company_id, sector_ids, self.keys).await
    }
}
