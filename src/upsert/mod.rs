//! Upsert decision layer.
//!
//! Each entity kind decides, from which fields are present, whether a request
//! creates a row or updates one, validates the fields that variant needs, and
//! builds exactly one statement. The decision ([`Intent`]) is separate from
//! the SQL so it can be tested on its own.

use std::fmt;

use tracing::debug;

use crate::config::KeyType;
use crate::error::Result;
use crate::executor::{QueryExecutor, Row, Statement};
use crate::fields::Fields;

pub mod branch;
pub mod company;
pub mod navigation;
pub mod section;

pub use branch::Branch;
pub use company::Company;
pub use navigation::Navigation;
pub use section::Section;

/// Which statement shape a request maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    /// Update of a single column, matched by identifier only.
    PartialUpdate,
    /// Update of every mutable column, matched by identifier and company.
    FullUpdate,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "create",
            Self::PartialUpdate => "partial-update",
            Self::FullUpdate => "full-update",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Branch,
    Section,
    Navigation,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [Self::Company, Self::Branch, Self::Section, Self::Navigation];

    /// Statement builder for this kind.
    pub fn writer(self) -> &'static dyn EntityWriter {
        match self {
            Self::Company => &Company,
            Self::Branch => &Branch,
            Self::Section => &Section,
            Self::Navigation => &Navigation,
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::Branch => "business_branches",
            Self::Section => "business_sections",
            Self::Navigation => "business_navigation_content",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Company => "company",
            Self::Branch => "branch",
            Self::Section => "business section",
            Self::Navigation => "navigation entry",
        })
    }
}

/// Per-kind decision and statement construction.
pub trait EntityWriter: Send + Sync {
    fn kind(&self) -> EntityKind;

    /// Pick the statement shape from field presence.
    fn intent(&self, fields: &Fields) -> Result<Intent>;

    /// Validate what `intent` requires and build its statement.
    fn build(&self, intent: Intent, fields: &Fields, keys: KeyType) -> Result<Statement>;

    fn plan(&self, fields: &Fields, keys: KeyType) -> Result<(Intent, Statement)> {
        let intent = self.intent(fields)?;
        let statement = self.build(intent, fields, keys)?;
        Ok((intent, statement))
    }
}

/// Validate, build, and dispatch one write for `kind`.
///
/// Validation failures return before the executor is touched; executor rows
/// are passed back as-is.
pub async fn upsert(
    executor: &dyn QueryExecutor,
    kind: EntityKind,
    fields: &Fields,
    keys: KeyType,
) -> Result<Vec<Row>> {
    let (intent, statement) = kind.writer().plan(fields, keys)?;
    debug!(
        entity = %kind,
        %intent,
        params = statement.params.len(),
        "dispatching {} statement",
        kind.table()
    );
    Ok(statement.run(executor).await?)
}
