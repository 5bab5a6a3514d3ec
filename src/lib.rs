//! bizdir - write side of a multi-tenant business directory.
//!
//! Registers companies, branches, page sections and navigation entries, and
//! reconciles company ↔ industrial-sector membership. Every write goes through
//! a [`QueryExecutor`]; the engine itself keeps no state between calls.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bizdir::{Fields, RecordingExecutor, WriteEngine};
//!
//! # async fn demo() -> bizdir::Result<()> {
//! let engine = WriteEngine::new(Arc::new(RecordingExecutor::new()));
//! let branch = Fields::from_value(serde_json::json!({
//!     "company_id": "c1",
//!     "name": "North",
//!     "is_hq": true,
//!     "address": {"street": "Main"},
//! }))?;
//! let rows = engine.setup_branch(&branch).await?;
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

pub mod config;
pub mod engine;
pub mod executor;
pub mod fields;
pub mod reconcile;
pub mod shape;
pub mod upsert;

// REST surface (when enabled)
#[cfg(feature = "server")]
pub mod api;

pub use config::{KeyType, ServerConfig};
pub use engine::WriteEngine;
pub use error::{Result, WriteError};
pub use executor::{QueryExecutor, RecordingExecutor, Row, SqlParam, Statement};
pub use fields::Fields;
pub use reconcile::ItemOutcome;
pub use upsert::{EntityKind, Intent};

#[cfg(feature = "database")]
pub use executor::PgExecutor;
