//! Error taxonomy for the write engine.
//!
//! Input problems are detected before any statement reaches the
//! [`QueryExecutor`](crate::executor::QueryExecutor); executor failures are
//! carried through untouched.

use thiserror::Error;

use crate::shape::ShapeViolation;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid items: {0}")]
    Shape(#[from] ShapeViolation),

    #[error("execution failed: {0}")]
    Execution(#[from] anyhow::Error),
}

impl WriteError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Shape(_))
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::Shape(_) => 400,
            Self::Execution(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, WriteError>;
