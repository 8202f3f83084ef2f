//! errors.rs - Custom error types for the statlab-core library.
//!
//! Recompute functions distinguish structural problems with the submitted
//! tables (a missing column, a value that must be numeric but is not) from
//! everything else, so the interaction layer can render them inline.
//!
//! License: MIT OR APACHE 2.0

use serde::Serialize;
use statlab_numeric::NumericError;
use thiserror::Error;

/// This enum represents all possible error types in the `statlab-core` library.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StatlabError {
    #[error("Input data must contain a '{column}' column")]
    MissingField { column: String },

    #[error("Invalid value in '{column}': {detail}")]
    InvalidValue { column: String, detail: String },

    #[error("This page has no table named '{0}'")]
    UnknownTable(String),

    #[error("Numerical routine failed: {0}")]
    Numeric(#[from] NumericError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to render page '{0}': {1}")]
    Template(String, String),

    #[error("Failed to decode request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Coarse classification shown to the user next to an inline error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingField,
    InvalidValue,
    Other,
}

impl StatlabError {
    pub fn missing(column: impl Into<String>) -> Self {
        StatlabError::MissingField { column: column.into() }
    }

    pub fn invalid(column: impl Into<String>, detail: impl Into<String>) -> Self {
        StatlabError::InvalidValue { column: column.into(), detail: detail.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StatlabError::MissingField { .. } => ErrorKind::MissingField,
            StatlabError::InvalidValue { .. } | StatlabError::Payload(_) => ErrorKind::InvalidValue,
            _ => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, StatlabError>;
