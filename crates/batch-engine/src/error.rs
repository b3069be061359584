//! Error types for the batch engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using BatchError
pub type Result<T> = std::result::Result<T, BatchError>;

/// Classification of per-item failures.
///
/// Kinds are deliberately coarse: they drive the error breakdown in
/// [`crate::stats::BatchStatistics`] and let callers route failures
/// without matching on message strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    /// The transform rejected the record (missing/malformed required fields)
    Validation,
    /// A registered sibling-source lookup failed before the transform ran
    SiblingResolution,
    /// Any other failure raised inside the transform
    Processing,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::SiblingResolution => write!(f, "sibling-resolution"),
            Self::Processing => write!(f, "processing"),
        }
    }
}

/// A failed item's envelope payload: kind, message, and the batch index
/// the failure occurred at.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("item {index}: {kind}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct ItemError {
    pub kind: ErrorKind,
    pub message: String,
    pub index: usize,
}

impl ItemError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            index,
        }
    }
}

/// Failure returned by an [`crate::processor::ItemTransform`].
///
/// This is the boundary where untyped failures become classified ones:
/// transforms return `Err(TransformError)` instead of panicking, and the
/// processor stamps the batch index on when wrapping it into an
/// [`ItemError`].
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TransformError {
    pub kind: ErrorKind,
    pub message: String,
}

impl TransformError {
    /// A validation failure: the record is missing or has malformed fields.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: msg.into(),
        }
    }

    /// A generic processing failure.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Processing,
            message: msg.into(),
        }
    }

    /// Stamp a batch index on, producing the per-item envelope error.
    pub fn at_index(self, index: usize) -> ItemError {
        ItemError::new(self.kind, self.message, index)
    }
}

impl From<serde_json::Error> for TransformError {
    fn from(err: serde_json::Error) -> Self {
        Self::failed(err.to_string())
    }
}

/// Failure raised by a [`crate::siblings::SiblingSource`] lookup.
///
/// Distinct from legitimate absence: a source returning `Ok(None)` means
/// the aligned collection has no entry at that index, which is not an error.
#[derive(Debug, Clone, Error)]
#[error("sibling source '{source_name}': {message}")]
pub struct SiblingError {
    pub source_name: String,
    pub message: String,
}

impl SiblingError {
    pub fn new(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            message: message.into(),
        }
    }
}

/// Top-level errors.
///
/// Per-item failures never surface here; they are converted into
/// [`ItemError`] entries inside the result sequence. `BatchError` is
/// reserved for programmer errors detected before any item is processed.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Batch configuration could not be parsed
    #[error("Invalid batch configuration: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
