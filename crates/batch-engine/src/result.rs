//! Per-item result envelope and the batch response object
//!
//! Every processed item is tagged success or failure without raising, so
//! downstream consumers always see a uniform shape. `BatchOutcome` is the
//! `{ results, stats }` object handed back to the caller.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ItemError;
use crate::stats::BatchStatistics;

/// One processed item: either the transformed value or a classified error,
/// in both cases carrying the batch index it was produced at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ItemResult {
    /// The transform completed
    #[serde(rename_all = "camelCase")]
    Ok { index: usize, value: Value },
    /// The item failed (sibling resolution or transform)
    Err(ItemError),
}

impl ItemResult {
    pub fn ok(index: usize, value: Value) -> Self {
        Self::Ok { index, value }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// The batch index this result was produced at.
    pub fn index(&self) -> usize {
        match self {
            Self::Ok { index, .. } => *index,
            Self::Err(err) => err.index,
        }
    }

    /// The transformed value, if this item succeeded.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Ok { value, .. } => Some(value),
            Self::Err(_) => None,
        }
    }

    /// The error, if this item failed.
    pub fn error(&self) -> Option<&ItemError> {
        match self {
            Self::Ok { .. } => None,
            Self::Err(err) => Some(err),
        }
    }
}

impl From<ItemError> for ItemResult {
    fn from(err: ItemError) -> Self {
        Self::Err(err)
    }
}

/// A finished batch: the ordered result sequence plus its summary.
///
/// A batch always returns this object, never an error, regardless of how
/// many individual items failed; callers inspect `stats.failed` and react.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<ItemResult>,
    pub stats: BatchStatistics,
}
