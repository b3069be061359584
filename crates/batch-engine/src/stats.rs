//! Batch statistics
//!
//! A read-only post-pass over a finished result sequence. Never runs
//! concurrently with item processing and holds no identity of its own.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{ErrorKind, ItemError};
use crate::result::ItemResult;

/// How many failed items are kept verbatim in `sample_errors`.
/// The error breakdown always covers the full sequence.
pub const SAMPLE_ERROR_LIMIT: usize = 5;

/// Summary of one finished batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub failure_rate: f64,
    /// Occurrence count per error kind across all failed items.
    pub error_breakdown: HashMap<ErrorKind, usize>,
    /// The first few failures in original order, for human-readable
    /// diagnostics.
    pub sample_errors: Vec<ItemError>,
}

impl BatchStatistics {
    /// Summarize a finished result sequence.
    ///
    /// An empty sequence is trivially fully successful: rates are defined
    /// as 1.0 / 0.0 rather than dividing by zero.
    pub fn summarize(results: &[ItemResult]) -> Self {
        let total = results.len();
        let mut error_breakdown: HashMap<ErrorKind, usize> = HashMap::new();
        let mut sample_errors = Vec::new();

        for result in results {
            if let Some(err) = result.error() {
                *error_breakdown.entry(err.kind).or_insert(0) += 1;
                if sample_errors.len() < SAMPLE_ERROR_LIMIT {
                    sample_errors.push(err.clone());
                }
            }
        }

        let failed: usize = error_breakdown.values().sum();
        let successful = total - failed;
        let success_rate = if total == 0 {
            1.0
        } else {
            successful as f64 / total as f64
        };

        Self {
            total,
            successful,
            failed,
            success_rate,
            failure_rate: 1.0 - success_rate,
            error_breakdown,
            sample_errors,
        }
    }
}
