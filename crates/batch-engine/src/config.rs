//! Batch configuration
//!
//! A small set of named toggles that alter processor behavior. Parsed
//! permissively from JSON node data: unrecognized flags are ignored so
//! that configs written for newer engine versions still load.

use serde::{Deserialize, Serialize};

use crate::error::{BatchError, Result};

/// Toggles for one batch run.
///
/// Defaults are the safe ones: process every item, keep the 1:1
/// input/output pairing, stay quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BatchConfig {
    /// Abort iteration on the first failed item, returning a truncated
    /// result sequence. See `BatchProcessor::process` for the contract.
    pub stop_on_error: bool,
    /// Keep one result per input at the same position. When false, failed
    /// items are dropped from the returned sequence and positional
    /// alignment with the inputs is lost.
    pub maintain_pairing: bool,
    /// Emit one diagnostic log line per failed item.
    pub log_errors: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            stop_on_error: false,
            maintain_pairing: true,
            log_errors: false,
        }
    }
}

impl BatchConfig {
    /// Parse a configuration from loosely-typed node data.
    ///
    /// Missing flags take their defaults and unknown keys are ignored;
    /// a flag present with the wrong type is a hard error, caught once
    /// here before any item is processed.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| BatchError::Config(e.to_string()))
    }
}
