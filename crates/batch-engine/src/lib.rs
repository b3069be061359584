//! Batch Engine - paired batch processing with per-item failure isolation
//!
//! This crate is the processing core of feedflow: it applies a
//! caller-supplied transform to an ordered list of records while
//!
//! - preserving a 1:1 positional correspondence between inputs and results
//! - isolating per-item failures so one bad record never aborts the batch
//! - optionally pulling position-aligned data from named sibling sources
//! - accumulating success/failure statistics over the finished sequence
//!
//! Batching, retries, and scheduling belong to the surrounding workflow
//! host; the engine treats "fetch rows from node X" as an injected
//! [`SiblingSource`] capability and performs no I/O of its own.
//!
//! # Example
//!
//! ```ignore
//! use batch_engine::{BatchConfig, BatchProcessor, FnTransform, SiblingSources};
//!
//! let processor = BatchProcessor::new(BatchConfig::default());
//! let transform = FnTransform::new(|record, _index, _siblings| {
//!     Ok(record.clone())
//! });
//! let outcome = processor
//!     .process(&inputs, &transform, &SiblingSources::new())
//!     .await;
//! println!("{}/{} succeeded", outcome.stats.successful, outcome.stats.total);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod processor;
pub mod record;
pub mod result;
pub mod siblings;
pub mod stats;

// Re-export key types
pub use config::BatchConfig;
pub use error::{BatchError, ErrorKind, ItemError, Result, SiblingError, TransformError};
pub use events::{BatchEvent, EventSink, NullEventSink, VecEventSink};
pub use processor::{BatchProcessor, FnTransform, ItemTransform};
pub use result::{BatchOutcome, ItemResult};
pub use siblings::{FnSource, SiblingSource, SiblingSources, SiblingValues, VecSource};
pub use stats::{BatchStatistics, SAMPLE_ERROR_LIMIT};
