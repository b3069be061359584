//! Feed Nodes
//!
//! Helper transforms for the feedflow batch engine. Each module is a
//! small, stateless "code node" building block: feed data in, normalized
//! data, SQL strings, or chat payloads out. The workflow host wires them
//! together and supplies batching, retries, and scheduling.
//!
//! # Modules
//!
//! - `sql`: parameterized SQL string generation and literal escaping
//! - `text`: HTML stripping and text cleanup
//! - `duration`: duration and publish-date parsing
//! - `filename`: download filename sanitization
//! - `message`: chat-message block payload construction
//! - `ingest`: the feed-item transform tying the above to the engine

pub mod duration;
pub mod filename;
pub mod ingest;
pub mod message;
pub mod sql;
pub mod text;

pub use ingest::{FeedIngestConfig, FeedItemTransform};
pub use message::MessageBuilder;
