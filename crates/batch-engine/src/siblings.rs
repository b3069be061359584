//! Sibling-source resolution
//!
//! A sibling source is a named, position-aligned auxiliary collection: the
//! record paired with batch item `i` is whatever the source returns for
//! index `i`. Sources are injected explicitly rather than captured from
//! ambient platform context, so the processor has no hidden environment
//! dependency and resolution is trivially testable in isolation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SiblingError;

/// Resolved sibling values for one batch index, keyed by source name.
///
/// `None` means the source legitimately has no entry at that index (a
/// sibling collection may be shorter than the primary batch).
pub type SiblingValues = HashMap<String, Option<Value>>;

/// A position-aligned auxiliary data source.
///
/// Implementations must be idempotent and side-effect-free for a given
/// index within one batch run; diagnostics may re-invoke them.
#[async_trait]
pub trait SiblingSource: Send + Sync {
    /// Fetch the record aligned to `index`.
    ///
    /// `Ok(None)` is legitimate absence; `Err` is a resolution failure and
    /// fails the whole item at that index.
    async fn fetch(&self, index: usize) -> Result<Option<Value>, SiblingError>;
}

/// A sibling source backed by an in-memory collection.
///
/// This is the common case on the platform: the output items of another
/// node, already materialized, aligned to the primary batch by position.
pub struct VecSource {
    items: Vec<Value>,
}

impl VecSource {
    pub fn new(items: Vec<Value>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl SiblingSource for VecSource {
    async fn fetch(&self, index: usize) -> Result<Option<Value>, SiblingError> {
        Ok(self.items.get(index).cloned())
    }
}

/// Closure adapter for ad-hoc sources.
pub struct FnSource<F>
where
    F: Fn(usize) -> Result<Option<Value>, SiblingError> + Send + Sync,
{
    lookup: F,
}

impl<F> FnSource<F>
where
    F: Fn(usize) -> Result<Option<Value>, SiblingError> + Send + Sync,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl<F> SiblingSource for FnSource<F>
where
    F: Fn(usize) -> Result<Option<Value>, SiblingError> + Send + Sync,
{
    async fn fetch(&self, index: usize) -> Result<Option<Value>, SiblingError> {
        (self.lookup)(index)
    }
}

/// Named registry of sibling sources for one batch run.
#[derive(Default)]
pub struct SiblingSources {
    sources: HashMap<String, Arc<dyn SiblingSource>>,
}

impl SiblingSources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under a name, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, source: Arc<dyn SiblingSource>) {
        self.sources.insert(name.into(), source);
    }

    /// Builder-style registration.
    pub fn with_source(mut self, name: impl Into<String>, source: Arc<dyn SiblingSource>) -> Self {
        self.register(name, source);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Resolve one named source at an index.
    pub async fn resolve(
        &self,
        name: &str,
        index: usize,
    ) -> Result<Option<Value>, SiblingError> {
        match self.sources.get(name) {
            Some(source) => source.fetch(index).await,
            None => Err(SiblingError::new(name, "source not registered")),
        }
    }

    /// Resolve every registered source at `index`.
    ///
    /// Fail-fast per item: the first source error aborts resolution for
    /// this index even if other sources would have succeeded. Each source
    /// is independent otherwise; absence from one does not affect another.
    pub async fn resolve_all(&self, index: usize) -> Result<SiblingValues, SiblingError> {
        let mut values = SiblingValues::with_capacity(self.sources.len());
        for (name, source) in &self.sources {
            let value = source.fetch(index).await?;
            values.insert(name.clone(), value);
        }
        Ok(values)
    }
}
