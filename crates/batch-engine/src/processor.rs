//! Pairing processor
//!
//! The central batch loop: for every input record, resolve its sibling
//! values, invoke the caller-supplied transform, and wrap the outcome in
//! the per-item envelope. The processor guarantees one result per input
//! at the same position and isolates per-item failures so one bad record
//! never aborts the batch (unless configured to).

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;

use crate::config::BatchConfig;
use crate::error::{ErrorKind, ItemError, TransformError};
use crate::events::{BatchEvent, EventSink, NullEventSink};
use crate::result::{BatchOutcome, ItemResult};
use crate::siblings::{SiblingSources, SiblingValues};
use crate::stats::BatchStatistics;

/// A per-record transformation.
///
/// Must not depend on the processing order of other items; it receives
/// the record, its batch index, and the sibling values already resolved
/// for that index. Failures are returned, never panicked: the processor
/// does not catch unwinds.
#[async_trait]
pub trait ItemTransform: Send + Sync {
    async fn apply(
        &self,
        record: &Value,
        index: usize,
        siblings: &SiblingValues,
    ) -> Result<Value, TransformError>;
}

/// Closure adapter for synchronous transforms.
pub struct FnTransform<F>
where
    F: Fn(&Value, usize, &SiblingValues) -> Result<Value, TransformError> + Send + Sync,
{
    transform: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&Value, usize, &SiblingValues) -> Result<Value, TransformError> + Send + Sync,
{
    pub fn new(transform: F) -> Self {
        Self { transform }
    }
}

#[async_trait]
impl<F> ItemTransform for FnTransform<F>
where
    F: Fn(&Value, usize, &SiblingValues) -> Result<Value, TransformError> + Send + Sync,
{
    async fn apply(
        &self,
        record: &Value,
        index: usize,
        siblings: &SiblingValues,
    ) -> Result<Value, TransformError> {
        (self.transform)(record, index, siblings)
    }
}

/// Drives one batch run.
///
/// Items are processed in strictly ascending index order by default.
/// With `with_concurrency(n)` transforms may run up to `n` at a time,
/// but results are still assembled in original index order and the
/// per-item pipeline (resolve siblings, then transform) is preserved.
pub struct BatchProcessor {
    config: BatchConfig,
    event_sink: Arc<dyn EventSink>,
    /// Maximum transforms in flight. 1 = strictly sequential.
    max_concurrency: usize,
    /// Execution ID for events and diagnostics.
    execution_id: String,
}

impl BatchProcessor {
    /// Create a processor with the given configuration and a no-op
    /// event sink.
    pub fn new(config: BatchConfig) -> Self {
        Self {
            config,
            event_sink: Arc::new(NullEventSink),
            max_concurrency: 1,
            execution_id: format!("batch-{}", uuid::Uuid::new_v4()),
        }
    }

    /// Set the event sink for batch progress events.
    pub fn with_event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Allow up to `n` transforms in flight. Values below 1 are clamped.
    ///
    /// Only effective when `stop_on_error` is false; stop-on-error runs
    /// always process sequentially so the truncation point is exact.
    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    /// Set the execution ID.
    pub fn with_execution_id(mut self, execution_id: impl Into<String>) -> Self {
        self.execution_id = execution_id.into();
        self
    }

    /// Get the execution ID.
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    /// Process a batch of records.
    ///
    /// For each index `i` in ascending order: resolve every registered
    /// sibling source at `i` (a resolver failure fails the item with
    /// `ErrorKind::SiblingResolution` and the transform is not invoked),
    /// otherwise invoke the transform and wrap its outcome.
    ///
    /// An empty `inputs` is valid and returns an empty, trivially
    /// successful outcome.
    ///
    /// With `stop_on_error` set, iteration terminates immediately after
    /// the first failed item and the returned sequence is a prefix of
    /// length `first_failure_index + 1`. Truncated runs are not resumed
    /// or retried by the processor; the caller who set the flag accepts
    /// the truncated output.
    ///
    /// With `maintain_pairing` unset, failed items are dropped from the
    /// returned sequence (statistics still count them) and positional
    /// alignment with `inputs` is lost.
    pub async fn process(
        &self,
        inputs: &[Value],
        transform: &dyn ItemTransform,
        sources: &SiblingSources,
    ) -> BatchOutcome {
        log::debug!(
            "Batch {}: processing {} items ({} sibling sources)",
            self.execution_id,
            inputs.len(),
            sources.len()
        );
        self.emit(BatchEvent::BatchStarted {
            execution_id: self.execution_id.clone(),
            item_count: inputs.len(),
        });

        let results = if self.max_concurrency > 1 && !self.config.stop_on_error {
            self.run_buffered(inputs, transform, sources).await
        } else {
            self.run_sequential(inputs, transform, sources).await
        };

        // Statistics cover every processed item, including failures that
        // pairing reduction drops from the returned sequence.
        let stats = BatchStatistics::summarize(&results);

        self.emit(BatchEvent::BatchCompleted {
            execution_id: self.execution_id.clone(),
            total: stats.total,
            successful: stats.successful,
            failed: stats.failed,
        });
        log::debug!(
            "Batch {}: finished, {}/{} successful",
            self.execution_id,
            stats.successful,
            stats.total
        );

        let results = if self.config.maintain_pairing {
            results
        } else {
            results.into_iter().filter(ItemResult::is_ok).collect()
        };

        BatchOutcome { results, stats }
    }

    /// Strictly sequential loop; the only path that honours `stop_on_error`.
    async fn run_sequential(
        &self,
        inputs: &[Value],
        transform: &dyn ItemTransform,
        sources: &SiblingSources,
    ) -> Vec<ItemResult> {
        let mut results = Vec::with_capacity(inputs.len());

        for (index, record) in inputs.iter().enumerate() {
            let result = process_item(record, index, transform, sources).await;
            let failed = !result.is_ok();
            self.report(&result);
            results.push(result);

            if failed && self.config.stop_on_error {
                log::debug!(
                    "Batch {}: stopping on first error at index {}",
                    self.execution_id,
                    index
                );
                break;
            }
        }

        results
    }

    /// Bounded-concurrency path: transforms run up to `max_concurrency`
    /// at a time, results come back in index order, one item's failure
    /// does not cancel others in flight.
    async fn run_buffered(
        &self,
        inputs: &[Value],
        transform: &dyn ItemTransform,
        sources: &SiblingSources,
    ) -> Vec<ItemResult> {
        let mut stream = futures_util::stream::iter(
            inputs
                .iter()
                .enumerate()
                .map(|(index, record)| process_item(record, index, transform, sources)),
        )
        .buffered(self.max_concurrency);

        let mut results = Vec::with_capacity(inputs.len());
        while let Some(result) = stream.next().await {
            self.report(&result);
            results.push(result);
        }
        results
    }

    /// Per-result diagnostics: event emission always, log line when
    /// `log_errors` is set.
    fn report(&self, result: &ItemResult) {
        match result {
            ItemResult::Ok { index, .. } => {
                self.emit(BatchEvent::ItemCompleted {
                    execution_id: self.execution_id.clone(),
                    index: *index,
                });
            }
            ItemResult::Err(err) => {
                if self.config.log_errors {
                    log::warn!(
                        "Batch {}: item {} failed: {}: {}",
                        self.execution_id,
                        err.index,
                        err.kind,
                        err.message
                    );
                }
                self.emit(BatchEvent::ItemFailed {
                    execution_id: self.execution_id.clone(),
                    index: err.index,
                    kind: err.kind,
                    error: err.message.clone(),
                });
            }
        }
    }

    fn emit(&self, event: BatchEvent) {
        let _ = self.event_sink.send(event);
    }
}

/// The per-item pipeline: sibling resolution first, then the transform.
async fn process_item(
    record: &Value,
    index: usize,
    transform: &dyn ItemTransform,
    sources: &SiblingSources,
) -> ItemResult {
    let siblings = match sources.resolve_all(index).await {
        Ok(values) => values,
        Err(err) => {
            return ItemError::new(ErrorKind::SiblingResolution, err.to_string(), index).into();
        }
    };

    match transform.apply(record, index, &siblings).await {
        Ok(value) => ItemResult::ok(index, value),
        Err(err) => err.at_index(index).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiblingError;
    use crate::events::VecEventSink;
    use crate::record;
    use crate::siblings::{FnSource, VecSource};
    use serde_json::json;

    /// Uppercases the record's title, rejecting empty titles.
    struct TitleTransform;

    #[async_trait]
    impl ItemTransform for TitleTransform {
        async fn apply(
            &self,
            item: &Value,
            _index: usize,
            _siblings: &SiblingValues,
        ) -> Result<Value, TransformError> {
            let title = record::require_non_empty_str(item, "title")?;
            Ok(json!({ "title": title.to_uppercase() }))
        }
    }

    /// Fails at one configured index, succeeds everywhere else.
    struct FailAt(usize);

    #[async_trait]
    impl ItemTransform for FailAt {
        async fn apply(
            &self,
            item: &Value,
            index: usize,
            _siblings: &SiblingValues,
        ) -> Result<Value, TransformError> {
            if index == self.0 {
                Err(TransformError::failed("deliberate failure"))
            } else {
                Ok(item.clone())
            }
        }
    }

    fn titles(items: &[&str]) -> Vec<Value> {
        items.iter().map(|t| json!({ "title": t })).collect()
    }

    #[tokio::test]
    async fn test_pairing_invariant() {
        let processor = BatchProcessor::new(BatchConfig::default());
        let inputs = titles(&["a", "b", "c", "d"]);

        let outcome = processor
            .process(&inputs, &TitleTransform, &SiblingSources::new())
            .await;

        assert_eq!(outcome.results.len(), inputs.len());
        for (i, result) in outcome.results.iter().enumerate() {
            assert_eq!(result.index(), i);
            assert!(result.is_ok());
        }
        assert_eq!(outcome.results[2].value(), Some(&json!({"title": "C"})));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_others() {
        let processor = BatchProcessor::new(BatchConfig::default());
        let inputs = titles(&["a", "b", "c", "d", "e"]);

        let outcome = processor
            .process(&inputs, &FailAt(2), &SiblingSources::new())
            .await;

        assert_eq!(outcome.results.len(), 5);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.stats.successful, 4);
        assert!(!outcome.results[2].is_ok());
        assert!(outcome.results[3].is_ok());
        assert!(outcome.results[4].is_ok());
    }

    #[tokio::test]
    async fn test_stop_on_error_truncates() {
        let config = BatchConfig {
            stop_on_error: true,
            ..BatchConfig::default()
        };
        let processor = BatchProcessor::new(config);
        let inputs = titles(&["a", "b", "c", "d", "e"]);

        let outcome = processor
            .process(&inputs, &FailAt(2), &SiblingSources::new())
            .await;

        // Prefix up to and including the first failure
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results[0].is_ok());
        assert!(outcome.results[1].is_ok());
        assert!(!outcome.results[2].is_ok());
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_drop_failed_items_when_pairing_disabled() {
        let config = BatchConfig {
            maintain_pairing: false,
            ..BatchConfig::default()
        };
        let processor = BatchProcessor::new(config);
        let inputs = titles(&["a", "b", "c"]);

        let outcome = processor
            .process(&inputs, &FailAt(1), &SiblingSources::new())
            .await;

        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(ItemResult::is_ok));
        // Dropped failures still count in the statistics
        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.failed, 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let processor = BatchProcessor::new(BatchConfig::default());

        let outcome = processor
            .process(&[], &TitleTransform, &SiblingSources::new())
            .await;

        assert!(outcome.results.is_empty());
        assert_eq!(outcome.stats.total, 0);
        assert_eq!(outcome.stats.successful, 0);
        assert_eq!(outcome.stats.failed, 0);
        assert!((outcome.stats.success_rate - 1.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_validation_failure_scenario() {
        let processor = BatchProcessor::new(BatchConfig::default());
        let inputs = titles(&["A", "B", ""]);

        let outcome = processor
            .process(&inputs, &TitleTransform, &SiblingSources::new())
            .await;

        assert_eq!(outcome.results[0].value(), Some(&json!({"title": "A"})));
        assert_eq!(outcome.results[1].value(), Some(&json!({"title": "B"})));
        let err = outcome.results[2].error().unwrap();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.index, 2);

        assert_eq!(outcome.stats.total, 3);
        assert_eq!(outcome.stats.successful, 2);
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.stats.error_breakdown[&ErrorKind::Validation], 1);
    }

    #[tokio::test]
    async fn test_sibling_failure_fails_only_that_item() {
        let sources = SiblingSources::new().with_source(
            "meta",
            Arc::new(FnSource::new(|index| {
                if index == 1 {
                    Err(SiblingError::new("meta", "lookup exploded"))
                } else {
                    Ok(Some(json!({ "channel": index })))
                }
            })),
        );

        let processor = BatchProcessor::new(BatchConfig::default());
        let inputs = titles(&["a", "b", "c"]);

        let outcome = processor.process(&inputs, &TitleTransform, &sources).await;

        assert!(outcome.results[0].is_ok());
        assert!(outcome.results[2].is_ok());
        let err = outcome.results[1].error().unwrap();
        assert_eq!(err.kind, ErrorKind::SiblingResolution);
        assert_eq!(err.index, 1);
    }

    #[tokio::test]
    async fn test_transform_receives_sibling_values() {
        let sources = SiblingSources::new().with_source(
            "channels",
            Arc::new(VecSource::new(vec![json!("rust"), json!("news")])),
        );

        let transform = FnTransform::new(|item: &Value, _index, siblings: &SiblingValues| {
            let title = record::require_str(item, "title")?;
            let channel = siblings
                .get("channels")
                .cloned()
                .flatten()
                .unwrap_or(Value::Null);
            Ok(json!({ "title": title, "channel": channel }))
        });

        let processor = BatchProcessor::new(BatchConfig::default());
        let inputs = titles(&["a", "b", "c"]);

        let outcome = processor.process(&inputs, &transform, &sources).await;

        assert_eq!(
            outcome.results[0].value(),
            Some(&json!({"title": "a", "channel": "rust"}))
        );
        // Sibling collection is shorter than the batch: absence, not error
        assert_eq!(
            outcome.results[2].value(),
            Some(&json!({"title": "c", "channel": null}))
        );
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let sink = Arc::new(VecEventSink::new());
        let processor = BatchProcessor::new(BatchConfig::default())
            .with_event_sink(sink.clone())
            .with_execution_id("batch-test");
        let inputs = titles(&["a", "b"]);

        processor
            .process(&inputs, &FailAt(1), &SiblingSources::new())
            .await;

        let events = sink.events();
        assert_eq!(events.len(), 4); // started, ok, failed, completed
        assert!(matches!(
            &events[0],
            BatchEvent::BatchStarted { item_count: 2, .. }
        ));
        assert!(matches!(&events[1], BatchEvent::ItemCompleted { index: 0, .. }));
        assert!(matches!(
            &events[2],
            BatchEvent::ItemFailed {
                index: 1,
                kind: ErrorKind::Processing,
                ..
            }
        ));
        assert!(matches!(
            &events[3],
            BatchEvent::BatchCompleted {
                successful: 1,
                failed: 1,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_buffered_preserves_order_and_isolation() {
        let processor = BatchProcessor::new(BatchConfig::default()).with_concurrency(4);
        let inputs: Vec<Value> = (0..20).map(|i| json!({ "title": format!("t{}", i) })).collect();

        let outcome = processor
            .process(&inputs, &FailAt(7), &SiblingSources::new())
            .await;

        assert_eq!(outcome.results.len(), 20);
        for (i, result) in outcome.results.iter().enumerate() {
            assert_eq!(result.index(), i);
        }
        assert_eq!(outcome.stats.failed, 1);
        assert!(!outcome.results[7].is_ok());
    }

    #[tokio::test]
    async fn test_stop_on_error_forces_sequential() {
        let config = BatchConfig {
            stop_on_error: true,
            ..BatchConfig::default()
        };
        let processor = BatchProcessor::new(config).with_concurrency(8);
        let inputs = titles(&["a", "b", "c", "d", "e"]);

        let outcome = processor
            .process(&inputs, &FailAt(1), &SiblingSources::new())
            .await;

        assert_eq!(outcome.results.len(), 2);
    }
}
