//! Feed item ingestion transform
//!
//! The end-to-end "code node": takes one raw feed item, validates its
//! required fields, cleans the description, normalizes duration and
//! publish date, and emits a record ready for the database and chat
//! steps. Channel metadata comes in as a sibling source aligned to the
//! batch, the platform's position-based item matching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use batch_engine::{record, ItemTransform, SiblingValues, TransformError};

use crate::duration::{format_duration, parse_duration_seconds, parse_published_date};
use crate::filename::sanitize;
use crate::message::item_line;
use crate::sql::insert_statement;
use crate::text::{normalize_whitespace, strip_html, truncate_chars};

/// Maximum characters kept of a cleaned description.
const DESCRIPTION_LIMIT: usize = 500;

/// Configuration for the feed ingestion transform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeedIngestConfig {
    /// Target table for generated INSERT statements
    pub table: String,
    /// Sibling source name channel metadata is read from
    pub channel_source: String,
}

impl Default for FeedIngestConfig {
    fn default() -> Self {
        Self {
            table: "videos".to_string(),
            channel_source: "channels".to_string(),
        }
    }
}

/// Normalizes one feed item into an insert-ready record.
///
/// Required fields: `title` (non-empty), `link`. Optional fields:
/// `description` (HTML allowed), `duration` (any format
/// [`parse_duration_seconds`] accepts), `pubDate`. The sibling source
/// named by the config's `channel_source` supplies per-item channel
/// metadata when registered.
pub struct FeedItemTransform {
    config: FeedIngestConfig,
}

impl FeedItemTransform {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            config: FeedIngestConfig {
                table: table.into(),
                ..FeedIngestConfig::default()
            },
        }
    }

    /// Create with full configuration.
    pub fn with_config(config: FeedIngestConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ItemTransform for FeedItemTransform {
    async fn apply(
        &self,
        item: &Value,
        index: usize,
        siblings: &SiblingValues,
    ) -> Result<Value, TransformError> {
        let title = record::require_non_empty_str(item, "title")?;
        let link = record::require_non_empty_str(item, "link")?;

        let description = record::optional_str(item, "description")
            .map(|html| truncate_chars(&normalize_whitespace(&strip_html(html)), DESCRIPTION_LIMIT))
            .unwrap_or_default();

        let duration_seconds =
            record::optional_str(item, "duration").and_then(parse_duration_seconds);
        let published_at = record::optional_str(item, "pubDate")
            .and_then(parse_published_date)
            .map(|dt| dt.to_rfc3339());

        let channel = siblings
            .get(&self.config.channel_source)
            .cloned()
            .flatten()
            .unwrap_or(Value::Null);
        let channel_name = channel
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();

        let title_clean = normalize_whitespace(title);
        let duration_display = duration_seconds.map(format_duration);

        let title_v = json!(title_clean);
        let link_v = json!(link);
        let description_v = json!(description);
        let duration_v = json!(duration_seconds);
        let published_v = json!(published_at);
        let channel_v = json!(channel_name);
        let sql = insert_statement(
            &self.config.table,
            &[
                ("title", &title_v),
                ("link", &link_v),
                ("description", &description_v),
                ("duration_seconds", &duration_v),
                ("published_at", &published_v),
                ("channel", &channel_v),
            ],
        );

        log::debug!("FeedItemTransform: normalized item {} ('{}')", index, title_clean);

        Ok(json!({
            "title": title_clean,
            "link": link,
            "description": description,
            "durationSeconds": duration_seconds,
            "publishedAt": published_at,
            "channel": channel,
            "filename": sanitize(&title_clean),
            "messageLine": item_line(&title_clean, link, duration_display.as_deref()),
            "insertSql": sql,
        }))
    }
}
