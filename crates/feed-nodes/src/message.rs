//! Chat-message payload construction
//!
//! Builds the block-structured JSON payloads the workflow host posts to
//! its chat connector. Only construction lives here; delivery belongs to
//! the host.

use serde_json::{json, Value};

/// Builder for a block-structured chat message.
///
/// Blocks render in insertion order.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    blocks: Vec<Value>,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A header block with plain text.
    pub fn header(mut self, text: impl Into<String>) -> Self {
        self.blocks.push(json!({
            "type": "header",
            "text": { "type": "plain_text", "text": text.into() }
        }));
        self
    }

    /// A markdown section block.
    pub fn section(mut self, markdown: impl Into<String>) -> Self {
        self.blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": markdown.into() }
        }));
        self
    }

    /// A horizontal divider.
    pub fn divider(mut self) -> Self {
        self.blocks.push(json!({ "type": "divider" }));
        self
    }

    /// A context block of small muted lines.
    pub fn context(mut self, lines: &[&str]) -> Self {
        let elements: Vec<Value> = lines
            .iter()
            .map(|line| json!({ "type": "mrkdwn", "text": line }))
            .collect();
        self.blocks.push(json!({ "type": "context", "elements": elements }));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Finish into the payload object: `{ "blocks": [...] }`.
    pub fn build(self) -> Value {
        json!({ "blocks": self.blocks })
    }
}

/// One-line link entry for a feed item: `*<link|title>* (duration)`.
pub fn item_line(title: &str, link: &str, duration: Option<&str>) -> String {
    match duration {
        Some(d) => format!("*<{}|{}>* ({})", link, title, d),
        None => format!("*<{}|{}>*", link, title),
    }
}
