//! HTML and text cleaning
//!
//! Feed descriptions arrive as HTML fragments; these helpers reduce them
//! to plain text suitable for database columns and chat messages.

/// Strip HTML tags and decode the common entities.
///
/// Tag removal is a simple scanner, not a parser: anything between `<`
/// and the matching `>` is dropped. Good enough for feed descriptions,
/// which are fragments rather than documents.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for ch in input.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    decode_entities(&out)
}

/// Decode the handful of entities that actually show up in feeds.
pub fn decode_entities(input: &str) -> String {
    input
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

/// Collapse runs of whitespace (including newlines) into single spaces
/// and trim the ends.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters, appending an ellipsis
/// when anything was cut. Char-based so multi-byte text never splits.
/// A cap of zero yields the empty string.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if input.chars().count() <= max_chars {
        return input.to_string();
    }
    let truncated: String = input.chars().take(max_chars - 1).collect();
    format!("{}…", truncated.trim_end())
}
