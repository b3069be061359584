//! Filename sanitization
//!
//! Titles become download filenames; this strips the characters that are
//! reserved on common filesystems and keeps the result a sane length.

/// Maximum length of a sanitized filename stem, in characters.
const MAX_STEM_CHARS: usize = 120;

/// Sanitize an arbitrary title into a filename stem.
///
/// Reserved characters are replaced with `_`, runs of whitespace collapse
/// to single spaces, leading/trailing dots and spaces are trimmed, and
/// the result is capped at [`MAX_STEM_CHARS`]. An input that sanitizes
/// to nothing yields `"untitled"`.
pub fn sanitize(title: &str) -> String {
    let replaced: String = title
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let collapsed = replaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c| c == '.' || c == ' ');

    let capped: String = trimmed.chars().take(MAX_STEM_CHARS).collect();
    let capped = capped.trim_end().to_string();

    if capped.is_empty() {
        "untitled".to_string()
    } else {
        capped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_replaced() {
        assert_eq!(sanitize("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(sanitize("  Rust   tutorial \n part 2 "), "Rust tutorial part 2");
    }

    #[test]
    fn test_leading_trailing_dots_trimmed() {
        assert_eq!(sanitize("...hidden..."), "hidden");
    }

    #[test]
    fn test_empty_becomes_untitled() {
        assert_eq!(sanitize(""), "untitled");
        assert_eq!(sanitize("   "), "untitled");
        assert_eq!(sanitize("..."), "untitled");
    }

    #[test]
    fn test_length_capped() {
        let long = "x".repeat(500);
        assert_eq!(sanitize(&long).chars().count(), MAX_STEM_CHARS);
    }

    #[test]
    fn test_normal_title_unchanged() {
        assert_eq!(sanitize("Rust Ownership Explained"), "Rust Ownership Explained");
    }
}
