//! Message size utilities
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Count characters instead of bytes, drop embed and chunking helpers
//! - 1.0.0: Initial chunking helpers

/// Discord message content limit (characters)
pub const MESSAGE_LIMIT: usize = 2000;

const ELLIPSIS: char = '…';

/// Cut `text` down to the message limit, ending with an ellipsis when anything was dropped.
pub fn truncate_for_message(text: &str) -> String {
    truncate_chars(text, MESSAGE_LIMIT)
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut out: String = text.chars().take(limit.saturating_sub(1)).collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_for_message("hello"), "hello");
    }

    #[test]
    fn test_truncate_long_text() {
        let text = "a".repeat(2500);
        let result = truncate_for_message(&text);
        assert_eq!(result.chars().count(), MESSAGE_LIMIT);
        assert!(result.ends_with('…'));
    }

    #[test]
    fn test_truncate_counts_characters() {
        // 2000 multi-byte characters still fit
        let text = "世".repeat(MESSAGE_LIMIT);
        assert_eq!(truncate_for_message(&text), text);
    }
}
