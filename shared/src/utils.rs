//! # Shared Utility Functions
//!
//! Common helpers used across the portal and utility binaries.
//!
//! ## Text Excerpts
//!
//! List cards show a short preview of club descriptions and post bodies:
//! - [`excerpt`] - Truncate text to a maximum length with an ellipsis
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::excerpt;
//!
//! let description = "We build robots and compete in regional tournaments.";
//! assert_eq!(excerpt(description, 15), "We build robots…");
//! ```

/// Truncate `text` to at most `max_chars` characters, appending an ellipsis
/// when anything was cut.
///
/// The cut is made on a character boundary, never mid code point, and
/// trailing whitespace before the ellipsis is trimmed.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_short_text_unchanged() {
        assert_eq!(excerpt("Chess club", 20), "Chess club");
    }

    #[test]
    fn test_excerpt_truncates_with_ellipsis() {
        assert_eq!(excerpt("We build robots and more", 15), "We build robots…");
    }

    #[test]
    fn test_excerpt_trims_trailing_space() {
        assert_eq!(excerpt("one two three", 4), "one…");
    }

    #[test]
    fn test_excerpt_multibyte_safe() {
        // 3 chars of multibyte text must not split a code point
        assert_eq!(excerpt("días de sol", 4), "días…");
    }
}
