//! Source-text wrapper with character-offset addressing.
//!
//! Every coordinate the engine exposes — index-map values, highlight ranges,
//! walker cursors — is a **character offset** into the original display text,
//! never a byte offset.  [`SourceText`] caches the decoded character sequence
//! once so the transformer, controller, and walker all index the same way.

use std::fmt;

// ---------------------------------------------------------------------------
// SourceText
// ---------------------------------------------------------------------------

/// Immutable original display text for one reading unit (a question, section
/// heading, or table-cell sequence).
///
/// ```
/// use read_along::transform::SourceText;
///
/// let text = SourceText::new("太陽從東邊升起");
/// assert_eq!(text.len(), 7);          // characters, not bytes
/// assert_eq!(text.clamp_index(-3), 0);
/// assert_eq!(text.clamp_index(99), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    raw: String,
    chars: Vec<char>,
}

impl SourceText {
    /// Wrap `raw`, decoding its character sequence once.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let chars = raw.chars().collect();
        Self { raw, chars }
    }

    /// The original string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The decoded character sequence.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Returns `true` when the text has no characters.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Returns `true` when the character at `index` is whitespace.
    ///
    /// Out-of-range indices are reported as non-whitespace.
    pub fn is_whitespace_at(&self, index: usize) -> bool {
        self.chars
            .get(index)
            .map(|c| c.is_whitespace())
            .unwrap_or(false)
    }

    /// Clamp a possibly-negative or out-of-range index into `[0, len - 1]`.
    ///
    /// Empty text clamps everything to `0`.
    pub fn clamp_index(&self, index: isize) -> usize {
        if self.chars.is_empty() {
            return 0;
        }
        index.clamp(0, (self.chars.len() - 1) as isize) as usize
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_counts_characters_not_bytes() {
        let text = SourceText::new("第1題");
        assert_eq!(text.len(), 3);
        assert!(text.as_str().len() > 3); // CJK chars are multi-byte
    }

    #[test]
    fn empty_text_is_empty() {
        let text = SourceText::new("");
        assert!(text.is_empty());
        assert_eq!(text.len(), 0);
    }

    #[test]
    fn clamp_negative_index_to_zero() {
        let text = SourceText::new("abc");
        assert_eq!(text.clamp_index(-5), 0);
    }

    #[test]
    fn clamp_overflow_index_to_last_char() {
        let text = SourceText::new("abc");
        assert_eq!(text.clamp_index(100), 2);
    }

    #[test]
    fn clamp_in_range_index_is_unchanged() {
        let text = SourceText::new("abc");
        assert_eq!(text.clamp_index(1), 1);
    }

    #[test]
    fn clamp_on_empty_text_is_zero() {
        let text = SourceText::new("");
        assert_eq!(text.clamp_index(7), 0);
        assert_eq!(text.clamp_index(-7), 0);
    }

    #[test]
    fn whitespace_detection() {
        let text = SourceText::new("a b");
        assert!(!text.is_whitespace_at(0));
        assert!(text.is_whitespace_at(1));
        assert!(!text.is_whitespace_at(2));
        // out of range → not whitespace
        assert!(!text.is_whitespace_at(3));
    }

    #[test]
    fn fullwidth_space_is_whitespace() {
        let text = SourceText::new("（　）");
        assert!(text.is_whitespace_at(1)); // U+3000 ideographic space
    }
}
