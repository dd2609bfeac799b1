//! Source-text → spoken-text rewriting with per-character index mapping.
//!
//! [`transform`] scans the source once, left to right, applying rewrite rules
//! in precedence order at every position:
//!
//! 1. leading enumeration (section heading / question number) — position 0 only
//! 2. blank answer field → `括弧`
//! 3. option marker → verbalized label + pause
//! 4. longest dictionary key → its pronunciation
//! 5. fallback: copy one character
//!
//! Every character appended to the spoken text records the source character
//! offset that produced it, so the playback controller can translate the
//! engine's progress through the spoken string back into highlight
//! coordinates in the display text.

use super::dictionary::ReadingDictionary;
use super::patterns;
use super::source::SourceText;

// ---------------------------------------------------------------------------
// TransformResult
// ---------------------------------------------------------------------------

/// Output of one [`transform`] call.
///
/// Invariants:
/// - `index_map.len()` equals the character count of `full_spoken_text`;
/// - every `index_map` value is a valid source character offset;
/// - a maximal run of fallback-copied characters maps to consecutive offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    /// Spoken rendition of the entire source text.
    pub full_spoken_text: String,
    /// `full_spoken_text` from `spoken_start_index` on — what is actually
    /// submitted to the speech engine for a "read from here" request.
    pub sliced_spoken_text: String,
    /// `index_map[i]` = source character offset that produced spoken
    /// character `i`.
    pub index_map: Vec<usize>,
    /// First spoken character position whose mapped source offset is at or
    /// past `safe_start_index` (0 when no such position exists).
    pub spoken_start_index: usize,
    /// The requested start offset clamped into the source text.
    pub safe_start_index: usize,
}

impl TransformResult {
    fn empty() -> Self {
        Self {
            full_spoken_text: String::new(),
            sliced_spoken_text: String::new(),
            index_map: Vec::new(),
            spoken_start_index: 0,
            safe_start_index: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// transform
// ---------------------------------------------------------------------------

/// Rewrite `text` into its spoken form, mapping every spoken character back
/// to the source offset that produced it.
///
/// `start_index` is a source character offset for "read from here" requests;
/// out-of-range values are clamped, never rejected.
///
/// ```
/// use read_along::transform::{transform, ReadingDictionary};
///
/// let dict = ReadingDictionary::built_in();
/// let result = transform("1.太陽從東邊升起", 0, &dict);
/// assert!(result.full_spoken_text.starts_with("第1題，"));
/// assert_eq!(result.index_map[0], 0);
/// ```
pub fn transform(text: &str, start_index: isize, dict: &ReadingDictionary) -> TransformResult {
    let source = SourceText::new(text);
    if source.is_empty() {
        return TransformResult::empty();
    }
    let chars = source.chars();

    let mut spoken: Vec<char> = Vec::with_capacity(chars.len());
    let mut index_map: Vec<usize> = Vec::with_capacity(chars.len());
    let mut i = 0usize;

    // All characters produced by a rewrite map to one source offset.
    fn push_mapped(spoken: &mut Vec<char>, index_map: &mut Vec<usize>, s: &str, origin: usize) {
        for c in s.chars() {
            spoken.push(c);
            index_map.push(origin);
        }
    }

    // Rule 1: leading enumeration, tried once at position 0.  The section
    // form wins over the question form; everything it consumed maps to 0.
    if let Some(lead) = patterns::match_section_heading(chars) {
        push_mapped(&mut spoken, &mut index_map, &format!("第{}大題，", lead.number), 0);
        i = lead.consumed;
    } else if let Some(lead) = patterns::match_question_number(chars) {
        push_mapped(&mut spoken, &mut index_map, &format!("第{}題，", lead.number), 0);
        i = lead.consumed;
    }

    while i < chars.len() {
        // Rule 2: blank answer field.
        if let Some(consumed) = patterns::match_blank(chars, i) {
            push_mapped(&mut spoken, &mut index_map, "括弧", i);
            i += consumed;
            continue;
        }

        // Rule 3: option marker, verbalized with a trailing pause.
        if let Some(marker) = patterns::match_option_marker(chars, i, dict) {
            push_mapped(&mut spoken, &mut index_map, &format!("{}，", marker.label), i);
            i += marker.consumed;
            continue;
        }

        // Rule 4: longest dictionary key at this position.
        if let Some((key_len, value)) = dict.longest_match_at(chars, i) {
            push_mapped(&mut spoken, &mut index_map, value, i);
            i += key_len;
            continue;
        }

        // Rule 5: verbatim copy.
        spoken.push(chars[i]);
        index_map.push(i);
        i += 1;
    }

    let safe_start_index = source.clamp_index(start_index);
    let spoken_start_index = index_map
        .iter()
        .position(|&origin| origin >= safe_start_index)
        .unwrap_or(0);

    TransformResult {
        full_spoken_text: spoken.iter().collect(),
        sliced_spoken_text: spoken[spoken_start_index..].iter().collect(),
        index_map,
        spoken_start_index,
        safe_start_index,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
