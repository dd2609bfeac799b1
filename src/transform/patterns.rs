//! Pattern matchers for exam-text rewriting.
//!
//! Each matcher inspects a character slice at one position and reports how
//! many source characters it consumes.  The matchers are deliberately
//! hand-rolled: the option-marker rule needs a "not followed by an ASCII
//! digit" check so `1.` is a marker but `1.5` stays a decimal, which plain
//! regex alternation cannot express cleanly.

use super::dictionary::ReadingDictionary;

// ---------------------------------------------------------------------------
// Character classes
// ---------------------------------------------------------------------------

/// CJK ordinal characters accepted in a section heading (`一、`, `貳.`, …).
const CJK_ORDINALS: &str = "一二三四五六七八九十壹貳參肆伍陸柒捌玖拾";

fn is_cjk_ordinal(c: char) -> bool {
    CJK_ORDINALS.contains(c)
}

/// ASCII or full-width decimal digit.
fn is_wide_digit(c: char) -> bool {
    c.is_ascii_digit() || ('０'..='９').contains(&c)
}

/// Option-marker letter: A–F / a–f in half- or full-width forms.
fn is_option_letter(c: char) -> bool {
    ('A'..='F').contains(&c)
        || ('a'..='f').contains(&c)
        || ('Ａ'..='Ｆ').contains(&c)
        || ('ａ'..='ｆ').contains(&c)
}

/// Circled-number glyph ①–⑳.
fn is_circled_number(c: char) -> bool {
    ('①'..='⑳').contains(&c)
}

fn is_open_paren(c: char) -> bool {
    c == '(' || c == '（'
}

fn is_close_paren(c: char) -> bool {
    c == ')' || c == '）'
}

/// Marker closer: the punctuation that ends `(A)`, `1.`, `3、`.
fn is_marker_closer(c: char) -> bool {
    c == '.' || c == '、' || is_close_paren(c)
}

// ---------------------------------------------------------------------------
// Leading enumeration (position 0 only)
// ---------------------------------------------------------------------------

/// A matched section heading or question number at the start of the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NumberedLead {
    /// Source characters consumed by the whole pattern.
    pub consumed: usize,
    /// The ordinal / number exactly as written (full-width digits stay
    /// full-width).
    pub number: String,
}

/// Section heading: one or more CJK ordinals followed by at least one
/// separator (`、`, `.`, or whitespace).  `"三、聽寫"` → ordinal `三`.
pub(crate) fn match_section_heading(chars: &[char]) -> Option<NumberedLead> {
    let ord_len = chars.iter().take_while(|&&c| is_cjk_ordinal(c)).count();
    if ord_len == 0 {
        return None;
    }
    let sep_len = chars[ord_len..]
        .iter()
        .take_while(|&&c| c == '、' || c == '.' || c.is_whitespace())
        .count();
    if sep_len == 0 {
        return None;
    }
    Some(NumberedLead {
        consumed: ord_len + sep_len,
        number: chars[..ord_len].iter().collect(),
    })
}

/// Question number: an optional empty bracket pair, digits, optional `、`/`.`
/// or space separators, an optional blank field, and trailing whitespace.
/// `"(　)1. （＿）題目"` and `"１２、題目"` both match.
pub(crate) fn match_question_number(chars: &[char]) -> Option<NumberedLead> {
    let mut i = 0;

    // Optional empty bracket pair, e.g. the answer slot "（　）" before the
    // question number.  Reverted entirely when the close bracket is missing.
    if matches!(chars.first(), Some(&c) if "(（[【".contains(c)) {
        let mut j = 1;
        while matches!(chars.get(j), Some(c) if c.is_whitespace()) {
            j += 1;
        }
        if matches!(chars.get(j), Some(&c) if ")）]】".contains(c)) {
            j += 1;
            while matches!(chars.get(j), Some(c) if c.is_whitespace()) {
                j += 1;
            }
            i = j;
        }
    }

    let digit_len = chars[i..].iter().take_while(|&&c| is_wide_digit(c)).count();
    if digit_len == 0 {
        return None;
    }
    let number: String = chars[i..i + digit_len].iter().collect();
    i += digit_len;

    while matches!(chars.get(i), Some(&c) if c == '、' || c == '.' || c == ' ') {
        i += 1;
    }
    if let Some(blank) = match_blank(chars, i) {
        i += blank;
    }
    while matches!(chars.get(i), Some(c) if c.is_whitespace()) {
        i += 1;
    }

    Some(NumberedLead {
        consumed: i,
        number,
    })
}

// ---------------------------------------------------------------------------
// Blank field
// ---------------------------------------------------------------------------

/// Blank answer field at `pos`: `(` + (whitespace | `_`)* + `)` in half- or
/// full-width parentheses.  Returns the consumed character count.
pub(crate) fn match_blank(chars: &[char], pos: usize) -> Option<usize> {
    if !matches!(chars.get(pos), Some(&c) if is_open_paren(c)) {
        return None;
    }
    let mut i = pos + 1;
    while matches!(chars.get(i), Some(&c) if c.is_whitespace() || c == '_') {
        i += 1;
    }
    if matches!(chars.get(i), Some(&c) if is_close_paren(c)) {
        Some(i + 1 - pos)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Option markers
// ---------------------------------------------------------------------------

/// A matched option marker such as `(A)`, `12、`, or `①.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionMarker {
    /// Source characters consumed.
    pub consumed: usize,
    /// The verbalized label, before the pause marker is appended.
    pub label: String,
}

/// Standard or circled option marker at `pos`.
///
/// Standard form: optional `(`, then a single option letter or one-to-two
/// digits, then a closer (`.`、`)`), and the closer must not be immediately
/// followed by an ASCII digit.  Circled form: ①–⑳ with an optional closer;
/// the glyph verbalizes through the dictionary when an entry exists.
pub(crate) fn match_option_marker(
    chars: &[char],
    pos: usize,
    dict: &ReadingDictionary,
) -> Option<OptionMarker> {
    if let Some(marker) = match_standard_marker(chars, pos) {
        return Some(marker);
    }

    let &glyph = chars.get(pos)?;
    if !is_circled_number(glyph) {
        return None;
    }
    let glyph_str: String = glyph.to_string();
    let label = dict
        .get(&glyph_str)
        .map(str::to_string)
        .unwrap_or(glyph_str);
    let closer = matches!(chars.get(pos + 1), Some(&c) if is_marker_closer(c));
    Some(OptionMarker {
        consumed: if closer { 2 } else { 1 },
        label,
    })
}

fn match_standard_marker(chars: &[char], pos: usize) -> Option<OptionMarker> {
    let mut i = pos;
    if matches!(chars.get(i), Some(&c) if is_open_paren(c)) {
        i += 1;
    }

    let &first = chars.get(i)?;
    let label_lengths: &[usize] = if is_option_letter(first) {
        &[1]
    } else if is_wide_digit(first) {
        // Longer label first, backing off like regex `{1,2}` when the
        // trailing-digit check rejects it.
        if matches!(chars.get(i + 1), Some(&c) if is_wide_digit(c)) {
            &[2, 1]
        } else {
            &[1]
        }
    } else {
        return None;
    };

    for &label_len in label_lengths {
        let closer_at = i + label_len;
        if !matches!(chars.get(closer_at), Some(&c) if is_marker_closer(c)) {
            continue;
        }
        // `1.` is a marker, `1.5` is a decimal.
        if matches!(chars.get(closer_at + 1), Some(c) if c.is_ascii_digit()) {
            continue;
        }
        return Some(OptionMarker {
            consumed: closer_at + 1 - pos,
            label: chars[i..closer_at].iter().collect(),
        });
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    // --- section heading ---

    #[test]
    fn section_heading_with_comma_separator() {
        let m = match_section_heading(&chars("三、聽寫測驗")).expect("match");
        assert_eq!(m.number, "三");
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn section_heading_multi_ordinal() {
        let m = match_section_heading(&chars("十一. 閱讀")).expect("match");
        assert_eq!(m.number, "十一");
        assert_eq!(m.consumed, 4); // "十一. " — separator run includes the space
    }

    #[test]
    fn section_heading_requires_separator() {
        assert!(match_section_heading(&chars("三個人")).is_none());
    }

    #[test]
    fn section_heading_requires_ordinal() {
        assert!(match_section_heading(&chars("、聽寫")).is_none());
    }

    // --- question number ---

    #[test]
    fn question_number_simple() {
        let m = match_question_number(&chars("1.太陽")).expect("match");
        assert_eq!(m.number, "1");
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn question_number_fullwidth_digits() {
        let m = match_question_number(&chars("１２、題目")).expect("match");
        assert_eq!(m.number, "１２");
        assert_eq!(m.consumed, 3);
    }

    #[test]
    fn question_number_with_leading_answer_slot() {
        let m = match_question_number(&chars("（　）3. 題目")).expect("match");
        assert_eq!(m.number, "3");
        // "（　）3. " — bracket pair, digit, separator run, trailing space
        assert_eq!(m.consumed, 6);
    }

    #[test]
    fn question_number_with_trailing_blank() {
        let m = match_question_number(&chars("2.（　）是對的")).expect("match");
        assert_eq!(m.number, "2");
        assert_eq!(m.consumed, 5);
    }

    #[test]
    fn question_number_requires_digits() {
        assert!(match_question_number(&chars("太陽")).is_none());
        assert!(match_question_number(&chars("（　）太陽")).is_none());
    }

    #[test]
    fn unclosed_bracket_does_not_consume() {
        assert!(match_question_number(&chars("（太陽")).is_none());
    }

    // --- blank field ---

    #[test]
    fn blank_halfwidth() {
        assert_eq!(match_blank(&chars("(  )"), 0), Some(4));
    }

    #[test]
    fn blank_fullwidth_with_ideographic_space() {
        assert_eq!(match_blank(&chars("（　）"), 0), Some(3));
    }

    #[test]
    fn blank_with_underscores() {
        assert_eq!(match_blank(&chars("(___)"), 0), Some(5));
    }

    #[test]
    fn blank_empty_pair() {
        assert_eq!(match_blank(&chars("()"), 0), Some(2));
    }

    #[test]
    fn blank_mixed_paren_widths() {
        assert_eq!(match_blank(&chars("(　）"), 0), Some(3));
    }

    #[test]
    fn blank_at_offset() {
        assert_eq!(match_blank(&chars("填（）"), 1), Some(2));
        assert_eq!(match_blank(&chars("填（）"), 0), None);
    }

    #[test]
    fn blank_with_content_is_not_blank() {
        assert_eq!(match_blank(&chars("(答案)"), 0), None);
    }

    // --- option markers ---

    fn dict() -> ReadingDictionary {
        ReadingDictionary::built_in()
    }

    #[test]
    fn letter_marker_with_parens() {
        let m = match_option_marker(&chars("(A)選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "A");
        assert_eq!(m.consumed, 3);
    }

    #[test]
    fn letter_marker_fullwidth() {
        let m = match_option_marker(&chars("Ｂ、選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "Ｂ");
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn digit_marker_with_dot() {
        let m = match_option_marker(&chars("1.選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "1");
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn two_digit_marker() {
        let m = match_option_marker(&chars("12、選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "12");
        assert_eq!(m.consumed, 3);
    }

    #[test]
    fn decimal_number_is_not_a_marker() {
        // "1.5" — the closer is followed by an ASCII digit.
        assert!(match_option_marker(&chars("1.5公斤"), 0, &dict()).is_none());
    }

    #[test]
    fn two_digit_backoff_still_rejects_decimal() {
        // "12.5" — neither "12." nor "1" + "2" forms a valid marker.
        assert!(match_option_marker(&chars("12.5"), 0, &dict()).is_none());
    }

    #[test]
    fn circled_marker_uses_dictionary() {
        let m = match_option_marker(&chars("①選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "一");
        assert_eq!(m.consumed, 1);
    }

    #[test]
    fn circled_marker_with_closer() {
        let m = match_option_marker(&chars("②、選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "二");
        assert_eq!(m.consumed, 2);
    }

    #[test]
    fn circled_marker_outside_dictionary_keeps_glyph() {
        // ⑫ has no built-in entry; the glyph itself is the label.
        let m = match_option_marker(&chars("⑫選項"), 0, &dict()).expect("match");
        assert_eq!(m.label, "⑫");
        assert_eq!(m.consumed, 1);
    }

    #[test]
    fn letter_without_closer_is_not_a_marker() {
        assert!(match_option_marker(&chars("Apple"), 0, &dict()).is_none());
    }

    #[test]
    fn marker_at_offset() {
        let m = match_option_marker(&chars("選(A)"), 1, &dict()).expect("match");
        assert_eq!(m.label, "A");
        assert_eq!(m.consumed, 3);
    }
}
