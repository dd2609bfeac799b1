//! Pronunciation dictionary — built-in symbol table plus user overrides.
//!
//! [`ReadingDictionary`] maps symbols and short patterns to the string the
//! speech engine should actually pronounce (`×` → `成以`, `①` → `一`, …).
//! The built-in table covers the symbols that appear in elementary-school
//! exams; user overrides are persisted as a flat JSON object in the platform
//! config directory:
//!
//! | Platform | Path |
//! |----------|------|
//! | Windows  | `%APPDATA%\read-along\user-dict.json` |
//! | macOS    | `~/Library/Application Support/read-along/user-dict.json` |
//! | Linux    | `~/.config/read-along/user-dict.json` |
//!
//! A missing or malformed override file falls back to the built-in table —
//! dictionary loading never fails.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reading the user override file.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read override file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed override file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

/// Default symbol → pronunciation entries.
///
/// Circled digits ①–⑩ are included so option markers verbalize without any
/// user configuration.
const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    ("○", "圈"),
    ("△", "角"),
    ("×", "成以"),
    ("÷", "廚以"),
    ("＋", "加"),
    ("+", "加"),
    ("－", "減"),
    ("-", "減"),
    ("＝", "等於"),
    ("=", "等於"),
    ("□", "框框"),
    ("①", "一"),
    ("②", "二"),
    ("③", "三"),
    ("④", "四"),
    ("⑤", "五"),
    ("⑥", "六"),
    ("⑦", "七"),
    ("⑧", "八"),
    ("⑨", "九"),
    ("⑩", "十"),
];

// ---------------------------------------------------------------------------
// ReadingDictionary
// ---------------------------------------------------------------------------

/// One merged dictionary entry, with the key pre-decoded for character-wise
/// matching against the source text.
#[derive(Debug, Clone)]
struct DictEntry {
    key: String,
    key_chars: Vec<char>,
    value: String,
}

/// Symbol → pronunciation mapping with longest-key-first lookup.
///
/// Built from the default table merged with user overrides; on key collision
/// the user entry wins regardless of where either key sorts.
///
/// ```
/// use read_along::transform::ReadingDictionary;
///
/// let dict = ReadingDictionary::built_in();
/// assert_eq!(dict.get("×"), Some("成以"));
///
/// let custom = ReadingDictionary::with_overrides([("×".to_string(), "乘以".to_string())]);
/// assert_eq!(custom.get("×"), Some("乘以"));
/// ```
#[derive(Debug, Clone)]
pub struct ReadingDictionary {
    /// Sorted by key character count, longest first (stable for ties).
    entries: Vec<DictEntry>,
}

impl ReadingDictionary {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Dictionary containing only the built-in default table.
    pub fn built_in() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// Built-in table merged with `overrides`; override entries win on key
    /// collision.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut merged: BTreeMap<String, String> = DEFAULT_ENTRIES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        merged.extend(overrides);

        let mut entries: Vec<DictEntry> = merged
            .into_iter()
            .map(|(key, value)| DictEntry {
                key_chars: key.chars().collect(),
                key,
                value,
            })
            .collect();
        // Longest key first so multi-character keys shadow their prefixes.
        entries.sort_by(|a, b| b.key_chars.len().cmp(&a.key_chars.len()));

        Self { entries }
    }

    /// Built-in table merged with whatever overrides exist in the platform
    /// config directory.
    pub fn load_or_default() -> Self {
        Self::with_overrides(Self::load_user_overrides(&Self::user_dict_path()))
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Pronunciation for an exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// Longest dictionary key matching at `pos` in `chars`.
    ///
    /// Returns `(key_char_count, pronunciation)`.
    pub fn longest_match_at(&self, chars: &[char], pos: usize) -> Option<(usize, &str)> {
        let rest = chars.get(pos..)?;
        self.entries
            .iter()
            .find(|e| rest.starts_with(&e.key_chars))
            .map(|e| (e.key_chars.len(), e.value.as_str()))
    }

    /// Number of entries after merging.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the dictionary has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -----------------------------------------------------------------------
    // User overrides (JSON)
    // -----------------------------------------------------------------------

    /// Read user override entries from a flat JSON object (`{"×": "乘以"}`).
    ///
    /// A missing file yields no overrides; a broken one is logged and
    /// likewise degrades to the built-in table, never an error.
    pub fn load_user_overrides(path: &Path) -> Vec<(String, String)> {
        if !path.exists() {
            return Vec::new();
        }
        match Self::read_overrides(path) {
            Ok(overrides) => overrides,
            Err(e) => {
                log::warn!("dictionary: {e}, using built-in table only");
                Vec::new()
            }
        }
    }

    fn read_overrides(path: &Path) -> Result<Vec<(String, String)>, DictionaryError> {
        let data = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let map: BTreeMap<String, String> =
            serde_json::from_str(&data).map_err(|source| DictionaryError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        Ok(map.into_iter().collect())
    }

    /// Platform-appropriate path for the user override JSON file.
    pub fn user_dict_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("read-along")
            .join("user-dict.json")
    }
}

impl Default for ReadingDictionary {
    fn default() -> Self {
        Self::built_in()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn built_in_contains_default_symbols() {
        let dict = ReadingDictionary::built_in();
        assert_eq!(dict.get("×"), Some("成以"));
        assert_eq!(dict.get("＝"), Some("等於"));
        assert_eq!(dict.get("①"), Some("一"));
        assert_eq!(dict.get("⑩"), Some("十"));
    }

    #[test]
    fn unknown_key_is_none() {
        let dict = ReadingDictionary::built_in();
        assert_eq!(dict.get("☃"), None);
    }

    #[test]
    fn user_override_wins_on_collision() {
        let dict =
            ReadingDictionary::with_overrides([("×".to_string(), "乘以".to_string())]);
        assert_eq!(dict.get("×"), Some("乘以"));
        // unrelated defaults survive the merge
        assert_eq!(dict.get("＋"), Some("加"));
    }

    #[test]
    fn user_override_wins_regardless_of_key_length_ordering() {
        // A long unrelated user key must not change which value wins for "×".
        let dict = ReadingDictionary::with_overrides([
            ("3.14".to_string(), "圓周率".to_string()),
            ("×".to_string(), "乘以".to_string()),
        ]);
        assert_eq!(dict.get("×"), Some("乘以"));
        assert_eq!(dict.get("3.14"), Some("圓周率"));
    }

    #[test]
    fn longest_match_prefers_longer_key() {
        let dict = ReadingDictionary::with_overrides([
            ("km".to_string(), "公里".to_string()),
            ("km²".to_string(), "平方公里".to_string()),
        ]);
        let chars: Vec<char> = "km²".chars().collect();
        let (len, value) = dict.longest_match_at(&chars, 0).expect("match");
        assert_eq!(len, 3);
        assert_eq!(value, "平方公里");
    }

    #[test]
    fn longest_match_at_offset() {
        let dict = ReadingDictionary::built_in();
        let chars: Vec<char> = "a＋b".chars().collect();
        assert!(dict.longest_match_at(&chars, 0).is_none());
        let (len, value) = dict.longest_match_at(&chars, 1).expect("match");
        assert_eq!(len, 1);
        assert_eq!(value, "加");
    }

    #[test]
    fn longest_match_past_end_is_none() {
        let dict = ReadingDictionary::built_in();
        let chars: Vec<char> = "×".chars().collect();
        assert!(dict.longest_match_at(&chars, 5).is_none());
    }

    // --- user override loading ---

    #[test]
    fn missing_override_file_yields_no_overrides() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nope.json");
        assert!(ReadingDictionary::load_user_overrides(&path).is_empty());
    }

    #[test]
    fn malformed_override_file_yields_no_overrides() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("user-dict.json");
        std::fs::write(&path, "not json {{{").unwrap();
        assert!(ReadingDictionary::load_user_overrides(&path).is_empty());
    }

    #[test]
    fn valid_override_file_is_loaded() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("user-dict.json");
        std::fs::write(&path, r#"{"×": "乘以", "cm": "公分"}"#).unwrap();

        let overrides = ReadingDictionary::load_user_overrides(&path);
        let dict = ReadingDictionary::with_overrides(overrides);
        assert_eq!(dict.get("×"), Some("乘以"));
        assert_eq!(dict.get("cm"), Some("公分"));
    }
}
