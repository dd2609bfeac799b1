//! Reader settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Defaults applied to every utterance unless the caller overrides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Preferred voice locale (BCP-47), e.g. `"zh-TW"`.
    pub locale: String,
    /// Speech rate multiplier; clamped into the engine-safe range before
    /// submission.
    pub rate: f32,
    /// Voice pitch multiplier; clamped before submission.
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            locale: "zh-TW".into(),
            rate: 0.9,
            pitch: 0.98,
        }
    }
}

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Timing for the highlight walker's synthetic cursor advancement.
///
/// The tick interval is `base_step_ms / rate`, floored at `min_step_ms` so
/// an extreme rate can never produce a runaway timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Lower bound on the tick interval, in milliseconds.
    pub min_step_ms: u64,
    /// Tick interval at rate 1.0, in milliseconds.
    pub base_step_ms: u64,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            min_step_ms: 50,
            base_step_ms: 250,
        }
    }
}

// ---------------------------------------------------------------------------
// ReaderConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level reader configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use read_along::config::ReaderConfig;
///
/// // Load (returns Default when file is missing)
/// let config = ReaderConfig::load().unwrap();
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Per-utterance speech defaults.
    pub speech: SpeechConfig,
    /// Highlight walker timing.
    pub walk: WalkConfig,
    /// Delay before the highlight clears after an utterance ends, in
    /// milliseconds.  A tuned constant — long enough for the final walk to
    /// be visible, short enough not to linger.
    pub highlight_grace_ms: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            speech: SpeechConfig::default(),
            walk: WalkConfig::default(),
            highlight_grace_ms: 300,
        }
    }
}

impl ReaderConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(ReaderConfig::default())` when the file does not exist
    /// yet so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path())
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Platform-appropriate path for `settings.toml`.
    pub fn settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("read-along")
            .join("settings.toml")
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
    fn default_values() {
        let cfg = ReaderConfig::default();
        assert_eq!(cfg.speech.locale, "zh-TW");
        assert!((cfg.speech.rate - 0.9).abs() < f32::EPSILON);
        assert!((cfg.speech.pitch - 0.98).abs() < f32::EPSILON);
        assert_eq!(cfg.walk.min_step_ms, 50);
        assert_eq!(cfg.walk.base_step_ms, 250);
        assert_eq!(cfg.highlight_grace_ms, 300);
    }

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = ReaderConfig::default();
        original.save_to(&path).expect("save");
        let loaded = ReaderConfig::load_from(&path).expect("load");

        assert_eq!(original, loaded);
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = ReaderConfig::default();
        cfg.speech.locale = "zh-Hant-TW".into();
        cfg.speech.rate = 1.0;
        cfg.walk.base_step_ms = 200;
        cfg.highlight_grace_ms = 500;

        cfg.save_to(&path).expect("save");
        let loaded = ReaderConfig::load_from(&path).expect("load");

        assert_eq!(loaded.speech.locale, "zh-Hant-TW");
        assert!((loaded.speech.rate - 1.0).abs() < f32::EPSILON);
        assert_eq!(loaded.walk.base_step_ms, 200);
        assert_eq!(loaded.highlight_grace_ms, 500);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = ReaderConfig::load_from(&path).expect("should not error");
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn load_malformed_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "not toml [[[").unwrap();

        assert!(ReaderConfig::load_from(&path).is_err());
    }
}
