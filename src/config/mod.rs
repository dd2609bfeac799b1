//! Configuration module for the exam reader core.
//!
//! Provides `ReaderConfig` (top-level settings), sub-configs for speech
//! defaults and walker timing, and TOML persistence via
//! `ReaderConfig::load` / `ReaderConfig::save`.

pub mod settings;

pub use settings::{ReaderConfig, SpeechConfig, WalkConfig};
