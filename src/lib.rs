//! read-along — text-to-speech read-along core for exam papers.
//!
//! Turns exam-style source text (Traditional Chinese, half/full-width
//! mixed) into natural spoken text, submits it to a platform speech
//! engine, and keeps a per-character highlight synchronized with the
//! audio as it plays.
//!
//! # Architecture
//!
//! ```text
//!   source text ──▶ transform ──▶ spoken text + index map
//!                                        │
//!   PlaybackCommand ──▶ PlaybackController ──▶ SpeechEngine (trait)
//!                          │        ▲                │
//!                          │        └── tagged events┘
//!                          ▼
//!                    BoundaryWalker ──▶ SharedState (highlight, cursor)
//! ```
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use read_along::config::ReaderConfig;
//! use read_along::engine::{MockSpeechEngine, SpeechEngine};
//! use read_along::playback::PlaybackController;
//! use read_along::transform::ReadingDictionary;
//!
//! let engine: Arc<dyn SpeechEngine> = Arc::new(MockSpeechEngine::manual());
//! let mut controller =
//!     PlaybackController::new(engine, ReadingDictionary::built_in(), ReaderConfig::default());
//! let state = controller.shared_state();
//! controller.speak("1.太陽從東邊升起", 0);
//! let highlight = state.lock().unwrap().highlight;
//! # let _ = highlight;
//! ```
//!
//! All text coordinates are character offsets, never byte offsets.

pub mod config;
pub mod engine;
pub mod playback;
pub mod transform;
