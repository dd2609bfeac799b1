//! Speech-engine abstraction and voice selection.
//!
//! This module provides:
//! * [`SpeechEngine`] — object-safe trait wrapping a platform synthesizer.
//! * [`SessionEvents`] / [`EngineEvent`] — session-tagged progress delivery.
//! * [`VoiceDescriptor`] / [`Utterance`] — request/inventory types.
//! * [`pick_best_voice`] — locale-aware voice ranking.
//! * [`MockSpeechEngine`] — deterministic engine for tests and demos.

pub mod adapter;
pub mod mock;
pub mod voice;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use adapter::{
    EngineEvent, SessionEvents, SpeechEngine, TaggedEvent, Utterance, VoiceDescriptor,
};
pub use mock::MockSpeechEngine;
pub use voice::pick_best_voice;
