//! Speech-engine adapter interface.
//!
//! # Overview
//!
//! [`SpeechEngine`] is the seam between the playback core and whatever
//! platform speech synthesizer actually produces audio.  It is object-safe
//! and `Send + Sync` so it can be held behind an `Arc<dyn SpeechEngine>`.
//!
//! Progress is reported back through [`SessionEvents`]: a sender handed to
//! the engine at `speak` time that tags every [`EngineEvent`] with the
//! playback session it was created for.  The controller compares that tag
//! against its current session before mutating any state, so a late callback
//! from a canceled utterance can never corrupt a newer one — the engine is
//! not required to acknowledge cancellation.

use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// VoiceDescriptor / Utterance
// ---------------------------------------------------------------------------

/// A voice the engine can synthesize with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceDescriptor {
    /// Display name, e.g. `"Microsoft Hanhan - Chinese (Traditional, Taiwan)"`.
    pub name: String,
    /// BCP-47 locale tag, e.g. `"zh-TW"`.
    pub locale: String,
    /// `true` for locally-installed voices, `false` for network-dependent
    /// ones.
    pub local_service: bool,
}

/// One synthesis request.
///
/// `rate` and `pitch` are expected to be pre-clamped by the caller; the
/// adapter passes them through unmodified.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    /// The spoken text to synthesize (already transformed and sliced).
    pub text: String,
    /// Target locale.
    pub locale: String,
    /// Speech rate multiplier.
    pub rate: f32,
    /// Voice pitch multiplier.
    pub pitch: f32,
    /// Linear volume in `[0.0, 1.0]`.
    pub volume: f32,
    /// Preferred voice; `None` lets the engine pick its own default.
    pub voice: Option<VoiceDescriptor>,
}

// ---------------------------------------------------------------------------
// EngineEvent / SessionEvents
// ---------------------------------------------------------------------------

/// Progress notifications raised by the engine for one utterance.
///
/// Within one utterance the engine must deliver `Started` before any
/// `Boundary`, and `Boundary` events before `Ended` / `Error`.  Engines that
/// never report boundaries are tolerated — the controller falls back to
/// walking the whole span on `Started`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Audio output has begun.
    Started,
    /// Coarse progress marker: synthesis reached `char_index` (a character
    /// offset into the utterance text).
    Boundary { char_index: usize },
    /// The utterance finished normally.
    Ended,
    /// The utterance was aborted by the engine.
    Error(String),
}

/// An engine event tagged with the session it belongs to.
pub type TaggedEvent = (u64, EngineEvent);

/// Session-tagged event sender handed to [`SpeechEngine::speak`].
///
/// Cheap to clone; emitting after the controller has shut down is a silent
/// no-op (the event would have been stale anyway).
#[derive(Debug, Clone)]
pub struct SessionEvents {
    session: u64,
    tx: mpsc::UnboundedSender<TaggedEvent>,
}

impl SessionEvents {
    pub(crate) fn new(session: u64, tx: mpsc::UnboundedSender<TaggedEvent>) -> Self {
        Self { session, tx }
    }

    /// The playback session this sender was created for.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Deliver an event to the controller, tagged with this session.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send((self.session, event));
    }
}

// ---------------------------------------------------------------------------
// SpeechEngine trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to a platform speech synthesizer.
///
/// # Contract
///
/// - Only one utterance is active per engine instance; submitting a new one
///   while speaking is engine-defined behavior, so the controller cancels
///   first.
/// - All methods return immediately; progress arrives via [`SessionEvents`].
/// - `cancel` is fire-and-forget: the engine need not confirm, and may still
///   deliver events for the canceled utterance afterwards.
pub trait SpeechEngine: Send + Sync {
    /// Voices currently available for synthesis.
    fn list_voices(&self) -> Vec<VoiceDescriptor>;

    /// Begin synthesizing `utterance`, reporting progress through `events`.
    fn speak(&self, utterance: Utterance, events: SessionEvents);

    /// Request that any active utterance stop.
    fn cancel(&self);

    /// Suspend audio output, keeping the utterance resumable.
    fn pause(&self);

    /// Resume a paused utterance.
    fn resume(&self);

    /// `true` while an utterance is active (speaking or paused).
    fn is_speaking(&self) -> bool;

    /// `true` while output is suspended by [`pause`](Self::pause).
    fn is_paused(&self) -> bool;
}

// Compile-time assertion: Box<dyn SpeechEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SpeechEngine>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_events_tag_every_event() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = SessionEvents::new(7, tx);

        events.emit(EngineEvent::Started);
        events.emit(EngineEvent::Boundary { char_index: 3 });

        assert_eq!(rx.try_recv().unwrap(), (7, EngineEvent::Started));
        assert_eq!(
            rx.try_recv().unwrap(),
            (7, EngineEvent::Boundary { char_index: 3 })
        );
    }

    #[test]
    fn emit_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let events = SessionEvents::new(1, tx);
        // Must not panic — the controller is simply gone.
        events.emit(EngineEvent::Ended);
    }

    #[test]
    fn session_accessor_reports_tag() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let events = SessionEvents::new(42, tx);
        assert_eq!(events.session(), 42);
    }
}
