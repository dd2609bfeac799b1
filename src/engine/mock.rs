//! Deterministic speech engine for tests and the demo binary.
//!
//! [`MockSpeechEngine`] never produces audio.  In *scripted* mode it replays
//! a fixed [`EngineEvent`] sequence synchronously on every `speak` call; in
//! *manual* mode it parks the [`SessionEvents`] sender so a test can inject
//! events by hand — including deliberately stale ones for a superseded
//! session.  Every submitted [`Utterance`] is recorded for inspection.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::adapter::{EngineEvent, SessionEvents, SpeechEngine, Utterance, VoiceDescriptor};

// ---------------------------------------------------------------------------
// MockSpeechEngine
// ---------------------------------------------------------------------------

/// Test double implementing [`SpeechEngine`] with fully deterministic timing.
///
/// ```
/// use read_along::engine::{EngineEvent, MockSpeechEngine, SpeechEngine};
///
/// let engine = MockSpeechEngine::scripted(vec![
///     EngineEvent::Started,
///     EngineEvent::Boundary { char_index: 4 },
///     EngineEvent::Ended,
/// ]);
/// assert!(!engine.is_speaking());
/// ```
pub struct MockSpeechEngine {
    voices: Vec<VoiceDescriptor>,
    script: Vec<EngineEvent>,
    manual: bool,
    speaking: AtomicBool,
    paused: AtomicBool,
    utterances: Mutex<Vec<Utterance>>,
    parked: Mutex<Option<SessionEvents>>,
}

impl MockSpeechEngine {
    /// Engine that replays `script` synchronously on every `speak` call.
    pub fn scripted(script: Vec<EngineEvent>) -> Self {
        Self {
            voices: Vec::new(),
            script,
            manual: false,
            speaking: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            utterances: Mutex::new(Vec::new()),
            parked: Mutex::new(None),
        }
    }

    /// Engine that emits nothing by itself; the test drives events through
    /// [`take_events`](Self::take_events).
    pub fn manual() -> Self {
        Self::scripted(Vec::new()).into_manual()
    }

    fn into_manual(mut self) -> Self {
        self.manual = true;
        self
    }

    /// Replace the advertised voice inventory.
    pub fn with_voices(mut self, voices: Vec<VoiceDescriptor>) -> Self {
        self.voices = voices;
        self
    }

    /// All utterances submitted so far, oldest first.
    pub fn utterances(&self) -> Vec<Utterance> {
        self.utterances.lock().unwrap().clone()
    }

    /// The most recently submitted utterance.
    pub fn last_utterance(&self) -> Option<Utterance> {
        self.utterances.lock().unwrap().last().cloned()
    }

    /// Take the event sender parked by the latest `speak` call (manual mode
    /// only).  Dropping it lets a controller pump observe channel quiescence.
    pub fn take_events(&self) -> Option<SessionEvents> {
        self.parked.lock().unwrap().take()
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn list_voices(&self) -> Vec<VoiceDescriptor> {
        self.voices.clone()
    }

    fn speak(&self, utterance: Utterance, events: SessionEvents) {
        self.utterances.lock().unwrap().push(utterance);
        self.speaking.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);

        if self.manual {
            *self.parked.lock().unwrap() = Some(events);
            return;
        }
        for event in &self.script {
            if matches!(event, EngineEvent::Ended | EngineEvent::Error(_)) {
                self.speaking.store(false, Ordering::SeqCst);
            }
            events.emit(event.clone());
        }
    }

    fn cancel(&self) {
        self.speaking.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        *self.parked.lock().unwrap() = None;
    }

    fn pause(&self) {
        if self.speaking.load(Ordering::SeqCst) {
            self.paused.store(true, Ordering::SeqCst);
        }
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn utterance(text: &str) -> Utterance {
        Utterance {
            text: text.into(),
            locale: "zh-TW".into(),
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            voice: None,
        }
    }

    #[test]
    fn scripted_engine_replays_events_in_order() {
        let engine = MockSpeechEngine::scripted(vec![
            EngineEvent::Started,
            EngineEvent::Boundary { char_index: 2 },
            EngineEvent::Ended,
        ]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        engine.speak(utterance("你好"), SessionEvents::new(1, tx));

        assert_eq!(rx.try_recv().unwrap(), (1, EngineEvent::Started));
        assert_eq!(
            rx.try_recv().unwrap(),
            (1, EngineEvent::Boundary { char_index: 2 })
        );
        assert_eq!(rx.try_recv().unwrap(), (1, EngineEvent::Ended));
        // Script ended with Ended → no longer speaking.
        assert!(!engine.is_speaking());
    }

    #[test]
    fn manual_engine_parks_the_sender() {
        let engine = MockSpeechEngine::manual();
        let (tx, mut rx) = mpsc::unbounded_channel();
        engine.speak(utterance("你好"), SessionEvents::new(3, tx));

        assert!(engine.is_speaking());
        assert!(rx.try_recv().is_err()); // nothing emitted yet

        let events = engine.take_events().expect("parked sender");
        events.emit(EngineEvent::Started);
        assert_eq!(rx.try_recv().unwrap(), (3, EngineEvent::Started));
    }

    #[test]
    fn utterances_are_recorded() {
        let engine = MockSpeechEngine::manual();
        let (tx, _rx) = mpsc::unbounded_channel();
        engine.speak(utterance("一"), SessionEvents::new(1, tx.clone()));
        engine.speak(utterance("二"), SessionEvents::new(2, tx));

        assert_eq!(engine.utterances().len(), 2);
        assert_eq!(engine.last_utterance().unwrap().text, "二");
    }

    #[test]
    fn cancel_clears_speaking_and_parked_sender() {
        let engine = MockSpeechEngine::manual();
        let (tx, _rx) = mpsc::unbounded_channel();
        engine.speak(utterance("你好"), SessionEvents::new(1, tx));

        engine.cancel();
        assert!(!engine.is_speaking());
        assert!(engine.take_events().is_none());
    }

    #[test]
    fn pause_requires_active_utterance() {
        let engine = MockSpeechEngine::manual();
        engine.pause();
        assert!(!engine.is_paused());

        let (tx, _rx) = mpsc::unbounded_channel();
        engine.speak(utterance("你好"), SessionEvents::new(1, tx));
        engine.pause();
        assert!(engine.is_paused());
        engine.resume();
        assert!(!engine.is_paused());
    }

    #[test]
    fn voices_are_advertised() {
        let engine = MockSpeechEngine::manual().with_voices(vec![VoiceDescriptor {
            name: "Yating".into(),
            locale: "zh-TW".into(),
            local_service: true,
        }]);
        assert_eq!(engine.list_voices().len(), 1);
    }
}
