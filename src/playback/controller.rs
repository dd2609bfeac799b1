//! Playback controller — the orchestrating state machine.
//!
//! [`PlaybackController`] owns the monotonic session counter, the speech
//! engine handle, and the [`BoundaryWalker`].  `speak` transforms the source
//! text, seeds the highlight, and submits the sliced spoken text; engine
//! events come back tagged with the session they belong to and are compared
//! against the current session before they may touch anything.  That
//! comparison is the *only* defense against late callbacks from superseded
//! utterances — the platform engine gives no cancellation acknowledgment —
//! and it is sufficient because every mutation happens on the single task
//! that calls [`handle_event`](PlaybackController::handle_event).
//!
//! # Event flow
//!
//! ```text
//! speak()/pause()/resume()/cancel()          SpeechEngine
//!        │                                        │
//!        ▼                                        ▼  (SessionEvents, tagged)
//! PlaybackController::run()  ◀── mpsc ── Started/Boundary/Ended/Error
//!        │
//!        ├─ transform() → Utterance → engine.speak()
//!        ├─ BoundaryWalker::walk() over mapped source spans
//!        └─ SharedState (highlight, cursor, state) ◀── read by the UI
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::ReaderConfig;
use crate::engine::{
    pick_best_voice, EngineEvent, SessionEvents, SpeechEngine, TaggedEvent, Utterance,
};
use crate::transform::{transform, ReadingDictionary, SourceText};

use super::state::{new_shared_state, HighlightRange, PlaybackState, SharedState};
use super::walker::{step_interval, BoundaryWalker};

// ---------------------------------------------------------------------------
// Engine-safe parameter bounds
// ---------------------------------------------------------------------------

// Platform synthesizers get unstable at parameter extremes; everything
// submitted to the engine is clamped into these ranges.
pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 1.05;
pub const MIN_PITCH: f32 = 0.9;
pub const MAX_PITCH: f32 = 1.15;

// ---------------------------------------------------------------------------
// PlaybackCommand
// ---------------------------------------------------------------------------

/// Control requests consumed by [`PlaybackController::run`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    /// Start reading `text`, beginning at source character `start_index`.
    Speak { text: String, start_index: isize },
    /// Suspend playback, keeping cursor and session for `Resume`.
    Pause,
    /// Continue a paused session.
    Resume,
    /// Stop playback and clear the highlight.
    Cancel,
}

// ---------------------------------------------------------------------------
// SessionData
// ---------------------------------------------------------------------------

/// Per-session transform output retained for event handling.
struct SessionData {
    /// The original display text being read.
    text: Arc<SourceText>,
    /// Spoken-character → source-character offset map.
    index_map: Vec<usize>,
    /// Character count of the full spoken text.
    spoken_len: usize,
    /// Spoken offset the submitted slice starts at.
    spoken_start_index: usize,
    /// Source offset the highlight starts at.
    safe_start_index: usize,
    /// Clamped rate the utterance was submitted with.
    rate: f32,
    /// Source offset of the last boundary event, if any.
    prev_boundary: Option<usize>,
}

// ---------------------------------------------------------------------------
// PlaybackController
// ---------------------------------------------------------------------------

/// Drives playback for one reading surface.
///
/// All control operations return immediately; effects are observed through
/// [`SharedState`].  For event-driven use, spawn [`run`](Self::run) and feed
/// it [`PlaybackCommand`]s over an mpsc channel, in which case engine events
/// and commands are serialized onto one task.
pub struct PlaybackController {
    shared: SharedState,
    engine: Arc<dyn SpeechEngine>,
    walker: BoundaryWalker,
    config: ReaderConfig,
    dictionary: ReadingDictionary,
    session: u64,
    current: Option<SessionData>,
    event_tx: mpsc::UnboundedSender<TaggedEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<TaggedEvent>>,
}

impl PlaybackController {
    /// Create a controller for `engine` with the given dictionary and
    /// configuration.
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        dictionary: ReadingDictionary,
        config: ReaderConfig,
    ) -> Self {
        let shared = new_shared_state();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let walker = BoundaryWalker::new(Arc::clone(&shared), config.walk.clone());
        Self {
            shared,
            engine,
            walker,
            config,
            dictionary,
            session: 0,
            current: None,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Handle to the shared state the presentation layer renders from.
    pub fn shared_state(&self) -> SharedState {
        Arc::clone(&self.shared)
    }

    /// Current session id.  Incremented by every `speak` and `cancel`.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.shared.lock().unwrap().playback
    }

    /// Current highlight range.
    pub fn highlight(&self) -> HighlightRange {
        self.shared.lock().unwrap().highlight
    }

    // -----------------------------------------------------------------------
    // Control operations
    // -----------------------------------------------------------------------

    /// Start reading `text` from `start_index`, using the configured locale,
    /// rate, and pitch.  Supersedes any active session.
    pub fn speak(&mut self, text: &str, start_index: isize) {
        let locale = self.config.speech.locale.clone();
        let (rate, pitch) = (self.config.speech.rate, self.config.speech.pitch);
        self.speak_with(text, &locale, rate, pitch, start_index);
    }

    /// Start reading `text` with explicit speech parameters.
    ///
    /// Empty text is a no-op.  `rate` and `pitch` are clamped into the
    /// engine-safe ranges; `start_index` is clamped into the text.
    pub fn speak_with(
        &mut self,
        text: &str,
        locale: &str,
        rate: f32,
        pitch: f32,
        start_index: isize,
    ) {
        if text.is_empty() {
            return;
        }

        self.session += 1;
        let session = self.session;

        self.walker.stop();
        if self.engine.is_speaking() || self.engine.is_paused() {
            self.engine.cancel();
        }

        let result = transform(text, start_index, &self.dictionary);
        let source = Arc::new(SourceText::new(text));
        let safe_rate = rate.clamp(MIN_RATE, MAX_RATE);
        let safe_pitch = pitch.clamp(MIN_PITCH, MAX_PITCH);

        {
            let mut st = self.shared.lock().unwrap();
            st.session = session;
            st.cursor = result.safe_start_index;
            st.highlight = HighlightRange::single(result.safe_start_index, source.len());
            st.playback = PlaybackState::Playing;
        }

        let utterance = Utterance {
            text: result.sliced_spoken_text,
            locale: locale.to_string(),
            rate: safe_rate,
            pitch: safe_pitch,
            volume: 1.0,
            voice: pick_best_voice(&self.engine.list_voices(), locale),
        };

        log::debug!(
            "playback: session {session} speaking from source offset {} ({} spoken chars)",
            result.safe_start_index,
            utterance.text.chars().count(),
        );

        self.current = Some(SessionData {
            text: source,
            spoken_len: result.full_spoken_text.chars().count(),
            index_map: result.index_map,
            spoken_start_index: result.spoken_start_index,
            safe_start_index: result.safe_start_index,
            rate: safe_rate,
            prev_boundary: None,
        });

        self.engine
            .speak(utterance, SessionEvents::new(session, self.event_tx.clone()));
    }

    /// Suspend playback.  No-op unless currently playing.
    pub fn pause(&mut self) {
        let playing = self.shared.lock().unwrap().playback == PlaybackState::Playing;
        if playing && self.engine.is_speaking() {
            self.engine.pause();
            self.walker.stop();
            self.shared.lock().unwrap().playback = PlaybackState::Paused;
            log::debug!("playback: session {} paused", self.session);
        }
    }

    /// Continue a paused session from the stored cursor.  No-op unless
    /// currently paused.
    pub fn resume(&mut self) {
        let paused = self.shared.lock().unwrap().playback == PlaybackState::Paused;
        if paused && self.engine.is_paused() {
            self.engine.resume();
            let cursor = {
                let mut st = self.shared.lock().unwrap();
                st.playback = PlaybackState::Playing;
                st.cursor
            };
            if let Some(cur) = &self.current {
                self.walker
                    .walk(Arc::clone(&cur.text), cursor, cur.text.len(), cur.rate);
            }
            log::debug!("playback: session {} resumed at cursor {cursor}", self.session);
        }
    }

    /// Stop playback, clear the highlight, and invalidate the session so
    /// any still-in-flight callback of the canceled utterance is inert.
    pub fn cancel(&mut self) {
        self.session += 1;
        log::debug!("playback: cancel, sessions before {} are now inert", self.session);

        self.engine.cancel();
        self.walker.stop();
        self.current = None;

        let mut st = self.shared.lock().unwrap();
        st.session = self.session;
        st.highlight = HighlightRange::CLEAR;
        st.playback = PlaybackState::Stopped;
    }

    // -----------------------------------------------------------------------
    // Engine event handling
    // -----------------------------------------------------------------------

    /// Apply one engine event.  Events tagged with a superseded session are
    /// silently discarded — an expected race, not an error.
    pub fn handle_event(&mut self, session: u64, event: EngineEvent) {
        if session != self.session {
            log::debug!(
                "playback: ignoring stale {event:?} from session {session} (current {})",
                self.session
            );
            return;
        }
        match event {
            EngineEvent::Started => self.on_started(),
            EngineEvent::Boundary { char_index } => self.on_boundary(char_index),
            EngineEvent::Ended => self.on_ended(),
            EngineEvent::Error(message) => self.on_error(&message),
        }
    }

    /// Audio began: walk the whole remaining text.  If the engine never
    /// reports boundaries this is the only interpolation the session gets.
    fn on_started(&mut self) {
        if self.shared.lock().unwrap().playback != PlaybackState::Playing {
            return;
        }
        if let Some(cur) = &self.current {
            self.walker.walk(
                Arc::clone(&cur.text),
                cur.safe_start_index,
                cur.text.len(),
                cur.rate,
            );
        }
    }

    /// Ground-truth progress marker: re-anchor the cursor and walk the span
    /// between the previous boundary and this one.
    fn on_boundary(&mut self, char_index: usize) {
        if self.shared.lock().unwrap().playback != PlaybackState::Playing {
            return;
        }
        let Some(cur) = self.current.as_mut() else {
            return;
        };
        self.walker.stop();

        if cur.spoken_len == 0 {
            return;
        }
        // The engine reports offsets into the sliced utterance text.
        let bounded = (char_index + cur.spoken_start_index).min(cur.spoken_len - 1);
        let this_start = cur.index_map[bounded];
        let text_len = cur.text.len();

        match cur.prev_boundary {
            Some(prev_start) if this_start > prev_start => {
                // Walk the span the engine just finished pronouncing.  The
                // cursor may already be inside it; it never moves backward.
                {
                    let mut st = self.shared.lock().unwrap();
                    if st.cursor < prev_start {
                        st.cursor = prev_start;
                    }
                    st.highlight = HighlightRange::single(st.cursor, text_len);
                }
                self.walker
                    .walk(Arc::clone(&cur.text), prev_start, this_start, cur.rate);
            }
            _ => {
                // First boundary, or a non-advancing one: snap directly.
                let mut st = self.shared.lock().unwrap();
                st.cursor = this_start;
                st.highlight = HighlightRange::single(this_start, text_len);
            }
        }
        cur.prev_boundary = Some(this_start);
    }

    /// Normal end of the utterance: finish walking past the last boundary,
    /// then clear the highlight after the grace delay.
    fn on_ended(&mut self) {
        self.walker.stop();

        let Some(mut cur) = self.current.take() else {
            let mut st = self.shared.lock().unwrap();
            st.highlight = HighlightRange::CLEAR;
            st.playback = PlaybackState::Stopped;
            return;
        };

        match cur.prev_boundary.take() {
            Some(last) if last + 1 < cur.text.len() => {
                let text_len = cur.text.len();
                self.walker
                    .walk(Arc::clone(&cur.text), last, text_len, cur.rate);

                // Clear once the final walk has had time to reach the end,
                // plus the grace period.  Session-checked so a new speak()
                // inside the window keeps its own highlight.
                let remaining = (text_len - 1 - last) as u32;
                let step = step_interval(&self.config.walk, cur.rate);
                let delay = step * remaining
                    + Duration::from_millis(self.config.highlight_grace_ms);
                let shared = Arc::clone(&self.shared);
                let session = self.session;
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let mut st = shared.lock().unwrap();
                    if st.session == session {
                        st.highlight = HighlightRange::CLEAR;
                    }
                });
            }
            _ => {
                self.shared.lock().unwrap().highlight = HighlightRange::CLEAR;
            }
        }

        self.shared.lock().unwrap().playback = PlaybackState::Stopped;
        log::debug!("playback: session {} ended", self.session);
    }

    /// Engine abort: a normal termination path, never retried.
    fn on_error(&mut self, message: &str) {
        log::warn!("playback: session {} engine error: {message}", self.session);
        self.walker.stop();
        self.current = None;

        let mut st = self.shared.lock().unwrap();
        st.highlight = HighlightRange::CLEAR;
        st.playback = PlaybackState::Stopped;
    }

    // -----------------------------------------------------------------------
    // Event pump
    // -----------------------------------------------------------------------

    /// Run the controller until `commands` is closed, serializing commands
    /// and engine events onto the calling task.
    ///
    /// Engine events are drained with priority so a scripted or fast engine
    /// cannot race command shutdown.
    pub async fn run(mut self, mut commands: mpsc::Receiver<PlaybackCommand>) {
        let Some(mut events) = self.event_rx.take() else {
            return;
        };
        loop {
            tokio::select! {
                biased;
                Some((session, event)) = events.recv() => {
                    self.handle_event(session, event);
                }
                cmd = commands.recv() => match cmd {
                    Some(PlaybackCommand::Speak { text, start_index }) => {
                        self.speak(&text, start_index);
                    }
                    Some(PlaybackCommand::Pause) => self.pause(),
                    Some(PlaybackCommand::Resume) => self.resume(),
                    Some(PlaybackCommand::Cancel) => self.cancel(),
                    None => break,
                },
            }
        }
        log::info!("playback: command channel closed, controller shutting down");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
