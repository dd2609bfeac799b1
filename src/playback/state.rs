//! Playback state machine types and shared reader state.
//!
//! [`PlaybackState`] is the controller's three-state machine.  The
//! presentation layer reads the live highlight and state through
//! [`SharedState`], a cheap-to-clone `Arc<Mutex<ReaderState>>` — the
//! controller and walker mutate it, the UI samples it.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// PlaybackState
// ---------------------------------------------------------------------------

/// States of one playback attempt.
///
/// ```text
/// Stopped ──speak──▶ Playing ──pause──▶ Paused
///                       │ ▲               │
///                       │ └────resume─────┘
///    ◀──cancel / Ended / Error──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is being read; the highlight is cleared.
    Stopped,

    /// An utterance is active and the highlight cursor is advancing.
    Playing,

    /// Output is suspended; cursor and session survive for `resume`.
    Paused,
}

impl PlaybackState {
    /// Returns `true` while a session exists (`Playing` or `Paused`).
    pub fn is_active(&self) -> bool {
        matches!(self, PlaybackState::Playing | PlaybackState::Paused)
    }

    /// A short human-readable label suitable for a UI status bar.
    pub fn label(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

// ---------------------------------------------------------------------------
// HighlightRange
// ---------------------------------------------------------------------------

/// Half-open interval `[start, end)` in source character coordinates.
///
/// `[0, 0)` denotes "no highlight".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightRange {
    pub start: usize,
    pub end: usize,
}

impl HighlightRange {
    /// The cleared ("no highlight") range.
    pub const CLEAR: HighlightRange = HighlightRange { start: 0, end: 0 };

    /// Single-character highlight at `start`, with the end capped at
    /// `text_len`.
    pub fn single(start: usize, text_len: usize) -> Self {
        Self {
            start,
            end: (start + 1).min(text_len).max(start),
        }
    }

    /// Returns `true` for the cleared range.
    pub fn is_clear(&self) -> bool {
        self.start == self.end
    }
}

impl Default for HighlightRange {
    fn default() -> Self {
        Self::CLEAR
    }
}

// ---------------------------------------------------------------------------
// ReaderState / SharedState
// ---------------------------------------------------------------------------

/// Shared reader state — what the presentation layer renders from.
///
/// `session` is the monotonic playback-session counter; the walker checks it
/// before every write so a superseded walker tick can never move a newer
/// session's highlight.
#[derive(Debug, Default)]
pub struct ReaderState {
    /// Current phase of the playback state machine.
    pub playback: PlaybackState,

    /// The span to highlight, in source character coordinates.
    pub highlight: HighlightRange,

    /// Monotonic id of the current playback session.
    pub session: u64,

    /// Last reported highlight cursor position, in source character
    /// coordinates.  Survives pause so `resume` continues in place.
    pub cursor: usize,
}

/// Thread-safe handle to [`ReaderState`].
///
/// Cheap to clone (`Arc` clone).  Lock for a short critical section; do
/// **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<ReaderState>>;

/// Construct a new [`SharedState`] wrapping a default [`ReaderState`].
pub fn new_shared_state() -> SharedState {
    Arc::new(Mutex::new(ReaderState::default()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
