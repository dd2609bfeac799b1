//! Playback orchestration: session-tokened state machine plus the
//! timer-driven highlight walker.
//!
//! The submodules split along lifetime lines:
//!
//! - [`state`] — the shared snapshot (`PlaybackState`, `HighlightRange`,
//!   cursor, session) the presentation layer polls.
//! - [`walker`] — the cancelable interpolation task that advances the
//!   highlight between engine boundary reports.
//! - [`controller`] — the state machine that owns the session counter and
//!   turns control calls and engine events into state mutations.

pub mod controller;
pub mod state;
pub mod walker;

pub use controller::{PlaybackCommand, PlaybackController};
pub use state::{new_shared_state, HighlightRange, PlaybackState, ReaderState, SharedState};
pub use walker::BoundaryWalker;
