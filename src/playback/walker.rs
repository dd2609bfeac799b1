//! Boundary walker — timer-driven highlight interpolation.
//!
//! The speech engine's boundary events are coarse and infrequent; between
//! them the highlight would freeze.  [`BoundaryWalker`] fills the gaps: it
//! advances the shared cursor one non-whitespace character per tick across a
//! `[start, end)` span, at an interval derived from the speech rate, until
//! the span is exhausted or the walker is stopped.
//!
//! Each `walk` call owns exactly one cancelable tokio task; starting a new
//! walk always stops the previous one first, and every tick re-checks the
//! session id so a superseded walker can never move a newer session's
//! highlight.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::WalkConfig;
use crate::transform::SourceText;

use super::state::{HighlightRange, SharedState};

// ---------------------------------------------------------------------------
// Tick interval
// ---------------------------------------------------------------------------

/// Tick interval for `rate`: `base_step_ms / max(0.5, rate)`, floored at
/// `min_step_ms`.
pub(crate) fn step_interval(config: &WalkConfig, rate: f32) -> Duration {
    let ms = (config.base_step_ms as f32 / rate.max(0.5)).round() as u64;
    Duration::from_millis(ms.max(config.min_step_ms))
}

// ---------------------------------------------------------------------------
// BoundaryWalker
// ---------------------------------------------------------------------------

/// Owns the single active walk timer and the shared state it writes to.
pub struct BoundaryWalker {
    shared: SharedState,
    config: WalkConfig,
    handle: Option<JoinHandle<()>>,
}

impl BoundaryWalker {
    /// Create a walker writing highlight updates into `shared`.
    pub fn new(shared: SharedState, config: WalkConfig) -> Self {
        Self {
            shared,
            config,
            handle: None,
        }
    }

    /// Start walking the cursor across `[start, end)` in `text`.
    ///
    /// Any previous walk is stopped first.  The span is clamped into the
    /// text; the cursor is pulled forward to `start` when it lags but never
    /// pushed backward.  A degenerate span (`end - start <= 1`) sets the
    /// highlight once and schedules no timer.
    pub fn walk(&mut self, text: Arc<SourceText>, start: usize, end: usize, rate: f32) {
        self.stop();
        if text.is_empty() {
            return;
        }

        let safe_start = start.min(text.len() - 1);
        let safe_end = end.min(text.len()).max(safe_start + 1);

        let session = {
            let mut st = self.shared.lock().unwrap();
            if st.cursor < safe_start {
                st.cursor = safe_start;
            }
            st.session
        };

        if safe_end - safe_start <= 1 {
            let mut st = self.shared.lock().unwrap();
            st.cursor = safe_start;
            st.highlight = HighlightRange::single(safe_start, text.len());
            return;
        }

        let step = step_interval(&self.config, rate);
        let shared = Arc::clone(&self.shared);

        self.handle = Some(tokio::spawn(async move {
            loop {
                tokio::time::sleep(step).await;

                let mut st = shared.lock().unwrap();
                if st.session != session {
                    return; // superseded while a tick was pending
                }
                let cur = st.cursor;
                if cur >= safe_end - 1 {
                    return;
                }

                let mut next = cur + 1;
                while next < safe_end && text.is_whitespace_at(next) {
                    next += 1;
                }

                st.cursor = next;
                st.highlight = HighlightRange::single(next, text.len());
            }
        }));
    }

    /// Cancel any active walk timer.  Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Returns `true` while a walk task exists and has not finished.
    pub fn is_walking(&self) -> bool {
        self.handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for BoundaryWalker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
