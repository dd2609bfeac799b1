//! Demo entry point — read-along.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`ReaderConfig`] from disk (returns default on first run).
//! 3. Load the reading dictionary (built-in entries + user overrides).
//! 4. Build a scripted speech engine standing in for the platform
//!    synthesizer.
//! 5. Spawn the [`PlaybackController`] pump and submit a `Speak` command.
//! 6. Drive engine events on a timer while the main task renders the
//!    highlight to stdout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use read_along::{
    config::ReaderConfig,
    engine::{EngineEvent, MockSpeechEngine, SpeechEngine, VoiceDescriptor},
    playback::{PlaybackCommand, PlaybackController, PlaybackState},
    transform::ReadingDictionary,
};

// ---------------------------------------------------------------------------
// Highlight rendering
// ---------------------------------------------------------------------------

/// Render `text` with the highlighted character bracketed, e.g.
/// `1.太【陽】從東邊升起`.
fn render_line(text: &str, start: usize, end: usize) -> String {
    let mut out = String::new();
    for (i, ch) in text.chars().enumerate() {
        if i == start {
            out.push('【');
        }
        out.push(ch);
        if i + 1 == end {
            out.push('】');
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Scripted engine driver
// ---------------------------------------------------------------------------

/// Feed the parked event channel the way a real synthesizer would: start,
/// a boundary per spoken word, then end.
async fn drive_engine(engine: Arc<MockSpeechEngine>, boundaries: Vec<usize>) {
    // The controller submits the utterance before this task first polls.
    let events = loop {
        if let Some(events) = engine.take_events() {
            break events;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    };

    events.emit(EngineEvent::Started);
    for char_index in boundaries {
        tokio::time::sleep(Duration::from_millis(700)).await;
        events.emit(EngineEvent::Boundary { char_index });
    }
    tokio::time::sleep(Duration::from_millis(700)).await;
    events.emit(EngineEvent::Ended);
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("read-along demo starting up");

    // 2. Configuration
    let config = ReaderConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        ReaderConfig::default()
    });

    // 3. Reading dictionary
    let dictionary = ReadingDictionary::load_or_default();

    // 4. Scripted speech engine
    let engine = Arc::new(MockSpeechEngine::manual().with_voices(vec![VoiceDescriptor {
        name: "Yating".into(),
        locale: "zh-TW".into(),
        local_service: true,
    }]));

    // 5. Controller pump
    let controller = {
        let engine: Arc<dyn SpeechEngine> = Arc::clone(&engine) as _;
        PlaybackController::new(engine, dictionary, config)
    };
    let shared = controller.shared_state();

    let (command_tx, command_rx) = mpsc::channel::<PlaybackCommand>(16);
    tokio::spawn(controller.run(command_rx));

    let text = "1.太陽從東邊升起";
    println!("reading: {text}");
    command_tx
        .send(PlaybackCommand::Speak {
            text: text.to_string(),
            start_index: 0,
        })
        .await
        .expect("controller pump alive");

    // 6. Drive events while rendering highlight changes.
    //    Boundary offsets index into the spoken text 第1題，太陽從東邊升起.
    let driver = tokio::spawn(drive_engine(Arc::clone(&engine), vec![0, 4, 6, 8]));

    let mut saw_highlight = false;
    let mut last = None;
    loop {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let (playback, highlight) = {
            let st = shared.lock().unwrap();
            (st.playback, st.highlight)
        };
        if last != Some(highlight) {
            last = Some(highlight);
            if highlight.is_clear() {
                println!("{text}");
            } else {
                saw_highlight = true;
                println!("{}", render_line(text, highlight.start, highlight.end));
            }
        }
        if playback == PlaybackState::Stopped && highlight.is_clear() && saw_highlight {
            break;
        }
    }

    let _ = driver.await;
    log::info!("demo finished");
}
