//! Pipeline phases and shared application state.
//!
//! [`AppState`] is the single source of truth for everything the UI needs:
//! the phase of each pipeline, the last transcript or analysis report, and
//! any error message.  The orchestrator mutates it; the egui update loop
//! reads it each frame.
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>` — cheap to
//! clone and safe to share across threads.

use std::sync::{Arc, Mutex};

use crate::analysis::AnalysisReport;
use crate::config::AppConfig;

// ---------------------------------------------------------------------------
// AudioPhase
// ---------------------------------------------------------------------------

/// States of the audio transcription pipeline.
///
/// ```text
/// Idle ──file chosen──▶ Transcribing ──service ok──▶ Transcript
///                                    ──failure────▶ Failed
/// Transcript / Failed ──next upload──▶ Transcribing
/// ```
///
/// Terminal on first result; there is no retry or cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioPhase {
    /// Waiting for the user to choose a WAV file.
    Idle,
    /// The clip is at the recognition service.
    Transcribing,
    /// A transcript is ready and displayed.
    Transcript,
    /// The upload or the service failed; the error banner is showing.
    Failed,
}

impl AudioPhase {
    /// `true` while a request is in flight.
    pub fn is_busy(&self) -> bool {
        *self == AudioPhase::Transcribing
    }
}

impl Default for AudioPhase {
    fn default() -> Self {
        AudioPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// TextPhase
// ---------------------------------------------------------------------------

/// States of the text analysis pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextPhase {
    /// Nothing analysed yet.
    Idle,
    /// The user pressed Analyze on a blank document; the warning is showing.
    EmptyInput,
    /// Tagging / entity recognition in progress.
    Analyzing,
    /// A report is ready and displayed.
    Report,
    /// The NLP engine failed; the error banner is showing.
    Failed,
}

impl TextPhase {
    /// `true` while an analysis run is in flight.
    pub fn is_busy(&self) -> bool {
        *self == TextPhase::Analyzing
    }
}

impl Default for TextPhase {
    fn default() -> Self {
        TextPhase::Idle
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state — the single source of truth for the UI.
///
/// Held behind [`SharedState`] (`Arc<Mutex<AppState>>`).
pub struct AppState {
    /// Phase of the audio pipeline.
    pub audio: AudioPhase,
    /// Last successful transcript (`None` until one completes).
    pub transcript: Option<String>,
    /// Error message shown when `audio == AudioPhase::Failed`.
    pub audio_error: Option<String>,

    /// Phase of the text pipeline.
    pub text: TextPhase,
    /// Last analysis report (`None` until one completes).
    pub report: Option<AnalysisReport>,
    /// Error message shown when `text == TextPhase::Failed`.
    pub text_error: Option<String>,

    /// Application configuration (read-only after startup).
    pub config: AppConfig,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            audio: AudioPhase::Idle,
            transcript: None,
            audio_error: None,
            text: TextPhase::Idle,
            report: None,
            text_error: None,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping a default [`AppState`].
pub fn new_shared_state(config: AppConfig) -> SharedState {
    Arc::new(Mutex::new(AppState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcribing_is_busy() {
        assert!(AudioPhase::Transcribing.is_busy());
        assert!(!AudioPhase::Idle.is_busy());
        assert!(!AudioPhase::Transcript.is_busy());
        assert!(!AudioPhase::Failed.is_busy());
    }

    #[test]
    fn analyzing_is_busy() {
        assert!(TextPhase::Analyzing.is_busy());
        assert!(!TextPhase::Idle.is_busy());
        assert!(!TextPhase::EmptyInput.is_busy());
        assert!(!TextPhase::Report.is_busy());
        assert!(!TextPhase::Failed.is_busy());
    }

    #[test]
    fn defaults_are_idle() {
        assert_eq!(AudioPhase::default(), AudioPhase::Idle);
        assert_eq!(TextPhase::default(), TextPhase::Idle);

        let state = AppState::default();
        assert_eq!(state.audio, AudioPhase::Idle);
        assert_eq!(state.text, TextPhase::Idle);
        assert!(state.transcript.is_none());
        assert!(state.report.is_none());
        assert!(state.audio_error.is_none());
        assert!(state.text_error.is_none());
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state(AppConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().unwrap().text = TextPhase::Analyzing;
        assert_eq!(state2.lock().unwrap().text, TextPhase::Analyzing);
    }
}
