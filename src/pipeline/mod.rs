//! Pipeline orchestrator module.
//!
//! Wires the two interactive pipelines — text analysis and audio
//! transcription — and exposes the shared state the UI reads every frame.
//!
//! # Architecture
//!
//! ```text
//! PipelineCommand (mpsc)
//!        │
//!        ▼
//! PipelineOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ AnalyzeText   → spawn_blocking(tag + buckets + clouds + NER)
//!        │
//!        └─ TranscribeWav → spawn_blocking(WavClip::load)
//!                           → SpeechRecognizer::transcribe (HTTP)
//!
//! SharedState (Arc<Mutex<AppState>>) ←─── read by egui update() each frame
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineCommand, PipelineOrchestrator};
pub use state::{new_shared_state, AppState, AudioPhase, SharedState, TextPhase};
