//! Pipeline orchestrator — drives both the text and the audio pipelines.
//!
//! [`PipelineOrchestrator`] owns the [`SharedState`] and responds to
//! [`PipelineCommand`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! PipelineCommand::AnalyzeText(document)
//!   ├─ blank? ─▶ TextPhase::EmptyInput (no run)
//!   └─▶ spawn_blocking(analyze: tag → buckets → clouds → NER)  [Analyzing]
//!         ├─ Ok  → store AnalysisReport                        [Report]
//!         └─ Err → store message                               [Failed]
//!
//! PipelineCommand::TranscribeWav(path)
//!   └─▶ spawn_blocking(WavClip::load)                          [Transcribing]
//!         └─▶ recognizer.transcribe (async HTTP)
//!               ├─ Ok  → store transcript                      [Transcript]
//!               └─ Err → store message                         [Failed]
//! ```
//!
//! Exactly one command is processed at a time — a long run blocks the next
//! command in the channel, never the UI thread.  All blocking work (ONNX
//! inference, file reads) is pushed onto `tokio::task::spawn_blocking` so
//! the async runtime never stalls.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::analysis;
use crate::audio::WavClip;
use crate::nlp::{EntityRecognizer, PosTagger};
use crate::speech::SpeechRecognizer;

use super::state::{AudioPhase, SharedState, TextPhase};

// ---------------------------------------------------------------------------
// PipelineCommand
// ---------------------------------------------------------------------------

/// Commands sent from the UI to the orchestrator.
///
/// Each command carries its full input — the orchestrator holds no document
/// state of its own, so every run is a function of what the UI sent.
#[derive(Debug, Clone)]
pub enum PipelineCommand {
    /// Run the text pipeline over the current document.
    AnalyzeText(String),
    /// Transcribe the WAV file at the given path.
    TranscribeWav(PathBuf),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives the text-analysis and audio-transcription pipelines.
///
/// Create with [`PipelineOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task.
pub struct PipelineOrchestrator {
    state: SharedState,
    tagger: Arc<dyn PosTagger>,
    entities: Arc<dyn EntityRecognizer>,
    speech: Arc<dyn SpeechRecognizer>,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `state`    — shared application state (also read by the UI).
    /// * `tagger`   — POS tagger (e.g. `OnnxPosTagger`).
    /// * `entities` — entity recognizer (e.g. `OnnxEntityRecognizer`).
    /// * `speech`   — transcription backend (e.g. `RemoteRecognizer`).
    pub fn new(
        state: SharedState,
        tagger: Arc<dyn PosTagger>,
        entities: Arc<dyn EntityRecognizer>,
        speech: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            state,
            tagger,
            entities,
            speech,
        }
    }

    /// Run the orchestrator until `command_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task from
    /// `main()`.  It never returns while the channel is open.
    pub async fn run(self, mut command_rx: mpsc::Receiver<PipelineCommand>) {
        while let Some(command) = command_rx.recv().await {
            match command {
                PipelineCommand::AnalyzeText(document) => {
                    self.handle_analyze(document).await;
                }
                PipelineCommand::TranscribeWav(path) => {
                    self.handle_transcribe(path).await;
                }
            }
        }

        log::info!("pipeline: command channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Text pipeline
    // -----------------------------------------------------------------------

    async fn handle_analyze(&self, document: String) {
        // Blank document → warning, no pipeline run.
        if document.trim().is_empty() {
            log::debug!("pipeline: analyze requested on blank document");
            let mut st = self.state.lock().unwrap();
            st.text = TextPhase::EmptyInput;
            st.report = None;
            st.text_error = None;
            return;
        }

        {
            let mut st = self.state.lock().unwrap();
            st.text = TextPhase::Analyzing;
            st.report = None;
            st.text_error = None;
        }

        // ONNX inference is CPU-bound → thread pool.
        let tagger = Arc::clone(&self.tagger);
        let entities = Arc::clone(&self.entities);

        let result = tokio::task::spawn_blocking(move || {
            analysis::analyze(&document, tagger.as_ref(), entities.as_ref())
        })
        .await;

        let mut st = self.state.lock().unwrap();
        match result {
            Ok(Ok(report)) => {
                log::debug!(
                    "pipeline: analysis done ({} entities)",
                    report.entities.len()
                );
                st.report = Some(report);
                st.text = TextPhase::Report;
            }
            Ok(Err(e)) => {
                log::error!("pipeline: analysis failed: {e}");
                st.text_error = Some(e.to_string());
                st.text = TextPhase::Failed;
            }
            Err(e) => {
                log::error!("pipeline: analysis task panicked: {e}");
                st.text_error = Some(format!("internal error: {e}"));
                st.text = TextPhase::Failed;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Audio pipeline
    // -----------------------------------------------------------------------

    async fn handle_transcribe(&self, path: PathBuf) {
        {
            let mut st = self.state.lock().unwrap();
            st.audio = AudioPhase::Transcribing;
            st.transcript = None;
            st.audio_error = None;
        }

        // Read + validate the upload off the async runtime.
        let load_path = path.clone();
        let clip = match tokio::task::spawn_blocking(move || WavClip::load(&load_path)).await {
            Ok(Ok(clip)) => clip,
            Ok(Err(e)) => {
                log::warn!("pipeline: rejected upload {}: {e}", path.display());
                self.fail_audio(e.to_string());
                return;
            }
            Err(e) => {
                log::error!("pipeline: wav load task panicked: {e}");
                self.fail_audio(format!("internal error: {e}"));
                return;
            }
        };

        log::info!(
            "pipeline: transcribing {} ({:.1}s, {} Hz, {} ch)",
            path.display(),
            clip.duration_secs(),
            clip.sample_rate(),
            clip.channels()
        );

        match self.speech.transcribe(&clip).await {
            Ok(text) => {
                let mut st = self.state.lock().unwrap();
                st.transcript = Some(text);
                st.audio = AudioPhase::Transcript;
            }
            Err(e) => {
                log::warn!("pipeline: transcription failed: {e}");
                self.fail_audio(e.to_string());
            }
        }
    }

    fn fail_audio(&self, message: String) {
        let mut st = self.state.lock().unwrap();
        st.audio_error = Some(message);
        st.audio = AudioPhase::Failed;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::WordClass;
    use crate::config::AppConfig;
    use crate::nlp::{MockEntityRecognizer, MockTagger};
    use crate::pipeline::state::new_shared_state;
    use crate::speech::{MockRecognizer, TranscribeError};

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn make_orchestrator(
        tagger: MockTagger,
        entities: MockEntityRecognizer,
        speech: MockRecognizer,
    ) -> (PipelineOrchestrator, SharedState) {
        let state = new_shared_state(AppConfig::default());
        let orc = PipelineOrchestrator::new(
            Arc::clone(&state),
            Arc::new(tagger),
            Arc::new(entities),
            Arc::new(speech),
        );
        (orc, state)
    }

    /// Write a small valid WAV file into `dir` and return its path.
    fn write_wav(dir: &std::path::Path) -> PathBuf {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let path = dir.join("clip.wav");
        let mut writer = hound::WavWriter::create(&path, spec).expect("writer");
        for i in 0..16_000u32 {
            writer.write_sample((i % 64) as i16).expect("sample");
        }
        writer.finalize().expect("finalize");
        path
    }

    async fn run_one(orc: PipelineOrchestrator, command: PipelineCommand) {
        let (tx, rx) = mpsc::channel(4);
        tx.send(command).await.unwrap();
        drop(tx); // close channel so run() returns
        orc.run(rx).await;
    }

    // -----------------------------------------------------------------------
    // Text pipeline
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn analyze_produces_report() {
        let tagger = MockTagger::with_pairs(&[("city", "NN"), ("sleeps", "VBZ")]);
        let (orc, state) =
            make_orchestrator(tagger, MockEntityRecognizer::empty(), MockRecognizer::ok(""));

        run_one(orc, PipelineCommand::AnalyzeText("city sleeps".into())).await;

        let st = state.lock().unwrap();
        assert_eq!(st.text, TextPhase::Report);
        let report = st.report.as_ref().expect("report");
        assert_eq!(report.buckets.words(WordClass::Noun), ["city"]);
        assert_eq!(report.buckets.words(WordClass::Verb), ["sleeps"]);
        assert!(st.text_error.is_none());
    }

    #[tokio::test]
    async fn blank_document_is_empty_input_without_a_run() {
        let tagger = MockTagger::with_pairs(&[("never", "RB")]);
        let (orc, state) =
            make_orchestrator(tagger, MockEntityRecognizer::empty(), MockRecognizer::ok(""));

        run_one(orc, PipelineCommand::AnalyzeText("   \n\t ".into())).await;

        let st = state.lock().unwrap();
        assert_eq!(st.text, TextPhase::EmptyInput);
        assert!(st.report.is_none());
        assert!(st.text_error.is_none());
    }

    #[tokio::test]
    async fn tagger_failure_sets_failed_phase() {
        let (orc, state) = make_orchestrator(
            MockTagger::failing(),
            MockEntityRecognizer::empty(),
            MockRecognizer::ok(""),
        );

        run_one(orc, PipelineCommand::AnalyzeText("some text".into())).await;

        let st = state.lock().unwrap();
        assert_eq!(st.text, TextPhase::Failed);
        assert!(st.report.is_none());
        assert!(st.text_error.as_deref().is_some_and(|m| !m.is_empty()));
    }

    /// A second run replaces the previous report wholesale.
    #[tokio::test]
    async fn rerun_overwrites_previous_report() {
        let tagger = MockTagger::with_pairs(&[("night", "NN")]);
        let (orc, state) =
            make_orchestrator(tagger, MockEntityRecognizer::empty(), MockRecognizer::ok(""));

        let (tx, rx) = mpsc::channel(4);
        tx.send(PipelineCommand::AnalyzeText("night".into()))
            .await
            .unwrap();
        tx.send(PipelineCommand::AnalyzeText("night night".into()))
            .await
            .unwrap();
        drop(tx);
        orc.run(rx).await;

        let st = state.lock().unwrap();
        assert_eq!(st.text, TextPhase::Report);
        assert_eq!(
            st.report.as_ref().unwrap().buckets.count(WordClass::Noun),
            1
        );
    }

    // -----------------------------------------------------------------------
    // Audio pipeline
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn transcribe_stores_transcript() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_wav(dir.path());

        let (orc, state) = make_orchestrator(
            MockTagger::with_pairs(&[]),
            MockEntityRecognizer::empty(),
            MockRecognizer::ok("hello from the demo"),
        );

        run_one(orc, PipelineCommand::TranscribeWav(path)).await;

        let st = state.lock().unwrap();
        assert_eq!(st.audio, AudioPhase::Transcript);
        assert_eq!(st.transcript.as_deref(), Some("hello from the demo"));
        assert!(st.audio_error.is_none());
    }

    #[tokio::test]
    async fn unintelligible_audio_sets_failed_with_message() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_wav(dir.path());

        let (orc, state) = make_orchestrator(
            MockTagger::with_pairs(&[]),
            MockEntityRecognizer::empty(),
            MockRecognizer::err(TranscribeError::Unintelligible),
        );

        run_one(orc, PipelineCommand::TranscribeWav(path)).await;

        let st = state.lock().unwrap();
        assert_eq!(st.audio, AudioPhase::Failed);
        // Transcript area must stay unpopulated.
        assert!(st.transcript.is_none());
        assert!(st
            .audio_error
            .as_deref()
            .is_some_and(|m| m.contains("understand")));
    }

    #[tokio::test]
    async fn service_error_carries_service_message() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_wav(dir.path());

        let (orc, state) = make_orchestrator(
            MockTagger::with_pairs(&[]),
            MockEntityRecognizer::empty(),
            MockRecognizer::err(TranscribeError::Service("quota exceeded".into())),
        );

        run_one(orc, PipelineCommand::TranscribeWav(path)).await;

        let st = state.lock().unwrap();
        assert_eq!(st.audio, AudioPhase::Failed);
        assert!(st
            .audio_error
            .as_deref()
            .is_some_and(|m| m.contains("quota exceeded")));
    }

    #[tokio::test]
    async fn unreadable_upload_never_reaches_the_service() {
        let (orc, state) = make_orchestrator(
            MockTagger::with_pairs(&[]),
            MockEntityRecognizer::empty(),
            MockRecognizer::ok("should not be used"),
        );

        run_one(
            orc,
            PipelineCommand::TranscribeWav("/nonexistent/clip.wav".into()),
        )
        .await;

        let st = state.lock().unwrap();
        assert_eq!(st.audio, AudioPhase::Failed);
        assert!(st.transcript.is_none());
    }
}
