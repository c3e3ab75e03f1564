//! Application entry point — Unstructured Data Analysis.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Load the two NLP models (degrade to stub engines on failure so the
//!    app still launches — the error surfaces on first Analyze).
//! 5. Build the remote speech recognizer from config.
//! 6. Spawn the pipeline orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use std::sync::Arc;

use tokio::sync::mpsc;

use unstructure::{
    app::UnstructureApp,
    config::{AppConfig, AppPaths},
    nlp::{
        Entity, EntityRecognizer, NlpError, OnnxEntityRecognizer, OnnxPosTagger, PosTagger,
        TaggedWord,
    },
    pipeline::{new_shared_state, PipelineCommand, PipelineOrchestrator},
    speech::{RemoteRecognizer, SpeechRecognizer},
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let vp = egui::ViewportBuilder::default()
        .with_inner_size([width, height])
        .with_min_inner_size([720.0, 480.0]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Unstructured Data Analysis starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 worker threads — NLP and HTTP each take one)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. NLP engines (may download model files on first run — degrade
    //    gracefully when that fails so the window still opens).
    //    Without an explicit override, the app's own models dir is searched
    //    before the hub cache.
    let mut nlp_config = config.nlp.clone();
    if nlp_config.model_dir.is_none() {
        nlp_config.model_dir = Some(AppPaths::new().models_dir);
    }

    let tagger: Arc<dyn PosTagger> = match OnnxPosTagger::load(&nlp_config) {
        Ok(tagger) => {
            log::info!("POS model loaded: {}", config.nlp.pos_repo);
            Arc::new(tagger)
        }
        Err(e) => {
            log::warn!(
                "Could not load POS model {} ({e}). Text analysis will return an error.",
                config.nlp.pos_repo
            );
            Arc::new(UnavailableTagger {
                reason: e.to_string(),
            })
        }
    };

    let entities: Arc<dyn EntityRecognizer> = match OnnxEntityRecognizer::load(&nlp_config) {
        Ok(recognizer) => {
            log::info!("NER model loaded: {}", config.nlp.ner_repo);
            Arc::new(recognizer)
        }
        Err(e) => {
            log::warn!(
                "Could not load NER model {} ({e}). Text analysis will return an error.",
                config.nlp.ner_repo
            );
            Arc::new(UnavailableEntityRecognizer {
                reason: e.to_string(),
            })
        }
    };

    // 5. Remote speech recognizer
    let speech: Arc<dyn SpeechRecognizer> = Arc::new(RemoteRecognizer::from_config(&config.speech));

    // 6. Channel + shared state + orchestrator
    let (command_tx, command_rx) = mpsc::channel::<PipelineCommand>(16);
    let shared_state = new_shared_state(config.clone());

    {
        let orchestrator = PipelineOrchestrator::new(
            Arc::clone(&shared_state),
            tagger,
            entities,
            speech,
        );
        rt.spawn(orchestrator.run(command_rx));
    }

    // 7. Build the egui app and run it (blocks until the window is closed)
    let app = UnstructureApp::new(command_tx, shared_state);
    let options = native_options(&config);

    eframe::run_native(
        "Unstructured Data Analysis",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
}

// ---------------------------------------------------------------------------
// Stub engines — used when a model failed to load at startup
// ---------------------------------------------------------------------------

struct UnavailableTagger {
    reason: String,
}

impl PosTagger for UnavailableTagger {
    fn tag(&self, _text: &str) -> Result<Vec<TaggedWord>, NlpError> {
        Err(NlpError::Unavailable(self.reason.clone()))
    }
}

struct UnavailableEntityRecognizer {
    reason: String,
}

impl EntityRecognizer for UnavailableEntityRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<Entity>, NlpError> {
        Err(NlpError::Unavailable(self.reason.clone()))
    }
}
