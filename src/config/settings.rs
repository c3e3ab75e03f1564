//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// SpeechConfig
// ---------------------------------------------------------------------------

/// Settings for the remote speech-recognition service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Base URL of the transcription endpoint.
    ///
    /// Any server that speaks the OpenAI `/v1/audio/transcriptions` wire
    /// format works — OpenAI, Groq, a local faster-whisper server, LocalAI.
    pub base_url: String,
    /// API key — `None` for local servers that require no authentication.
    pub api_key: Option<String>,
    /// Model identifier sent to the service (e.g. `"whisper-1"`).
    pub model: String,
    /// Transcription language hint as an ISO-639-1 code, or `"auto"` to let
    /// the service detect it.
    pub language: String,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            api_key: None,
            model: "whisper-1".into(),
            language: "en".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// NlpConfig
// ---------------------------------------------------------------------------

/// Settings for the two pretrained token-classification models.
///
/// Each repo must contain `model.onnx`, `tokenizer.json` and `config.json`
/// (with an `id2label` table).  Artifacts are resolved from `model_dir`
/// first, then the Hugging Face hub cache (downloading on first use).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NlpConfig {
    /// HF repo id of the part-of-speech model (Penn Treebank labels).
    pub pos_repo: String,
    /// HF repo id of the named-entity model (CoNLL BIO labels).
    pub ner_repo: String,
    /// Local directory searched for `<repo-name>/model.onnx` etc. before
    /// the hub — `None` means hub-only resolution.
    pub model_dir: Option<std::path::PathBuf>,
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            pos_repo: "QCRI/bert-base-multilingual-cased-pos-english".into(),
            ner_repo: "dslim/bert-base-NER".into(),
            model_dir: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// egui window appearance settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Initial window size `(width, height)` in logical pixels.
    pub window_size: (f32, f32),
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_size: (1180.0, 820.0),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use unstructure::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote speech-recognition settings.
    pub speech: SpeechConfig,
    /// Token-classification model settings.
    pub nlp: NlpConfig,
    /// Window settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
