//! Model artifact resolution — local directory first, then the HF hub.
//!
//! Every token-classification model consists of three files:
//!
//! | File             | Contents                              |
//! |------------------|---------------------------------------|
//! | `model.onnx`     | exported transformer weights          |
//! | `tokenizer.json` | `tokenizers`-format tokenizer         |
//! | `config.json`    | model config including `id2label`     |
//!
//! Resolution order:
//! 1. `<model_dir>/<repo-name>/` when the config sets a local override and
//!    all three files are present there.
//! 2. The Hugging Face hub cache via `hf-hub`, downloading on first use.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::Api;
use thiserror::Error;

/// ONNX weights filename inside a model repo.
pub const MODEL_FILE: &str = "model.onnx";
/// Tokenizer definition filename.
pub const TOKENIZER_FILE: &str = "tokenizer.json";
/// Model config filename (carries the `id2label` table).
pub const CONFIG_FILE: &str = "config.json";

// ---------------------------------------------------------------------------
// ModelResolveError
// ---------------------------------------------------------------------------

/// Errors raised while locating or downloading model artifacts.
#[derive(Debug, Error)]
pub enum ModelResolveError {
    /// The `hf-hub` API client could not be constructed.
    #[error("HF hub API init failed: {0}")]
    HubInit(String),

    /// A required file could not be fetched from the hub.
    #[error("failed to fetch {file} from {repo}: {message}")]
    Download {
        repo: String,
        file: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// ModelArtifacts
// ---------------------------------------------------------------------------

/// Resolved on-disk paths for one model.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: PathBuf,
    pub tokenizer: PathBuf,
    pub config: PathBuf,
}

/// Resolve the three artifacts for `repo`, checking `local_dir` before the
/// hub.
///
/// The local layout mirrors the hub: `<local_dir>/<repo-name>/model.onnx`
/// etc., where `<repo-name>` is the part after the last `/` of the repo id.
/// The local path is only used when **all** three files are present, so a
/// half-copied directory never shadows the hub.
pub fn resolve(
    repo: &str,
    local_dir: Option<&Path>,
) -> Result<ModelArtifacts, ModelResolveError> {
    if let Some(dir) = local_dir {
        let candidate = dir.join(repo_name(repo));
        if let Some(artifacts) = local_artifacts(&candidate) {
            log::info!("nlp: using local model files at {}", candidate.display());
            return Ok(artifacts);
        }
    }

    let api = Api::new().map_err(|e| ModelResolveError::HubInit(e.to_string()))?;
    let hub_repo = api.model(repo.to_string());

    let fetch = |file: &'static str| {
        hub_repo.get(file).map_err(|e| ModelResolveError::Download {
            repo: repo.to_string(),
            file,
            message: e.to_string(),
        })
    };

    Ok(ModelArtifacts {
        model: fetch(MODEL_FILE)?,
        tokenizer: fetch(TOKENIZER_FILE)?,
        config: fetch(CONFIG_FILE)?,
    })
}

/// The final path segment of a repo id (`"org/name"` → `"name"`).
fn repo_name(repo: &str) -> &str {
    repo.rsplit('/').next().unwrap_or(repo)
}

/// Return artifacts rooted at `dir` when all three files exist there.
fn local_artifacts(dir: &Path) -> Option<ModelArtifacts> {
    let artifacts = ModelArtifacts {
        model: dir.join(MODEL_FILE),
        tokenizer: dir.join(TOKENIZER_FILE),
        config: dir.join(CONFIG_FILE),
    };

    if artifacts.model.exists() && artifacts.tokenizer.exists() && artifacts.config.exists() {
        Some(artifacts)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
