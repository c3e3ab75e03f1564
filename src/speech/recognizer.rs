//! Core `SpeechRecognizer` trait and `RemoteRecognizer` implementation.
//!
//! `RemoteRecognizer` calls any OpenAI-compatible `/v1/audio/transcriptions`
//! endpoint — OpenAI, Groq, a local faster-whisper server, LocalAI, etc.
//! All connection details come from [`SpeechConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use thiserror::Error;

use crate::audio::WavClip;
use crate::config::SpeechConfig;

// ---------------------------------------------------------------------------
// TranscribeError
// ---------------------------------------------------------------------------

/// Failures surfaced by the transcription pipeline.
///
/// Every variant is terminal for the current run — nothing is retried.
#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    /// The service completed the request but could not parse any speech
    /// from the audio.
    #[error("Could not understand the audio.")]
    Unintelligible,

    /// HTTP transport failure or a service-level error, carrying the
    /// service's own message where one was returned.
    #[error("Speech recognition error: {0}")]
    Service(String),

    /// The request did not complete within the configured timeout.
    #[error("Speech recognition request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as the expected JSON.
    #[error("failed to parse recognition response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranscribeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscribeError::Timeout
        } else {
            TranscribeError::Service(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Async trait for speech-to-text backends.
///
/// Implementors must be `Send + Sync` so they can be shared across threads
/// (e.g. wrapped in `Arc<dyn SpeechRecognizer>`).
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe a validated WAV clip and return the transcript text.
    async fn transcribe(&self, clip: &WavClip) -> Result<String, TranscribeError>;
}

// ---------------------------------------------------------------------------
// RemoteRecognizer
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/audio/transcriptions` endpoint.
///
/// The WAV bytes are sent as a multipart form part named `file`, alongside
/// the configured `model` and (unless `"auto"`) `language` fields.  The
/// service answers `{"text": "..."}`; an empty transcript on a successful
/// response means the audio carried no recognizable speech and is mapped to
/// [`TranscribeError::Unintelligible`].
///
/// # No hardcoded URLs
/// All connection details (`base_url`, `api_key`, `model`) come exclusively
/// from the [`SpeechConfig`] passed to [`RemoteRecognizer::from_config`].
pub struct RemoteRecognizer {
    client: reqwest::Client,
    config: SpeechConfig,
}

impl RemoteRecognizer {
    /// Build a `RemoteRecognizer` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used as a
    /// last-resort fallback if the builder fails (should never happen in
    /// practice).
    pub fn from_config(config: &SpeechConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for RemoteRecognizer {
    /// Submit `clip` to the configured endpoint.
    ///
    /// The `Authorization: Bearer …` header is attached **only** when
    /// `config.api_key` is `Some(key)` and `key` is non-empty — safe for
    /// local servers that require no authentication.
    async fn transcribe(&self, clip: &WavClip) -> Result<String, TranscribeError> {
        let url = format!("{}/v1/audio/transcriptions", self.config.base_url);

        let file_part = reqwest::multipart::Part::bytes(clip.bytes().to_vec())
            .file_name("upload.wav")
            .mime_str("audio/wav")?;

        let mut form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json");

        if self.config.language != "auto" {
            form = form.text("language", self.config.language.clone());
        }

        let mut req = self.client.post(&url).multipart(form);

        // Attach Authorization header only when api_key is a non-empty string.
        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TranscribeError::Service(service_error_message(
                status.as_u16(),
                &body,
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| TranscribeError::Parse(e.to_string()))?;

        transcript_from_body(&json)
    }
}

// ---------------------------------------------------------------------------
// Wire-format helpers (pure, unit-tested)
// ---------------------------------------------------------------------------

/// Extract the transcript from a successful response body.
///
/// An empty or whitespace-only transcript on a 2xx response means the
/// service found no recognizable speech.
fn transcript_from_body(json: &serde_json::Value) -> Result<String, TranscribeError> {
    let text = json["text"]
        .as_str()
        .ok_or_else(|| TranscribeError::Parse("missing \"text\" field".into()))?
        .trim();

    if text.is_empty() {
        return Err(TranscribeError::Unintelligible);
    }

    Ok(text.to_string())
}

/// Build a human-readable message from an error response.
///
/// Prefers the service's own `error.message` when the body is the standard
/// `{"error": {"message": …}}` shape, falling back to the HTTP status code.
fn service_error_message(status: u16, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(msg) = json["error"]["message"].as_str() {
            return msg.to_string();
        }
    }
    format!("service returned HTTP {status}")
}

// ---------------------------------------------------------------------------
// MockRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response without touching
/// the network.
#[cfg(test)]
pub struct MockRecognizer {
    response: Result<String, TranscribeError>,
}

#[cfg(test)]
impl MockRecognizer {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: TranscribeError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn transcribe(&self, _clip: &WavClip) -> Result<String, TranscribeError> {
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeechConfig;

    fn make_config(api_key: Option<&str>) -> SpeechConfig {
        SpeechConfig {
            base_url: "http://localhost:8000".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "whisper-1".into(),
            language: "en".into(),
            timeout_secs: 60,
        }
    }

    #[test]
    fn from_config_builds_without_panic() {
        let config = make_config(None);
        let _recognizer = RemoteRecognizer::from_config(&config);
    }

    #[test]
    fn from_config_accepts_api_key() {
        let config = make_config(Some("sk-test-1234"));
        let _recognizer = RemoteRecognizer::from_config(&config);
    }

    /// Verify that `RemoteRecognizer` is object-safe.
    #[test]
    fn recognizer_is_object_safe() {
        let config = make_config(None);
        let recognizer: Box<dyn SpeechRecognizer> =
            Box::new(RemoteRecognizer::from_config(&config));
        drop(recognizer);
    }

    // --- transcript_from_body ---

    #[test]
    fn body_with_text_returns_transcript() {
        let json = serde_json::json!({ "text": "  hello world " });
        assert_eq!(transcript_from_body(&json).unwrap(), "hello world");
    }

    #[test]
    fn body_with_empty_text_is_unintelligible() {
        let json = serde_json::json!({ "text": "   " });
        assert!(matches!(
            transcript_from_body(&json).unwrap_err(),
            TranscribeError::Unintelligible
        ));
    }

    #[test]
    fn body_without_text_is_parse_error() {
        let json = serde_json::json!({ "transcript": "wrong key" });
        assert!(matches!(
            transcript_from_body(&json).unwrap_err(),
            TranscribeError::Parse(_)
        ));
    }

    // --- service_error_message ---

    #[test]
    fn error_body_message_is_preferred() {
        let body = r#"{"error": {"message": "invalid audio encoding"}}"#;
        assert_eq!(service_error_message(400, body), "invalid audio encoding");
    }

    #[test]
    fn non_json_error_body_falls_back_to_status() {
        let msg = service_error_message(502, "<html>bad gateway</html>");
        assert!(msg.contains("502"));
    }

    // --- error display ---

    #[test]
    fn unintelligible_display_matches_ui_copy() {
        assert_eq!(
            TranscribeError::Unintelligible.to_string(),
            "Could not understand the audio."
        );
    }

    #[test]
    fn service_display_carries_message() {
        let e = TranscribeError::Service("connection refused".into());
        assert!(e.to_string().contains("connection refused"));
    }
}
