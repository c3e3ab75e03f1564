//! WAV upload parsing and validation via `hound`.
//!
//! [`WavClip`] owns the raw file bytes and the decoded header fields.  The
//! bytes are forwarded to the recognition service untouched — the service
//! accepts arbitrary sample rates and channel counts, so no resampling
//! happens locally.  Parsing up front turns a corrupt upload into a typed
//! error before any network round-trip.

use std::io::Cursor;
use std::path::Path;

use thiserror::Error;

// ---------------------------------------------------------------------------
// WavError
// ---------------------------------------------------------------------------

/// Errors raised while reading an uploaded WAV file.
#[derive(Debug, Error)]
pub enum WavError {
    /// The file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a parseable WAV stream.
    #[error("not a valid WAV file: {0}")]
    Malformed(String),

    /// The file parsed but contains zero samples.
    #[error("WAV file contains no audio data")]
    Empty,
}

// ---------------------------------------------------------------------------
// WavClip
// ---------------------------------------------------------------------------

/// A validated WAV upload: the original bytes plus decoded header fields.
#[derive(Debug, Clone)]
pub struct WavClip {
    bytes: Vec<u8>,
    sample_rate: u32,
    channels: u16,
    duration_secs: f32,
}

impl WavClip {
    /// Read and validate a WAV file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WavError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| WavError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(bytes)
    }

    /// Validate in-memory WAV bytes.
    ///
    /// Only the header is decoded; the sample data is left untouched so the
    /// exact uploaded bytes reach the recognition service.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, WavError> {
        let reader = hound::WavReader::new(Cursor::new(&bytes))
            .map_err(|e| WavError::Malformed(e.to_string()))?;

        let spec = reader.spec();
        let frames = reader.duration();
        if frames == 0 {
            return Err(WavError::Empty);
        }

        let duration_secs = frames as f32 / spec.sample_rate as f32;

        Ok(Self {
            bytes,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            duration_secs,
        })
    }

    /// The raw file bytes, exactly as uploaded.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the clip and return the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Clip length in seconds, derived from the header.
    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
