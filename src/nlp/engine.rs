//! ONNX token-classification engine.
//!
//! [`TokenClassifier`] wraps an `ort` session, a `tokenizers` tokenizer and
//! the model's [`LabelMap`].  One instance serves one model; the POS tagger
//! and the entity recognizer each own their own.
//!
//! A classify call runs:
//!
//! 1. split the text into whitespace-aligned chunks (sequence-length limit),
//! 2. encode each chunk, run the model, argmax the per-token logits,
//! 3. collapse sub-word tokens back onto words via the tokenizer's word ids,
//!    keeping the label of each word's first sub-token,
//! 4. emit `(word, label, byte range)` triples in document order.
//!
//! The session lives behind a `Mutex` so the classifier can be shared as
//! `Arc<dyn …>` across threads; `ort` requires `&mut` access per run.

use std::sync::Mutex;

use ndarray::Array2;

use thiserror::Error;

use crate::nlp::labels::{LabelMap, LabelMapError};
use crate::nlp::model::{ModelArtifacts, ModelResolveError};

/// Chunk size in bytes fed to the tokenizer per inference call.  Keeps the
/// encoded sequence comfortably inside the 512-token BERT limit for
/// ordinary English prose.
const MAX_CHUNK_BYTES: usize = 1_500;

// ---------------------------------------------------------------------------
// NlpError
// ---------------------------------------------------------------------------

/// All errors that can arise from the NLP subsystem.
#[derive(Debug, Error)]
pub enum NlpError {
    /// Model artifacts could not be located or downloaded.
    #[error(transparent)]
    Resolve(#[from] ModelResolveError),

    /// An artifact file could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The model's `id2label` table is unusable.
    #[error(transparent)]
    Labels(#[from] LabelMapError),

    /// `ort` failed to build or load the session.
    #[error("ONNX session error: {0}")]
    Session(String),

    /// The tokenizer failed to load or encode.
    #[error("tokenizer error: {0}")]
    Tokenize(String),

    /// The inference pass itself failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// The model never loaded — startup degraded to a stub engine.
    #[error("NLP model unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// ClassifiedWord
// ---------------------------------------------------------------------------

/// One word with its predicted label and byte range in the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedWord {
    /// Surface form, sliced from the input.
    pub text: String,
    /// Predicted label (tagset depends on the model).
    pub label: String,
    /// Byte offset of the word's first byte in the input.
    pub start: usize,
    /// Byte offset one past the word's last byte.
    pub end: usize,
}

// ---------------------------------------------------------------------------
// TokenClassifier
// ---------------------------------------------------------------------------

/// A loaded token-classification model.
pub struct TokenClassifier {
    session: Mutex<ort::session::Session>,
    tokenizer: tokenizers::Tokenizer,
    labels: LabelMap,
    wants_token_type_ids: bool,
}

impl std::fmt::Debug for TokenClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenClassifier")
            .field("classes", &self.labels.len())
            .finish_non_exhaustive()
    }
}

impl TokenClassifier {
    /// Load a model from resolved artifacts.
    ///
    /// # Errors
    ///
    /// - [`NlpError::Session`]  — `ort` rejected the ONNX file.
    /// - [`NlpError::Tokenize`] — `tokenizer.json` failed to load.
    /// - [`NlpError::Labels`]   — `config.json` has no usable `id2label`.
    pub fn load(artifacts: &ModelArtifacts) -> Result<Self, NlpError> {
        let session = ort::session::Session::builder()
            .map_err(|e| NlpError::Session(e.to_string()))?
            .commit_from_file(&artifacts.model)
            .map_err(|e| NlpError::Session(e.to_string()))?;

        // BERT exports take token_type_ids; DistilBERT exports do not.
        // Decide from the graph rather than the repo name.
        let wants_token_type_ids = session
            .inputs()
            .iter()
            .any(|input| input.name() == "token_type_ids");

        let tokenizer = tokenizers::Tokenizer::from_file(&artifacts.tokenizer)
            .map_err(|e| NlpError::Tokenize(e.to_string()))?;

        let config_bytes = std::fs::read(&artifacts.config).map_err(|source| NlpError::Io {
            path: artifacts.config.display().to_string(),
            source,
        })?;
        let labels = LabelMap::from_config_json(&config_bytes)?;

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            labels,
            wants_token_type_ids,
        })
    }

    /// Classify every word of `text` in document order.
    ///
    /// An empty or whitespace-only input returns an empty vec without
    /// touching the model.
    pub fn classify(&self, text: &str) -> Result<Vec<ClassifiedWord>, NlpError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut words = Vec::new();
        for (base, chunk) in chunk_text(text, MAX_CHUNK_BYTES) {
            self.classify_chunk(base, chunk, &mut words)?;
        }
        Ok(words)
    }

    /// Run one chunk through the model, appending words with offsets
    /// shifted by `base`.
    fn classify_chunk(
        &self,
        base: usize,
        chunk: &str,
        out: &mut Vec<ClassifiedWord>,
    ) -> Result<(), NlpError> {
        let encoding = self
            .tokenizer
            .encode(chunk, true)
            .map_err(|e| NlpError::Tokenize(e.to_string()))?;

        let seq_len = encoding.get_ids().len();
        if seq_len == 0 {
            return Ok(());
        }

        let ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        let ids_arr = Array2::from_shape_vec((1, seq_len), ids)
            .map_err(|e| NlpError::Inference(e.to_string()))?;
        let mask_arr = Array2::from_shape_vec((1, seq_len), mask)
            .map_err(|e| NlpError::Inference(e.to_string()))?;

        let input_ids = ort::value::Tensor::from_array(ids_arr)
            .map_err(|e| NlpError::Inference(e.to_string()))?;
        let attention_mask = ort::value::Tensor::from_array(mask_arr)
            .map_err(|e| NlpError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| NlpError::Inference("session lock poisoned".into()))?;

        let outputs = if self.wants_token_type_ids {
            let type_ids = ort::value::Tensor::from_array(Array2::<i64>::zeros((1, seq_len)))
                .map_err(|e| NlpError::Inference(e.to_string()))?;
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
                "token_type_ids" => type_ids,
            ])
        } else {
            session.run(ort::inputs![
                "input_ids" => input_ids,
                "attention_mask" => attention_mask,
            ])
        }
        .map_err(|e| NlpError::Inference(e.to_string()))?;

        let logits = outputs[0]
            .try_extract_array::<f32>()
            .map_err(|e| NlpError::Inference(e.to_string()))?;

        // logits shape is [1, seq_len, num_classes]
        let shape = logits.shape();
        if shape.len() != 3 || shape[1] != seq_len {
            return Err(NlpError::Inference(format!(
                "unexpected logits shape {shape:?} for sequence of {seq_len}"
            )));
        }
        let num_classes = shape[2];

        let flat = logits
            .as_slice()
            .ok_or_else(|| NlpError::Inference("logits tensor is not contiguous".into()))?;

        // Per-token argmax → label ids, aligned to words below.
        let word_ids = encoding.get_word_ids();
        let offsets = encoding.get_offsets();

        let mut current: Option<ClassifiedWord> = None;
        for token in 0..seq_len {
            // Special tokens ([CLS], [SEP], padding) carry no word id.
            let Some(word_id) = word_ids[token] else {
                continue;
            };

            let (start, end) = offsets[token];
            if start == end {
                continue;
            }

            let is_continuation = matches!(
                (&current, word_id),
                (Some(_), w) if continues_word(&encoding, token, w)
            );

            if is_continuation {
                if let Some(word) = current.as_mut() {
                    word.end = base + end;
                }
                continue;
            }

            // New word: flush the previous one and label from this first
            // sub-token.
            if let Some(word) = current.take() {
                push_word(chunk, base, word, out);
            }

            let class = argmax(&flat[token * num_classes..(token + 1) * num_classes]);
            let label = self
                .labels
                .get(class)
                .ok_or_else(|| {
                    NlpError::Inference(format!("model predicted unknown class {class}"))
                })?
                .to_string();

            current = Some(ClassifiedWord {
                text: String::new(),
                label,
                start: base + start,
                end: base + end,
            });
        }

        if let Some(word) = current.take() {
            push_word(chunk, base, word, out);
        }

        Ok(())
    }
}

/// Whether `token` belongs to the same word as the previous real token.
fn continues_word(encoding: &tokenizers::Encoding, token: usize, word_id: u32) -> bool {
    let word_ids = encoding.get_word_ids();
    (0..token)
        .rev()
        .find_map(|prev| word_ids[prev])
        .is_some_and(|prev_word| prev_word == word_id)
}

/// Fill in the surface form from the chunk and append.  Offsets that do not
/// land on char boundaries (possible after tokenizer normalization) drop
/// the word rather than panic.
fn push_word(chunk: &str, base: usize, mut word: ClassifiedWord, out: &mut Vec<ClassifiedWord>) {
    let range = (word.start - base)..(word.end - base);
    if let Some(text) = chunk.get(range) {
        if !text.is_empty() {
            word.text = text.to_string();
            out.push(word);
        }
    }
}

/// Index of the largest value in `row`.
fn argmax(row: &[f32]) -> usize {
    let mut best = 0;
    let mut best_val = f32::NEG_INFINITY;
    for (i, &v) in row.iter().enumerate() {
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    best
}

/// Split `text` into `(byte offset, chunk)` pairs of at most `max_bytes`,
/// cutting at whitespace where possible.  Concatenating the chunks yields
/// the original text, so offsets stay valid document-wide.
fn chunk_text(text: &str, max_bytes: usize) -> Vec<(usize, &str)> {
    let mut chunks = Vec::new();
    let mut base = 0;

    while base < text.len() {
        let rest = &text[base..];
        if rest.len() <= max_bytes {
            chunks.push((base, rest));
            break;
        }

        // Largest char boundary at or below the limit.
        let mut cut = max_bytes;
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }

        // Prefer cutting just after the last whitespace in the window so a
        // word never straddles two inference calls.
        if let Some(ws) = rest[..cut].rfind(char::is_whitespace) {
            if ws > 0 {
                let ws_len = rest[ws..].chars().next().map_or(1, char::len_utf8);
                cut = ws + ws_len;
            }
        }

        chunks.push((base, &rest[..cut]));
        base += cut;
    }

    chunks
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
