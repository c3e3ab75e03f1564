//! Class-id → label mapping parsed from a model's `config.json`.
//!
//! Transformer config files carry the table as string-keyed JSON:
//!
//! ```json
//! { "id2label": { "0": "O", "1": "B-PER", "2": "I-PER" } }
//! ```
//!
//! The map must be contiguous from 0 — a gap means the config does not
//! match the exported model head, which would silently mislabel every
//! prediction after the gap.

use thiserror::Error;

// ---------------------------------------------------------------------------
// LabelMapError
// ---------------------------------------------------------------------------

/// Errors raised while parsing `id2label` from a model config.
#[derive(Debug, Error)]
pub enum LabelMapError {
    #[error("config.json is not valid JSON: {0}")]
    Json(String),

    #[error("config.json has no id2label table")]
    MissingTable,

    #[error("id2label key {0:?} is not a class index")]
    BadKey(String),

    #[error("id2label value for {0} is not a string")]
    BadValue(usize),

    #[error("id2label is missing class index {0}")]
    MissingId(usize),

    #[error("id2label table is empty")]
    Empty,
}

// ---------------------------------------------------------------------------
// LabelMap
// ---------------------------------------------------------------------------

/// Dense class-id → label lookup for one model head.
#[derive(Debug, Clone)]
pub struct LabelMap {
    labels: Vec<String>,
}

impl LabelMap {
    /// Parse the `id2label` table out of raw `config.json` bytes.
    pub fn from_config_json(bytes: &[u8]) -> Result<Self, LabelMapError> {
        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| LabelMapError::Json(e.to_string()))?;

        let table = json["id2label"]
            .as_object()
            .ok_or(LabelMapError::MissingTable)?;

        if table.is_empty() {
            return Err(LabelMapError::Empty);
        }

        let mut entries: Vec<(usize, String)> = Vec::with_capacity(table.len());
        for (key, value) in table {
            let id: usize = key
                .parse()
                .map_err(|_| LabelMapError::BadKey(key.clone()))?;
            let label = value
                .as_str()
                .ok_or(LabelMapError::BadValue(id))?
                .to_string();
            entries.push((id, label));
        }

        entries.sort_by_key(|(id, _)| *id);

        let mut labels = Vec::with_capacity(entries.len());
        for (expected, (id, label)) in entries.into_iter().enumerate() {
            if id != expected {
                return Err(LabelMapError::MissingId(expected));
            }
            labels.push(label);
        }

        Ok(Self { labels })
    }

    /// Label for a predicted class index, or `None` when the model emits an
    /// index outside the table.
    pub fn get(&self, id: usize) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    /// Number of classes in the model head.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn config(id2label: serde_json::Value) -> Vec<u8> {
        serde_json::json!({ "model_type": "bert", "id2label": id2label })
            .to_string()
            .into_bytes()
    }

    #[test]
    fn parses_contiguous_table() {
        let bytes = config(serde_json::json!({ "0": "O", "1": "B-PER", "2": "I-PER" }));
        let map = LabelMap::from_config_json(&bytes).expect("parse");

        assert_eq!(map.len(), 3);
        assert_eq!(map.get(0), Some("O"));
        assert_eq!(map.get(2), Some("I-PER"));
        assert_eq!(map.get(3), None);
    }

    /// Key order in the JSON must not matter.
    #[test]
    fn parses_unordered_keys() {
        let bytes = config(serde_json::json!({ "2": "JJ", "0": "NN", "1": "VB" }));
        let map = LabelMap::from_config_json(&bytes).expect("parse");

        assert_eq!(map.get(0), Some("NN"));
        assert_eq!(map.get(1), Some("VB"));
        assert_eq!(map.get(2), Some("JJ"));
    }

    #[test]
    fn gap_in_ids_is_rejected() {
        let bytes = config(serde_json::json!({ "0": "O", "2": "B-PER" }));
        let err = LabelMap::from_config_json(&bytes).unwrap_err();
        assert!(matches!(err, LabelMapError::MissingId(1)));
    }

    #[test]
    fn missing_table_is_rejected() {
        let bytes = serde_json::json!({ "model_type": "bert" }).to_string().into_bytes();
        let err = LabelMap::from_config_json(&bytes).unwrap_err();
        assert!(matches!(err, LabelMapError::MissingTable));
    }

    #[test]
    fn non_numeric_key_is_rejected() {
        let bytes = config(serde_json::json!({ "zero": "O" }));
        let err = LabelMap::from_config_json(&bytes).unwrap_err();
        assert!(matches!(err, LabelMapError::BadKey(_)));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = LabelMap::from_config_json(b"not json").unwrap_err();
        assert!(matches!(err, LabelMapError::Json(_)));
    }
}
