use crate::domain::values::fingerprint::CONTENT_HASH_KEY;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Open string-keyed metadata carried alongside a stored vector.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub document_id: String,
    pub vector: Vec<f32>,
    pub metadata: Metadata,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmbeddingRecord {
    pub fn new(document_id: impl Into<String>, vector: Vec<f32>, metadata: Metadata) -> Self {
        let now = Utc::now();
        Self {
            document_id: document_id.into(),
            vector,
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn dimension(&self) -> usize {
        self.vector.len()
    }

    /// Stored content fingerprint, if one has been written.
    pub fn content_hash(&self) -> Option<&str> {
        self.metadata.get(CONTENT_HASH_KEY).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub document_id: String,
    pub score: f64,
    pub metadata: Metadata,
    /// Stored vector echo, populated only when the query asked for it.
    pub vector: Option<Vec<f32>>,
}
