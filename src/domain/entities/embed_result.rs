use serde::{Deserialize, Serialize};

use super::embedding_record::Metadata;

/// How a change-aware embed call resolved for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedOutcome {
    /// A fresh vector was generated and stored.
    Computed,
    /// The stored fingerprint matched; the existing record was returned untouched.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbedResult {
    pub document_id: String,
    pub vector: Vec<f32>,
    pub content_hash: String,
    pub dimension: usize,
    pub metadata: Metadata,
    pub outcome: EmbedOutcome,
}

/// One document handed to a batch embed call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub document_id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

impl DocumentInput {
    pub fn new(
        document_id: impl Into<String>,
        content: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            content: content.into(),
            metadata,
        }
    }
}

/// A failure recorded during batch embedding. `document_id` is absent when
/// the shared bulk generation call itself failed, which has no per-item
/// attribution.
#[derive(Debug, Clone, Serialize)]
pub struct BatchError {
    pub document_id: Option<String>,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchEmbedResult {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
    pub results: Vec<EmbedResult>,
    pub errors: Vec<BatchError>,
}
