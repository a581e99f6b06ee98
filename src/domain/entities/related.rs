use serde::{Deserialize, Serialize};

use super::embedding_record::{Metadata, SearchResult};
use crate::domain::values::focal_weight::FocalWeight;

/// A highlighted span plus where it was highlighted.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub text: String,
    pub context: Option<String>,
    pub source_document_id: Option<String>,
}

impl Selection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            context: None,
            source_document_id: None,
        }
    }
}

/// Tuning knobs for related-content queries.
#[derive(Debug, Clone)]
pub struct RelatedContentOptions {
    pub top_k: usize,
    pub threshold: f64,
    pub focal_weight: FocalWeight,
    pub document_type: Option<String>,
    pub exclude_ids: Vec<String>,
}

impl Default for RelatedContentOptions {
    fn default() -> Self {
        Self {
            top_k: 10,
            threshold: 0.5,
            focal_weight: FocalWeight::default(),
            document_type: None,
            exclude_ids: Vec::new(),
        }
    }
}

/// Document types searched when a grouped query does not name its own.
pub fn default_document_types() -> Vec<String> {
    ["note", "email", "documentation", "task"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// A document surfaced for a highlighted selection, shaped for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedDocument {
    pub document_id: String,
    pub score: f64,
    pub title: Option<String>,
    pub document_type: Option<String>,
    pub snippet: Option<String>,
    pub metadata: Metadata,
}

impl RelatedDocument {
    /// Lift a raw search hit, pulling display fields out of its metadata.
    /// Empty strings count as absent.
    pub fn from_search(result: SearchResult) -> Self {
        let title = nonempty_string(&result.metadata, "title");
        let document_type = nonempty_string(&result.metadata, "document_type");
        let snippet = nonempty_string(&result.metadata, "snippet");
        Self {
            document_id: result.document_id,
            score: result.score,
            title,
            document_type,
            snippet,
            metadata: result.metadata,
        }
    }
}

fn nonempty_string(metadata: &Metadata, key: &str) -> Option<String> {
    metadata
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Everything found for one highlight query.
#[derive(Debug, Clone, Serialize)]
pub struct RelatedContentResult {
    pub highlighted_text: String,
    pub context: Option<String>,
    pub related_documents: Vec<RelatedDocument>,
    pub query_dimension: usize,
    pub total_searched: usize,
}

/// Result of a similarity lookup keyed by a stored document or by free text.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarityResult {
    pub query_document_id: Option<String>,
    pub query_text: Option<String>,
    pub similar_documents: Vec<SearchResult>,
    pub total_candidates: usize,
}
