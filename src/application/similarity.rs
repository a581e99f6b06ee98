use crate::domain::entities::embedding_record::{Metadata, SearchResult};
use crate::domain::entities::related::SimilarityResult;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use crate::domain::values::vector_ops;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

const QUERY_TEXT_PREVIEW: usize = 100;

/// Document-to-document similarity: "more like this", pairwise scores,
/// and recommendations seeded from recently viewed documents.
pub struct SimilarityUseCase {
    store: Arc<dyn EmbeddingStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SimilarityUseCase {
    pub fn new(store: Arc<dyn EmbeddingStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Documents similar to a stored one, using its stored vector as the
    /// query. Fails with `NotFound` when the document has no embedding.
    pub fn find_similar_documents(
        &self,
        document_id: &str,
        top_k: usize,
        threshold: f64,
        exclude_self: bool,
        filter: Option<Metadata>,
    ) -> Result<SimilarityResult, DomainError> {
        let source = self
            .store
            .get(document_id)?
            .ok_or_else(|| DomainError::NotFound(format!("Document not found: {document_id}")))?;

        // The source document matches itself with score 1.0, so fetch one
        // extra candidate when it is to be dropped.
        let over_fetch = exclude_self as usize;
        let hits = self.store.search(&SearchQuery {
            vector: source.vector,
            top_k: top_k + over_fetch,
            threshold,
            filter,
            include_vectors: false,
        })?;

        let mut similar_documents = Vec::new();
        for hit in hits {
            if exclude_self && hit.document_id == document_id {
                continue;
            }
            similar_documents.push(hit);
            if similar_documents.len() >= top_k {
                break;
            }
        }

        debug!(
            document_id,
            results = similar_documents.len(),
            "Found similar documents"
        );

        Ok(SimilarityResult {
            query_document_id: Some(document_id.to_string()),
            query_text: None,
            similar_documents,
            total_candidates: self.store.count()?,
        })
    }

    /// Documents similar to free text that need not be stored anywhere.
    pub async fn find_similar_by_text(
        &self,
        text: &str,
        top_k: usize,
        threshold: f64,
        filter: Option<Metadata>,
    ) -> Result<SimilarityResult, DomainError> {
        let vector = self.embedder.embed(text, InputType::Query).await?;
        let similar_documents = self.store.search(&SearchQuery {
            vector,
            top_k,
            threshold,
            filter,
            include_vectors: false,
        })?;

        Ok(SimilarityResult {
            query_document_id: None,
            query_text: Some(truncate_query(text)),
            similar_documents,
            total_candidates: self.store.count()?,
        })
    }

    /// Cosine similarity between two stored documents. Unclamped, so
    /// opposite vectors score -1.0.
    pub fn pairwise_similarity(&self, id1: &str, id2: &str) -> Result<f64, DomainError> {
        let first = self
            .store
            .get(id1)?
            .ok_or_else(|| DomainError::NotFound(format!("Document not found: {id1}")))?;
        let second = self
            .store
            .get(id2)?
            .ok_or_else(|| DomainError::NotFound(format!("Document not found: {id2}")))?;
        Ok(vector_ops::cosine_similarity(&first.vector, &second.vector))
    }

    /// Cosine similarity between two texts, embedded in a single batch call.
    pub async fn text_similarity(&self, text1: &str, text2: &str) -> Result<f64, DomainError> {
        let texts = vec![text1.to_string(), text2.to_string()];
        let vectors = self.embedder.embed_batch(&texts, InputType::Document).await?;
        if vectors.len() != 2 {
            return Err(DomainError::Embedding(format!(
                "Generator returned {} vectors for 2 texts",
                vectors.len()
            )));
        }
        Ok(vector_ops::cosine_similarity(&vectors[0], &vectors[1]))
    }

    /// Recommendations seeded from recently viewed documents. Per-seed
    /// neighbor lists are merged keeping the best score per document; the
    /// recent documents themselves are never recommended back.
    pub fn recommendations_for_user(
        &self,
        recent_ids: &[String],
        top_k: usize,
        exclude_ids: &[String],
    ) -> Result<Vec<SearchResult>, DomainError> {
        let exclude: HashSet<&str> = exclude_ids
            .iter()
            .map(String::as_str)
            .chain(recent_ids.iter().map(String::as_str))
            .collect();

        let mut best: HashMap<String, SearchResult> = HashMap::new();
        for seed_id in recent_ids.iter().take(5) {
            let result =
                match self.find_similar_documents(seed_id, top_k, 0.4, true, None) {
                    Ok(result) => result,
                    // A seed with no embedding contributes nothing.
                    Err(DomainError::NotFound(_)) => continue,
                    Err(e) => return Err(e),
                };
            for hit in result.similar_documents {
                if exclude.contains(hit.document_id.as_str()) {
                    continue;
                }
                match best.get_mut(&hit.document_id) {
                    Some(existing) if existing.score >= hit.score => {}
                    Some(existing) => *existing = hit,
                    None => {
                        best.insert(hit.document_id.clone(), hit);
                    }
                }
            }
        }

        let mut recommendations: Vec<SearchResult> = best.into_values().collect();
        recommendations.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        recommendations.truncate(top_k);

        debug!(
            seeds = recent_ids.len().min(5),
            results = recommendations.len(),
            "Built recommendations"
        );
        Ok(recommendations)
    }
}

/// Long query texts are echoed back truncated, for display only.
fn truncate_query(text: &str) -> String {
    if text.chars().count() > QUERY_TEXT_PREVIEW {
        let preview: String = text.chars().take(QUERY_TEXT_PREVIEW).collect();
        format!("{preview}...")
    } else {
        text.to_string()
    }
}
