use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::values::chunking::chunk_words;
use crate::domain::values::focal_weight::FocalWeight;
use crate::domain::values::vector_ops;
use std::sync::Arc;
use tracing::debug;

/// Builds query vectors for highlight-driven discovery: the highlighted
/// span and its surrounding context embedded together, combined by focal
/// weight into one unit vector.
#[derive(Clone)]
pub struct ContextualQueryBuilder {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ContextualQueryBuilder {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// `focal_weight * embed(focal) + (1 - focal_weight) * embed(context)`,
    /// re-normalized. Without context this is a plain focal embedding.
    /// Fails when the combination has zero norm, which happens when the two
    /// embeddings oppose each other exactly at the given weight.
    pub async fn embed_with_context(
        &self,
        focal_text: &str,
        context: Option<&str>,
        focal_weight: FocalWeight,
    ) -> Result<Vec<f32>, DomainError> {
        let context = match context {
            Some(c) if !c.is_empty() => c,
            _ => return self.embedder.embed(focal_text, InputType::Query).await,
        };

        let texts = [focal_text.to_string(), context.to_string()];
        let mut vectors = self.embedder.embed_batch(&texts, InputType::Query).await?;
        if vectors.len() != 2 {
            return Err(DomainError::Embedding(format!(
                "Generator returned {} vectors for 2 texts",
                vectors.len()
            )));
        }
        let context_vector = vectors.pop().unwrap_or_default();
        let focal_vector = vectors.pop().unwrap_or_default();

        let combined =
            vector_ops::combine_weighted(&focal_vector, &context_vector, focal_weight.value());
        vector_ops::normalize(&combined).ok_or_else(|| {
            DomainError::InvalidInput(
                "Combined query vector has zero norm; focal and context cancel out".into(),
            )
        })
    }

    /// Plain query embedding with no context weighting.
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.embedder.embed(text, InputType::Query).await
    }

    /// Embed a long text as overlapping word windows, one generator call
    /// for all chunks. Output order matches chunk order.
    pub async fn embed_chunked(
        &self,
        text: &str,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        let chunks = chunk_words(text, chunk_size, overlap)?;
        debug!(chunks = chunks.len(), "Embedding chunked text");
        self.embedder.embed_batch(&chunks, InputType::Document).await
    }

    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }
}
