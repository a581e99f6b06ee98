use crate::domain::entities::embedding_record::{Metadata, SearchResult};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use std::sync::Arc;
use tracing::debug;

pub struct SearchUseCase {
    store: Arc<dyn EmbeddingStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SearchUseCase {
    pub fn new(store: Arc<dyn EmbeddingStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    /// Embed the query text and run a similarity search over the store.
    pub async fn search_text(
        &self,
        query: &str,
        top_k: usize,
        threshold: f64,
        filter: Option<Metadata>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let vector = self.embedder.embed(query, InputType::Query).await?;
        let results = self.store.search(&SearchQuery {
            vector,
            top_k,
            threshold,
            filter,
            include_vectors: false,
        })?;
        debug!(
            query_length = query.len(),
            results = results.len(),
            "Semantic search complete"
        );
        Ok(results)
    }
}
