pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::context_query::ContextualQueryBuilder;
use crate::application::embed_batch::EmbedBatchUseCase;
use crate::application::embed_document::EmbedDocumentUseCase;
use crate::application::related_content::RelatedContentUseCase;
use crate::application::search::SearchUseCase;
use crate::application::similarity::SimilarityUseCase;
use crate::domain::entities::embed_result::{BatchEmbedResult, DocumentInput, EmbedResult};
use crate::domain::entities::embedding_record::{EmbeddingRecord, Metadata, SearchResult};
use crate::domain::entities::related::{
    RelatedContentOptions, RelatedContentResult, RelatedDocument, Selection, SimilarityResult,
};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::EmbeddingProvider;
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use crate::domain::values::focal_weight::FocalWeight;
use crate::infrastructure::embeddings::hash::HashProvider;
use crate::infrastructure::embeddings::openai::OpenAiProvider;
use crate::infrastructure::embeddings::voyage::VoyageProvider;
use crate::infrastructure::memory::index::InMemoryIndex;
use crate::infrastructure::sqlite::migrations::run_migrations;
use crate::infrastructure::sqlite::store::SqliteEmbeddingStore;
use rusqlite::Connection;
use std::sync::Arc;

pub const DEFAULT_DIMENSION: usize = 384;

pub struct SemVault {
    store: Arc<dyn EmbeddingStore>,
    embed_document_uc: EmbedDocumentUseCase,
    embed_batch_uc: EmbedBatchUseCase,
    search_uc: SearchUseCase,
    related_uc: RelatedContentUseCase,
    similarity_uc: SimilarityUseCase,
    query_builder: ContextualQueryBuilder,
}

impl SemVault {
    /// SQLite-backed vault at `db_path`, embedding provider chosen from
    /// the environment.
    pub fn open(db_path: &str, dimension: usize) -> Result<Self, DomainError> {
        let conn = Connection::open(db_path)
            .map_err(|e| DomainError::store_with("Failed to open database", e))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| DomainError::store_with("Failed to enable WAL", e))?;
        run_migrations(&conn)?;

        let store: Arc<dyn EmbeddingStore> = Arc::new(SqliteEmbeddingStore::new(conn, dimension));
        Ok(Self::with_components(store, provider_from_env(dimension)))
    }

    /// Process-local vault with no persistence.
    pub fn in_memory(dimension: usize) -> Self {
        let store: Arc<dyn EmbeddingStore> = Arc::new(InMemoryIndex::new(dimension));
        Self::with_components(store, provider_from_env(dimension))
    }

    pub fn with_components(
        store: Arc<dyn EmbeddingStore>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        if embedder.dimension() != store.dimension() {
            tracing::warn!(
                provider_dimension = embedder.dimension(),
                store_dimension = store.dimension(),
                "Embedding provider and store disagree on dimension; writes will be rejected"
            );
        }

        let query_builder = ContextualQueryBuilder::new(embedder.clone());
        Self {
            embed_document_uc: EmbedDocumentUseCase::new(store.clone(), embedder.clone()),
            embed_batch_uc: EmbedBatchUseCase::new(store.clone(), embedder.clone()),
            search_uc: SearchUseCase::new(store.clone(), embedder.clone()),
            related_uc: RelatedContentUseCase::new(store.clone(), query_builder.clone()),
            similarity_uc: SimilarityUseCase::new(store.clone(), embedder),
            query_builder,
            store,
        }
    }

    pub fn store(&self) -> &Arc<dyn EmbeddingStore> {
        &self.store
    }

    // Store passthroughs

    pub fn put(
        &self,
        document_id: &str,
        vector: &[f32],
        metadata: Metadata,
    ) -> Result<(), DomainError> {
        self.store.put(document_id, vector, metadata)
    }

    pub fn put_batch(
        &self,
        document_ids: &[String],
        vectors: &[Vec<f32>],
        metadata: Option<Vec<Metadata>>,
    ) -> Result<(), DomainError> {
        self.store.put_batch(document_ids, vectors, metadata)
    }

    pub fn get_embedding(&self, document_id: &str) -> Result<Option<EmbeddingRecord>, DomainError> {
        self.store.get(document_id)
    }

    pub fn delete_embedding(&self, document_id: &str) -> Result<bool, DomainError> {
        self.store.delete(document_id)
    }

    pub fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, DomainError> {
        self.store.search(query)
    }

    pub fn count(&self) -> Result<usize, DomainError> {
        self.store.count()
    }

    pub fn clear(&self) -> Result<(), DomainError> {
        self.store.clear()
    }

    pub fn dimension(&self) -> usize {
        self.store.dimension()
    }

    // Embedding operations

    pub async fn embed_if_changed(
        &self,
        document_id: &str,
        content: &str,
        metadata: Option<Metadata>,
    ) -> Result<EmbedResult, DomainError> {
        self.embed_document_uc
            .embed_if_changed(document_id, content, metadata)
            .await
    }

    pub async fn embed_document(
        &self,
        document_id: &str,
        content: &str,
        metadata: Option<Metadata>,
    ) -> Result<EmbedResult, DomainError> {
        self.embed_document_uc
            .execute(document_id, content, metadata, false)
            .await
    }

    pub async fn embed_batch(
        &self,
        documents: Vec<DocumentInput>,
        skip_if_unchanged: bool,
    ) -> Result<BatchEmbedResult, DomainError> {
        self.embed_batch_uc.execute(documents, skip_if_unchanged).await
    }

    // Query operations

    pub async fn search_text(
        &self,
        query: &str,
        top_k: usize,
        threshold: f64,
        filter: Option<Metadata>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.search_uc.search_text(query, top_k, threshold, filter).await
    }

    pub async fn embed_with_context(
        &self,
        focal_text: &str,
        context: Option<&str>,
        focal_weight: FocalWeight,
    ) -> Result<Vec<f32>, DomainError> {
        self.query_builder
            .embed_with_context(focal_text, context, focal_weight)
            .await
    }

    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        self.query_builder.embed_query(text).await
    }

    pub async fn embed_chunked(
        &self,
        text: &str,
        chunk_size: usize,
        overlap: usize,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        self.query_builder.embed_chunked(text, chunk_size, overlap).await
    }

    // Related content

    pub async fn find_related(
        &self,
        selection: &Selection,
        options: &RelatedContentOptions,
    ) -> Result<RelatedContentResult, DomainError> {
        self.related_uc.find_related(selection, options).await
    }

    pub async fn find_related_grouped_by_type(
        &self,
        selection: &Selection,
        top_k_per_type: usize,
        threshold: f64,
        document_types: Option<Vec<String>>,
    ) -> Result<Vec<(String, Vec<RelatedDocument>)>, DomainError> {
        self.related_uc
            .find_related_grouped_by_type(selection, top_k_per_type, threshold, document_types)
            .await
    }

    pub async fn suggest_links(
        &self,
        selection: &Selection,
        max_suggestions: usize,
        min_score: f64,
    ) -> Result<Vec<RelatedDocument>, DomainError> {
        self.related_uc
            .suggest_links(selection, max_suggestions, min_score)
            .await
    }

    pub async fn find_mentions(
        &self,
        entity_text: &str,
        entity_type: Option<&str>,
        source_document_id: Option<&str>,
        top_k: usize,
    ) -> Result<Vec<RelatedDocument>, DomainError> {
        self.related_uc
            .find_mentions(entity_text, entity_type, source_document_id, top_k)
            .await
    }

    // Similarity

    pub fn find_similar_documents(
        &self,
        document_id: &str,
        top_k: usize,
        threshold: f64,
        exclude_self: bool,
        filter: Option<Metadata>,
    ) -> Result<SimilarityResult, DomainError> {
        self.similarity_uc
            .find_similar_documents(document_id, top_k, threshold, exclude_self, filter)
    }

    pub async fn find_similar_by_text(
        &self,
        text: &str,
        top_k: usize,
        threshold: f64,
        filter: Option<Metadata>,
    ) -> Result<SimilarityResult, DomainError> {
        self.similarity_uc
            .find_similar_by_text(text, top_k, threshold, filter)
            .await
    }

    pub fn pairwise_similarity(&self, id1: &str, id2: &str) -> Result<f64, DomainError> {
        self.similarity_uc.pairwise_similarity(id1, id2)
    }

    pub async fn text_similarity(&self, text1: &str, text2: &str) -> Result<f64, DomainError> {
        self.similarity_uc.text_similarity(text1, text2).await
    }

    pub fn recommendations_for_user(
        &self,
        recent_ids: &[String],
        top_k: usize,
        exclude_ids: &[String],
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.similarity_uc
            .recommendations_for_user(recent_ids, top_k, exclude_ids)
    }
}

/// SEMVAULT_EMBEDDING_PROVIDER picks `openai` or `voyage`, with the key and
/// model taken from SEMVAULT_EMBEDDING_API_KEY and SEMVAULT_EMBEDDING_MODEL.
/// Anything else falls back to the deterministic hash provider, which needs
/// no network or key.
pub fn provider_from_env(dimension: usize) -> Arc<dyn EmbeddingProvider> {
    let provider =
        std::env::var("SEMVAULT_EMBEDDING_PROVIDER").unwrap_or_else(|_| "hash".into());
    let api_key = std::env::var("SEMVAULT_EMBEDDING_API_KEY").unwrap_or_default();
    let model = std::env::var("SEMVAULT_EMBEDDING_MODEL").ok();

    match provider.as_str() {
        "voyage" => Arc::new(VoyageProvider::new(api_key, model, None)),
        "openai" => Arc::new(OpenAiProvider::new(api_key, model)),
        _ => Arc::new(HashProvider::new(dimension)),
    }
}
