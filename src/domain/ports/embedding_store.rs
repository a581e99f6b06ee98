use crate::domain::entities::embedding_record::{EmbeddingRecord, Metadata, SearchResult};
use crate::domain::error::DomainError;

/// One similarity query. `filter` is an AND of metadata equalities applied
/// before scoring; `threshold` is an inclusive lower bound on cosine score.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub threshold: f64,
    pub filter: Option<Metadata>,
    pub include_vectors: bool,
}

impl SearchQuery {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            top_k: 10,
            threshold: 0.0,
            filter: None,
            include_vectors: false,
        }
    }

    /// Whether a record's metadata satisfies the filter. An absent filter
    /// matches everything.
    pub fn matches(&self, metadata: &Metadata) -> bool {
        match &self.filter {
            Some(filter) => filter.iter().all(|(k, v)| metadata.get(k) == Some(v)),
            None => true,
        }
    }
}

/// Vector persistence and similarity search. Implementations hold a fixed
/// dimension and reject writes that do not match it. Writes are upserts;
/// a successful write is visible to every subsequent read.
pub trait EmbeddingStore: Send + Sync {
    fn put(&self, document_id: &str, vector: &[f32], metadata: Metadata) -> Result<(), DomainError>;

    /// Upsert several records at once. `metadata` must be either absent or
    /// exactly as long as `document_ids`.
    fn put_batch(
        &self,
        document_ids: &[String],
        vectors: &[Vec<f32>],
        metadata: Option<Vec<Metadata>>,
    ) -> Result<(), DomainError>;

    fn get(&self, document_id: &str) -> Result<Option<EmbeddingRecord>, DomainError>;

    /// Returns true when a record existed and was removed.
    fn delete(&self, document_id: &str) -> Result<bool, DomainError>;

    /// Results sorted by score descending, document id ascending on ties,
    /// truncated to `top_k`.
    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, DomainError>;

    fn count(&self) -> Result<usize, DomainError>;

    fn clear(&self) -> Result<(), DomainError>;

    /// Fixed vector dimension this store was opened with.
    fn dimension(&self) -> usize;
}
