use crate::domain::entities::embed_result::{EmbedOutcome, EmbedResult};
use crate::domain::entities::embedding_record::Metadata;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::ports::embedding_store::EmbeddingStore;
use crate::domain::values::fingerprint::{content_hash, CONTENT_HASH_KEY};
use std::sync::Arc;
use tracing::debug;

/// Change-aware single-document embedding: the generator runs only when
/// the content fingerprint differs from the one stored with the record.
///
/// No per-document locking is taken. Two concurrent calls that both see a
/// stale fingerprint will both recompute and the later write wins, which
/// converges because equal content always produces an equal fingerprint.
pub struct EmbedDocumentUseCase {
    store: Arc<dyn EmbeddingStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl EmbedDocumentUseCase {
    pub fn new(store: Arc<dyn EmbeddingStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    pub async fn embed_if_changed(
        &self,
        document_id: &str,
        content: &str,
        metadata: Option<Metadata>,
    ) -> Result<EmbedResult, DomainError> {
        self.execute(document_id, content, metadata, true).await
    }

    pub async fn execute(
        &self,
        document_id: &str,
        content: &str,
        metadata: Option<Metadata>,
        skip_if_unchanged: bool,
    ) -> Result<EmbedResult, DomainError> {
        let hash = content_hash(content);

        if skip_if_unchanged {
            if let Some(existing) = self.store.get(document_id)? {
                if existing.content_hash() == Some(hash.as_str()) {
                    debug!(document_id, "Content unchanged, skipping embed");
                    let dimension = existing.dimension();
                    return Ok(EmbedResult {
                        document_id: document_id.to_string(),
                        vector: existing.vector,
                        content_hash: hash,
                        dimension,
                        metadata: existing.metadata,
                        outcome: EmbedOutcome::Skipped,
                    });
                }
            }
        }

        let vector = self.embedder.embed(content, InputType::Document).await?;

        let mut full_metadata = metadata.unwrap_or_default();
        // Inserted after the caller's entries so the fingerprint always wins.
        full_metadata.insert(
            CONTENT_HASH_KEY.to_string(),
            serde_json::Value::String(hash.clone()),
        );

        self.store.put(document_id, &vector, full_metadata.clone())?;
        debug!(document_id, dimension = vector.len(), "Document embedded");

        let dimension = vector.len();
        Ok(EmbedResult {
            document_id: document_id.to_string(),
            vector,
            content_hash: hash,
            dimension,
            metadata: full_metadata,
            outcome: EmbedOutcome::Computed,
        })
    }
}
