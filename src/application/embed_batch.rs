use crate::domain::entities::embed_result::{
    BatchEmbedResult, BatchError, DocumentInput, EmbedOutcome, EmbedResult,
};
use crate::domain::entities::embedding_record::Metadata;
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::ports::embedding_store::EmbeddingStore;
use crate::domain::values::fingerprint::{content_hash, CONTENT_HASH_KEY};
use std::sync::Arc;
use tracing::{error, info};

/// Multi-document embedding with one bulk generator call and per-item
/// failure isolation: a document that fails to store is recorded in the
/// error list and the rest of the batch proceeds.
pub struct EmbedBatchUseCase {
    store: Arc<dyn EmbeddingStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

struct PendingDoc {
    document_id: String,
    content_hash: String,
    metadata: Option<Metadata>,
}

impl EmbedBatchUseCase {
    pub fn new(store: Arc<dyn EmbeddingStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }

    pub async fn execute(
        &self,
        documents: Vec<DocumentInput>,
        skip_if_unchanged: bool,
    ) -> Result<BatchEmbedResult, DomainError> {
        let total = documents.len();
        info!(total, "Starting batch embed");

        let mut results: Vec<EmbedResult> = Vec::new();
        let mut errors: Vec<BatchError> = Vec::new();

        // Partition against the store state observed now. A duplicate id
        // later in the batch is classified independently; its write lands
        // last, so the final record reflects the last occurrence.
        let mut pending: Vec<PendingDoc> = Vec::new();
        let mut texts: Vec<String> = Vec::new();
        for doc in documents {
            let hash = content_hash(&doc.content);
            if skip_if_unchanged {
                if let Some(existing) = self.store.get(&doc.document_id)? {
                    if existing.content_hash() == Some(hash.as_str()) {
                        let dimension = existing.dimension();
                        results.push(EmbedResult {
                            document_id: doc.document_id,
                            vector: existing.vector,
                            content_hash: hash,
                            dimension,
                            metadata: existing.metadata,
                            outcome: EmbedOutcome::Skipped,
                        });
                        continue;
                    }
                }
            }
            texts.push(doc.content);
            pending.push(PendingDoc {
                document_id: doc.document_id,
                content_hash: hash,
                metadata: doc.metadata,
            });
        }
        let skipped = results.len();
        let pending_count = pending.len();

        // Exactly one generator call covers every pending document.
        let mut failed = 0usize;
        if !pending.is_empty() {
            match self.embedder.embed_batch(&texts, InputType::Document).await {
                Ok(vectors) if vectors.len() == pending_count => {
                    for (doc, vector) in pending.into_iter().zip(vectors) {
                        let mut full_metadata = doc.metadata.unwrap_or_default();
                        full_metadata.insert(
                            CONTENT_HASH_KEY.to_string(),
                            serde_json::Value::String(doc.content_hash.clone()),
                        );
                        match self.store.put(&doc.document_id, &vector, full_metadata.clone()) {
                            Ok(()) => {
                                let dimension = vector.len();
                                results.push(EmbedResult {
                                    document_id: doc.document_id,
                                    vector,
                                    content_hash: doc.content_hash,
                                    dimension,
                                    metadata: full_metadata,
                                    outcome: EmbedOutcome::Computed,
                                });
                            }
                            Err(e) => {
                                errors.push(BatchError {
                                    document_id: Some(doc.document_id),
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                    failed = errors.len();
                }
                Ok(vectors) => {
                    // A miscounted response has no per-item attribution either.
                    error!(
                        expected = pending_count,
                        got = vectors.len(),
                        "Generator returned wrong vector count"
                    );
                    errors.push(BatchError {
                        document_id: None,
                        error: format!(
                            "Generator returned {} vectors for {} pending documents",
                            vectors.len(),
                            pending_count
                        ),
                    });
                    failed = pending_count;
                }
                Err(e) => {
                    error!(error = %e, "Bulk embedding failed");
                    errors.push(BatchError {
                        document_id: None,
                        error: e.to_string(),
                    });
                    failed = pending_count;
                }
            }
        }

        let successful = results.len();
        info!(total, successful, skipped, failed, "Batch embed complete");

        Ok(BatchEmbedResult {
            total,
            successful,
            failed,
            skipped,
            results,
            errors,
        })
    }
}
