use crate::domain::entities::embedding_record::{EmbeddingRecord, Metadata, SearchResult};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use crate::domain::values::vector_ops;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

/// Brute-force in-memory store. Every query scans all records, O(n * d),
/// which is fine for small and medium corpora; larger deployments swap in
/// an indexed backend behind the same trait.
///
/// Reads share the lock; mutations take it exclusively. Batch writes lock
/// per item so a large batch cannot starve concurrent readers.
pub struct InMemoryIndex {
    dimension: usize,
    records: RwLock<HashMap<String, EmbeddingRecord>>,
}

impl InMemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(HashMap::new()),
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), DomainError> {
        if vector.len() != self.dimension {
            return Err(DomainError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl EmbeddingStore for InMemoryIndex {
    fn put(&self, document_id: &str, vector: &[f32], metadata: Metadata) -> Result<(), DomainError> {
        self.check_dimension(vector)?;
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::store(e.to_string()))?;
        match records.get_mut(document_id) {
            Some(existing) => {
                existing.vector = vector.to_vec();
                existing.metadata = metadata;
                existing.updated_at = Utc::now();
            }
            None => {
                records.insert(
                    document_id.to_string(),
                    EmbeddingRecord::new(document_id, vector.to_vec(), metadata),
                );
            }
        }
        debug!(document_id, "Stored embedding");
        Ok(())
    }

    fn put_batch(
        &self,
        document_ids: &[String],
        vectors: &[Vec<f32>],
        metadata: Option<Vec<Metadata>>,
    ) -> Result<(), DomainError> {
        if document_ids.len() != vectors.len() {
            return Err(DomainError::InvalidInput(format!(
                "document_ids and vectors must have the same length ({} vs {})",
                document_ids.len(),
                vectors.len()
            )));
        }
        if let Some(metas) = &metadata {
            if metas.len() != document_ids.len() {
                return Err(DomainError::InvalidInput(format!(
                    "metadata must have the same length as document_ids ({} vs {})",
                    metas.len(),
                    document_ids.len()
                )));
            }
        }

        match metadata {
            Some(metas) => {
                for ((id, vec), meta) in document_ids.iter().zip(vectors).zip(metas) {
                    self.put(id, vec, meta)?;
                }
            }
            None => {
                for (id, vec) in document_ids.iter().zip(vectors) {
                    self.put(id, vec, Metadata::new())?;
                }
            }
        }
        Ok(())
    }

    fn get(&self, document_id: &str) -> Result<Option<EmbeddingRecord>, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::store(e.to_string()))?;
        Ok(records.get(document_id).cloned())
    }

    fn delete(&self, document_id: &str) -> Result<bool, DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let removed = records.remove(document_id).is_some();
        if removed {
            debug!(document_id, "Deleted embedding");
        }
        Ok(removed)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, DomainError> {
        self.check_dimension(&query.vector)?;
        let unit_query = vector_ops::normalize(&query.vector).ok_or_else(|| {
            DomainError::InvalidInput("Query vector has zero norm; similarity is undefined".into())
        })?;

        let records = self
            .records
            .read()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let mut results: Vec<SearchResult> = Vec::new();
        for record in records.values() {
            if !query.matches(&record.metadata) {
                continue;
            }
            // None means the stored vector has zero norm, which no query matches
            let Some(score) = vector_ops::normalized_dot(&unit_query, &record.vector) else {
                continue;
            };
            if score >= query.threshold {
                results.push(SearchResult {
                    document_id: record.document_id.clone(),
                    score,
                    metadata: record.metadata.clone(),
                    vector: query.include_vectors.then(|| record.vector.clone()),
                });
            }
        }

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        results.truncate(query.top_k);
        Ok(results)
    }

    fn count(&self) -> Result<usize, DomainError> {
        let records = self
            .records
            .read()
            .map_err(|e| DomainError::store(e.to_string()))?;
        Ok(records.len())
    }

    fn clear(&self) -> Result<(), DomainError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| DomainError::store(e.to_string()))?;
        records.clear();
        info!("Cleared in-memory index");
        Ok(())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
