use crate::domain::entities::embedding_record::{EmbeddingRecord, Metadata, SearchResult};
use crate::domain::error::DomainError;
use crate::domain::ports::embedding_store::{EmbeddingStore, SearchQuery};
use crate::domain::values::vector_ops;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::sync::Mutex;
use tracing::debug;

/// Durable store backed by a single SQLite table. Vectors are stored as
/// little-endian f32 BLOBs, metadata as JSON text. Scoring still happens
/// in process; SQLite only provides persistence and the scan.
pub struct SqliteEmbeddingStore {
    conn: Mutex<Connection>,
    dimension: usize,
}

impl SqliteEmbeddingStore {
    pub fn new(conn: Connection, dimension: usize) -> Self {
        Self {
            conn: Mutex::new(conn),
            dimension,
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

    fn serialize_vector(v: &[f32]) -> Vec<u8> {
        v.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    fn deserialize_vector(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    fn parse_timestamp(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_record(row: &rusqlite::Row) -> Result<EmbeddingRecord, rusqlite::Error> {
        let blob: Vec<u8> = row.get(1)?;
        let metadata_str: String = row.get(2)?;
        let created_str: String = row.get(3)?;
        let updated_str: String = row.get(4)?;
        Ok(EmbeddingRecord {
            document_id: row.get(0)?,
            vector: Self::deserialize_vector(&blob),
            metadata: serde_json::from_str(&metadata_str).unwrap_or_default(),
            created_at: Self::parse_timestamp(&created_str),
            updated_at: Self::parse_timestamp(&updated_str),
        })
    }
}

impl EmbeddingStore for SqliteEmbeddingStore {
    fn put(&self, document_id: &str, vector: &[f32], metadata: Metadata) -> Result<(), DomainError> {
        self.check_dimension(vector)?;
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let blob = Self::serialize_vector(vector);
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| DomainError::store_with("Failed to serialize metadata", e))?;
        let now = Utc::now().to_rfc3339();
        // created_at survives updates; only updated_at moves
        conn.execute(
            "INSERT INTO embeddings (document_id, vector, metadata, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(document_id) DO UPDATE SET
                 vector = excluded.vector,
                 metadata = excluded.metadata,
                 updated_at = excluded.updated_at",
            params![document_id, blob, metadata_json, now, now],
        )
        .map_err(|e| DomainError::store_with("Failed to store embedding", e))?;
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
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let mut stmt = conn
            .prepare(
                "SELECT document_id, vector, metadata, created_at, updated_at
                 FROM embeddings WHERE document_id = ?1",
            )
            .map_err(|e| DomainError::store_with("Failed to prepare query", e))?;
        let mut rows = stmt
            .query_map(params![document_id], Self::row_to_record)
            .map_err(|e| DomainError::store_with("Failed to fetch embedding", e))?;
        Ok(rows.next().and_then(|r| r.ok()))
    }

    fn delete(&self, document_id: &str) -> Result<bool, DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let affected = conn
            .execute(
                "DELETE FROM embeddings WHERE document_id = ?1",
                params![document_id],
            )
            .map_err(|e| DomainError::store_with("Failed to delete embedding", e))?;
        Ok(affected > 0)
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>, DomainError> {
        self.check_dimension(&query.vector)?;
        let unit_query = vector_ops::normalize(&query.vector).ok_or_else(|| {
            DomainError::InvalidInput("Query vector has zero norm; similarity is undefined".into())
        })?;

        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let mut stmt = conn
            .prepare("SELECT document_id, vector, metadata FROM embeddings")
            .map_err(|e| DomainError::store_with("Failed to prepare search", e))?;
        let rows: Vec<(String, Vec<u8>, String)> = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e| DomainError::store_with("Search failed", e))?
            .filter_map(|r| r.ok())
            .collect();

        let mut results: Vec<SearchResult> = Vec::new();
        for (document_id, blob, metadata_str) in rows {
            let metadata: Metadata = serde_json::from_str(&metadata_str).unwrap_or_default();
            if !query.matches(&metadata) {
                continue;
            }
            let stored = Self::deserialize_vector(&blob);
            // None means zero norm or a row written under another dimension
            let Some(score) = vector_ops::normalized_dot(&unit_query, &stored) else {
                continue;
            };
            if score >= query.threshold {
                results.push(SearchResult {
                    document_id,
                    score,
                    metadata,
                    vector: query.include_vectors.then_some(stored),
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
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM embeddings", [], |r| r.get(0))
            .map_err(|e| DomainError::store_with("Count failed", e))?;
        Ok(count as usize)
    }

    fn clear(&self) -> Result<(), DomainError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| DomainError::store(e.to_string()))?;
        conn.execute("DELETE FROM embeddings", [])
            .map_err(|e| DomainError::store_with("Clear failed", e))?;
        Ok(())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
