//! Shared test helpers.

#![allow(dead_code)]

use semvault::domain::entities::embedding_record::Metadata;
use semvault::domain::error::DomainError;
use semvault::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use semvault::infrastructure::embeddings::hash::HashProvider;
use semvault::infrastructure::memory::index::InMemoryIndex;
use semvault::SemVault;
use std::collections::HashMap;
use std::sync::Arc;

pub const DIM: usize = 16;

/// In-memory vault with the deterministic hash provider.
pub fn setup() -> SemVault {
    let (vault, _) = setup_counted();
    vault
}

/// Same as `setup`, but hands back the provider so tests can assert on
/// its call counter.
pub fn setup_counted() -> (SemVault, Arc<HashProvider>) {
    let provider = Arc::new(HashProvider::new(DIM));
    let vault = SemVault::with_components(
        Arc::new(InMemoryIndex::new(DIM)),
        provider.clone(),
    );
    (vault, provider)
}

/// Vault over a provider that returns fixed vectors, for tests that need
/// controlled geometry.
pub fn setup_static(dimension: usize, entries: Vec<(&str, Vec<f32>)>) -> SemVault {
    SemVault::with_components(
        Arc::new(InMemoryIndex::new(dimension)),
        Arc::new(StaticProvider::new(dimension, entries)),
    )
}

pub fn meta(pairs: &[(&str, serde_json::Value)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

pub fn unit(dimension: usize, axis: usize) -> Vec<f32> {
    let mut v = vec![0.0; dimension];
    v[axis] = 1.0;
    v
}

/// Returns the exact vector registered for each text, and fails for any
/// text it has never seen.
pub struct StaticProvider {
    dimension: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl StaticProvider {
    pub fn new(dimension: usize, entries: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            dimension,
            vectors: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for StaticProvider {
    async fn embed_batch(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        texts
            .iter()
            .map(|t| {
                self.vectors
                    .get(t)
                    .cloned()
                    .ok_or_else(|| DomainError::Embedding(format!("No vector registered for: {t}")))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Always fails, for exercising generator failure paths.
pub struct FailingProvider {
    pub dimension: usize,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FailingProvider {
    async fn embed_batch(
        &self,
        _texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        Err(DomainError::Embedding("Provider unavailable".into()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
