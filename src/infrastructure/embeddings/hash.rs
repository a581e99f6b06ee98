use crate::domain::error::DomainError;
use crate::domain::ports::embedding_provider::{EmbeddingProvider, InputType};
use crate::domain::values::vector_ops;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Deterministic offline provider: feature-hashes tokens into a fixed
/// number of buckets and unit-normalizes the result. The same text always
/// yields the same vector, texts sharing tokens land near each other, and
/// no network or credentials are needed. Also the workhorse of the test
/// suite, where `calls()` exposes how often the generator was invoked.
pub struct HashProvider {
    dimension: usize,
    calls: AtomicUsize,
}

impl HashProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generation calls served so far. A batch counts as one.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut buckets = vec![0.0_f32; self.dimension];
        for token in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            token.to_lowercase().hash(&mut hasher);
            let h = hasher.finish();
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
            buckets[bucket] += sign;
        }
        match vector_ops::normalize(&buckets) {
            Some(unit) => unit,
            // No tokens, or signs cancelled in every bucket: fall back to a
            // one-hot vector derived from the raw text so output stays unit.
            None => {
                let mut hasher = DefaultHasher::new();
                text.hash(&mut hasher);
                let mut one_hot = vec![0.0_f32; self.dimension];
                one_hot[(hasher.finish() % self.dimension as u64) as usize] = 1.0;
                one_hot
            }
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for HashProvider {
    async fn embed_batch(
        &self,
        texts: &[String],
        _input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_and_unit_length() {
        let provider = HashProvider::new(64);
        let a = provider.embed_text("alpha beta gamma");
        let b = provider.embed_text("alpha beta gamma");
        assert_eq!(a, b);
        assert!((vector_ops::norm(&a) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_empty_text_still_unit_length() {
        let provider = HashProvider::new(64);
        let v = provider.embed_text("");
        assert!((vector_ops::norm(&v) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_repeated_tokens_keep_direction() {
        let provider = HashProvider::new(64);
        let a = provider.embed_text("alpha");
        let b = provider.embed_text("alpha alpha alpha");
        assert!((vector_ops::cosine_similarity(&a, &b) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_shared_tokens_score_higher_than_disjoint() {
        let provider = HashProvider::new(64);
        let a = provider.embed_text("quarterly revenue report");
        let b = provider.embed_text("revenue report for the quarter");
        let c = provider.embed_text("gardening tips and tricks");
        let ab = vector_ops::cosine_similarity(&a, &b);
        let ac = vector_ops::cosine_similarity(&a, &c);
        assert!(ab > ac);
    }
}
