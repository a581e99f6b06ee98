use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy)]
pub enum InputType {
    Document,
    Query,
}

#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed every text in one call; output order matches input order.
    async fn embed_batch(
        &self,
        texts: &[String],
        input_type: InputType,
    ) -> Result<Vec<Vec<f32>>, DomainError>;

    async fn embed(&self, text: &str, input_type: InputType) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.embed_batch(&[text.to_string()], input_type).await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::Embedding("provider returned no vector".into()))
    }

    fn dimension(&self) -> usize;
}
