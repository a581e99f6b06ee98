use crate::domain::error::DomainError;

/// Split text into overlapping word windows for embedding documents longer
/// than the model's context window. Windows advance by `chunk_size - overlap`
/// words; the final window may be shorter. Text with no words at all falls
/// back to a single chunk holding the original text.
pub fn chunk_words(
    text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, DomainError> {
    if chunk_size == 0 {
        return Err(DomainError::InvalidInput(
            "chunk_size must be greater than zero".into(),
        ));
    }
    if overlap >= chunk_size {
        return Err(DomainError::InvalidInput(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let step = chunk_size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + chunk_size).min(words.len());
        chunks.push(words[start..end].join(" "));
        start += step;
    }

    if chunks.is_empty() {
        chunks.push(text.to_string());
    }
    Ok(chunks)
}
