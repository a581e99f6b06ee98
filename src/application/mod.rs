pub mod context_query;
pub mod embed_batch;
pub mod embed_document;
pub mod related_content;
pub mod search;
pub mod similarity;
