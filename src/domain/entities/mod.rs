pub mod embed_result;
pub mod embedding_record;
pub mod related;
