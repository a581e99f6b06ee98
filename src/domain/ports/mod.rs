pub mod embedding_provider;
pub mod embedding_store;
