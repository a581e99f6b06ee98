pub mod chunking;
pub mod fingerprint;
pub mod focal_weight;
pub mod vector_ops;
