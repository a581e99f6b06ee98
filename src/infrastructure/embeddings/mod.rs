pub mod hash;
pub mod openai;
pub mod voyage;
