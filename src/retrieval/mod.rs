//! Similarity retrieval against the external vector store

pub mod search;

pub use search::{RetrievedChunk, Retriever};
