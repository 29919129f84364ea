//! Provider abstractions for the external vector store and answer generator
//!
//! Trait-based seams so the HTTP collaborators can be swapped for test doubles
//! or alternative backends.

pub mod chroma;
pub mod gemini;
pub mod llm;
pub mod vector_store;

pub use chroma::ChromaStore;
pub use gemini::GeminiClient;
pub use llm::LlmProvider;
pub use vector_store::{ScoredChunk, VectorStoreProvider};
