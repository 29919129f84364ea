//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Chunk, ChunkMetadata};

/// A raw match from the store: document text, metadata, and the store's
/// distance if it reported one.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    /// Stored chunk text
    pub text: String,
    /// Stored metadata record
    pub metadata: ChunkMetadata,
    /// Distance reported by the store, lower is closer
    pub distance: Option<f32>,
}

/// Trait for the external vector store.
///
/// The store owns embedding computation and persisted chunk lifetime; this
/// crate issues independent add/query calls with no client-side locking and
/// relies on the store for consistency of concurrent writes.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Store chunks with their metadata; returns the number stored
    async fn add_chunks(&self, filename: &str, chunks: &[Chunk]) -> Result<usize>;

    /// Similarity search by query text, up to `top_k` matches.
    ///
    /// An empty result is a valid outcome (for example an empty collection);
    /// transport or store failures surface as errors, never as an empty list.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredChunk>>;

    /// Number of stored chunks, for diagnostics
    async fn count(&self) -> Result<usize>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
