//! Similarity search with score normalization

use std::sync::Arc;

use crate::error::Result;
use crate::providers::vector_store::{ScoredChunk, VectorStoreProvider};
use crate::types::SegmentKind;

/// Score assigned when the store reports no distance for a match
const NEUTRAL_SIMILARITY: f32 = 0.5;

/// A chunk retrieved for a query, with its normalized similarity
#[derive(Debug, Clone)]
pub struct RetrievedChunk {
    /// Chunk identifier
    pub chunk_id: String,
    /// Source document filename
    pub filename: String,
    /// Chunk text
    pub text: String,
    /// Source page, if the stored metadata carried one
    pub page: Option<u32>,
    /// Structural kind
    pub content_kind: SegmentKind,
    /// Whether the chunk holds a table block
    pub has_table: bool,
    /// Whether the chunk holds an image description block
    pub has_image: bool,
    /// Similarity in `[0, 1]`, higher is more relevant
    pub similarity: f32,
}

impl RetrievedChunk {
    fn from_match(m: ScoredChunk) -> Self {
        let similarity = m
            .distance
            .map(|d| (1.0 - d).clamp(0.0, 1.0))
            .unwrap_or(NEUTRAL_SIMILARITY);

        Self {
            chunk_id: m.metadata.chunk_id,
            filename: m.metadata.filename,
            text: m.text,
            page: m.metadata.page,
            content_kind: m.metadata.content_type,
            has_table: m.metadata.has_table,
            has_image: m.metadata.has_image,
            similarity,
        }
    }
}

/// Issues similarity queries against the store handle it was built with
pub struct Retriever {
    store: Arc<dyn VectorStoreProvider>,
}

impl Retriever {
    /// Create a retriever over a connected store
    pub fn new(store: Arc<dyn VectorStoreProvider>) -> Self {
        Self { store }
    }

    /// Retrieve up to `top_k` chunks ordered by descending similarity.
    ///
    /// An empty collection yields an empty list; store failures propagate as
    /// errors rather than empty results.
    pub async fn retrieve(&self, question: &str, top_k: usize) -> Result<Vec<RetrievedChunk>> {
        let matches = self.store.query(question, top_k).await?;

        let mut retrieved: Vec<RetrievedChunk> =
            matches.into_iter().map(RetrievedChunk::from_match).collect();
        retrieved.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        retrieved.truncate(top_k);

        let pages: Vec<Option<u32>> = retrieved.iter().map(|r| r.page).collect();
        let tables = retrieved.iter().filter(|r| r.has_table).count();
        let images = retrieved.iter().filter(|r| r.has_image).count();
        tracing::debug!(
            question,
            results = retrieved.len(),
            ?pages,
            tables,
            images,
            "retrieval complete"
        );

        Ok(retrieved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::types::ChunkMetadata;
    use async_trait::async_trait;

    struct FakeStore {
        matches: Vec<ScoredChunk>,
        fail: bool,
    }

    #[async_trait]
    impl VectorStoreProvider for FakeStore {
        async fn add_chunks(&self, _filename: &str, _chunks: &[crate::types::Chunk]) -> Result<usize> {
            Ok(0)
        }

        async fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<ScoredChunk>> {
            if self.fail {
                Err(Error::store("connection refused"))
            } else {
                Ok(self.matches.clone())
            }
        }

        async fn count(&self) -> Result<usize> {
            Ok(self.matches.len())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn scored(page: Option<u32>, distance: Option<f32>) -> ScoredChunk {
        ScoredChunk {
            text: "stored text".to_string(),
            metadata: ChunkMetadata {
                page,
                filename: "doc.pdf".to_string(),
                chunk_id: "chunk_a_0".to_string(),
                content_type: SegmentKind::Text,
                has_table: false,
                has_image: false,
                created_at: chrono::Utc::now(),
            },
            distance,
        }
    }

    #[tokio::test]
    async fn empty_collection_yields_empty_list() {
        let retriever = Retriever::new(Arc::new(FakeStore {
            matches: vec![],
            fail: false,
        }));
        let results = retriever.retrieve("anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn store_failure_is_an_error_not_empty() {
        let retriever = Retriever::new(Arc::new(FakeStore {
            matches: vec![],
            fail: true,
        }));
        let result = retriever.retrieve("anything", 5).await;
        assert!(matches!(result, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn distances_convert_to_descending_similarity() {
        let retriever = Retriever::new(Arc::new(FakeStore {
            matches: vec![
                scored(Some(1), Some(0.7)),
                scored(Some(2), Some(0.1)),
                scored(Some(3), None),
            ],
            fail: false,
        }));
        let results = retriever.retrieve("q", 5).await.unwrap();

        assert_eq!(results.len(), 3);
        assert!((results[0].similarity - 0.9).abs() < 1e-6);
        assert_eq!(results[0].page, Some(2));
        assert!((results[1].similarity - NEUTRAL_SIMILARITY).abs() < 1e-6);
        assert!((results[2].similarity - 0.3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn similarity_is_clamped_to_unit_interval() {
        let retriever = Retriever::new(Arc::new(FakeStore {
            matches: vec![scored(Some(1), Some(1.8)), scored(Some(2), Some(-0.2))],
            fail: false,
        }));
        let results = retriever.retrieve("q", 5).await.unwrap();
        for r in &results {
            assert!((0.0..=1.0).contains(&r.similarity));
        }
    }
}
