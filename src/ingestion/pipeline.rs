//! End-to-end document ingestion: parse, index, segment, assemble, store

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::vector_store::VectorStoreProvider;
use crate::types::{Chunk, IngestSummary, PageRecord};

use super::chunker::ChunkAssembler;
use super::external_parser::{ParseClient, ParsedDocument};
use super::page_index::PageIndexBuilder;
use super::segmenter::StructuralSegmenter;

/// One-document ingestion pipeline.
///
/// Holds no per-document state; the offset index and segment buffers live only
/// for the duration of a single `ingest` call.
pub struct IngestPipeline {
    parser: ParseClient,
    segmenter: StructuralSegmenter,
    assembler: ChunkAssembler,
    store: Arc<dyn VectorStoreProvider>,
}

impl IngestPipeline {
    /// Build a pipeline from configuration and a connected store
    pub fn new(config: &RagConfig, store: Arc<dyn VectorStoreProvider>) -> Result<Self> {
        Ok(Self {
            parser: ParseClient::new(config.parser.clone())?,
            segmenter: StructuralSegmenter::new(config.chunking.min_segment_len),
            assembler: ChunkAssembler::new(&config.chunking),
            store,
        })
    }

    /// Parse, chunk, and store one document.
    pub async fn ingest(&self, filename: &str, data: Vec<u8>) -> Result<IngestSummary> {
        let parsed = self.parser.parse_document(filename, data).await?;
        let total_pages = (!parsed.pages.is_empty()).then(|| parsed.pages.len() as u32);

        let chunks = self.chunk_parsed(&parsed)?;
        let stored = self.store.add_chunks(filename, &chunks).await?;

        let tables = chunks.iter().filter(|c| c.has_table).count();
        let images = chunks.iter().filter(|c| c.has_image).count();
        tracing::info!(
            filename,
            chunks = stored,
            tables,
            images,
            "document ingested"
        );

        Ok(IngestSummary {
            filename: filename.to_string(),
            chunks_stored: stored,
            tables,
            images,
            total_pages,
        })
    }

    /// The offline half of ingestion: flat text plus page breakdown to chunks.
    ///
    /// Carriage returns are normalized on both representations first so their
    /// offsets agree.
    pub fn chunk_parsed(&self, parsed: &ParsedDocument) -> Result<Vec<Chunk>> {
        let flat_text = normalize_newlines(&parsed.markdown);

        let mut builder = PageIndexBuilder::new();
        for page in &parsed.pages {
            builder.push(&PageRecord {
                page_number: page.page_number,
                text: normalize_newlines(&page.text),
            });
        }
        let index = builder.build();

        let segments = self.segmenter.segment(&flat_text);
        let chunks = self.assembler.assemble(&flat_text, &segments, &index)?;

        let estimated = chunks.iter().filter(|c| c.page_estimated).count();
        if estimated > 0 {
            tracing::warn!(
                estimated,
                total = chunks.len(),
                "page attribution degraded to estimates for some chunks"
            );
        }

        Ok(chunks)
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_is_normalized() {
        assert_eq!(normalize_newlines("a\r\nb\nc"), "a\nb\nc");
    }
}
