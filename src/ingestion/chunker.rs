//! Size-bounded chunk assembly with page attribution
//!
//! Consumes the segment sequence and the offset index. Table and image
//! segments become standalone chunks; adjacent text segments merge up to the
//! size bound. Each chunk's page comes from looking up the midpoint of its
//! span in the flat text, with a deterministic chunk-density estimate when the
//! index has no entry there.

use uuid::Uuid;

use crate::config::ChunkingConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, Segment, SegmentKind};

use super::page_index::OffsetPageIndex;

/// Assembles ordered [`Chunk`]s from segments, the flat text, and the offset
/// index. Call-scoped: one assembler per document, discarded afterward.
pub struct ChunkAssembler {
    /// Maximum size of a merged text chunk in characters
    max_chunk_size: usize,
    /// Estimated chunks per page when no positional data is available
    fallback_chunks_per_page: u32,
}

/// Byte span of a segment or merged buffer within the flat text
type Span = (usize, usize);

impl ChunkAssembler {
    /// Create an assembler from chunking configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        Self {
            max_chunk_size: config.max_chunk_size,
            fallback_chunks_per_page: config.fallback_chunks_per_page.max(1),
        }
    }

    /// Assemble chunks.
    ///
    /// Fails with [`Error::Extraction`] when the input text is empty or no
    /// segment produced a chunk; zero chunks are never returned silently.
    pub fn assemble(
        &self,
        flat_text: &str,
        segments: &[Segment],
        index: &OffsetPageIndex,
    ) -> Result<Vec<Chunk>> {
        if flat_text.trim().is_empty() {
            return Err(Error::extraction("document text is empty"));
        }

        // Ids must stay unique across documents processed in the same instant,
        // so the prefix is random rather than clock-derived.
        let doc_key = Uuid::new_v4().simple().to_string();

        let mut chunks: Vec<Chunk> = Vec::new();
        // Monotonic search cursor: repeated identical substrings resolve to
        // their in-order occurrence instead of an earlier duplicate.
        let mut cursor = 0usize;

        let mut pending = String::new();
        let mut pending_span: Option<Span> = None;

        for segment in segments {
            let span = locate(flat_text, &segment.text, &mut cursor);

            match segment.kind {
                SegmentKind::Table | SegmentKind::Image => {
                    self.flush_pending(&mut chunks, &mut pending, &mut pending_span, index, &doc_key);
                    self.push_chunk(&mut chunks, &segment.text, segment.kind, span, index, &doc_key);
                }
                SegmentKind::Text => {
                    if !pending.is_empty()
                        && pending.len() + segment.text.len() > self.max_chunk_size
                    {
                        self.flush_pending(
                            &mut chunks,
                            &mut pending,
                            &mut pending_span,
                            index,
                            &doc_key,
                        );
                    }

                    if pending.is_empty() {
                        pending_span = span;
                    } else {
                        pending.push_str("\n\n");
                        if let (Some((start, _)), Some((_, end))) = (pending_span, span) {
                            pending_span = Some((start, end));
                        }
                    }
                    pending.push_str(&segment.text);
                }
            }
        }

        self.flush_pending(&mut chunks, &mut pending, &mut pending_span, index, &doc_key);

        if chunks.is_empty() {
            return Err(Error::extraction(
                "no content segments survived chunk assembly",
            ));
        }

        Ok(chunks)
    }

    /// Emit the accumulated text buffer as a chunk, if it holds anything.
    fn flush_pending(
        &self,
        chunks: &mut Vec<Chunk>,
        pending: &mut String,
        pending_span: &mut Option<Span>,
        index: &OffsetPageIndex,
        doc_key: &str,
    ) {
        if !pending.trim().is_empty() {
            let text = std::mem::take(pending);
            self.push_chunk(chunks, &text, SegmentKind::Text, pending_span.take(), index, doc_key);
        } else {
            pending.clear();
            *pending_span = None;
        }
    }

    fn push_chunk(
        &self,
        chunks: &mut Vec<Chunk>,
        text: &str,
        kind: SegmentKind,
        span: Option<Span>,
        index: &OffsetPageIndex,
        doc_key: &str,
    ) {
        let chunk_index = chunks.len() as u32;
        let (page_number, page_estimated) = self.resolve_page(span, index, chunk_index);

        chunks.push(Chunk {
            id: format!("chunk_{}_{}", doc_key, chunk_index),
            index: chunk_index,
            text: text.trim().to_string(),
            page_number,
            content_kind: kind,
            has_table: kind == SegmentKind::Table,
            has_image: kind == SegmentKind::Image,
            page_estimated,
        });
    }

    /// Resolve the page for a chunk span, falling back to the chunk-density
    /// estimate. The estimate is non-decreasing in chunk index, so a document
    /// with no positional data still gets monotonic page numbers.
    fn resolve_page(
        &self,
        span: Option<Span>,
        index: &OffsetPageIndex,
        chunk_index: u32,
    ) -> (u32, bool) {
        if let Some((start, end)) = span {
            let midpoint = start + (end - start) / 2;
            if let Some(page) = index.page_at(midpoint) {
                return (page, false);
            }
        }

        let estimate = chunk_index / self.fallback_chunks_per_page + 1;
        tracing::debug!(
            chunk_index,
            estimated_page = estimate,
            "no offset entry for chunk span, using chunk-density estimate"
        );
        (estimate, true)
    }
}

/// Find `needle` in `flat_text` at or after `cursor`, advancing the cursor
/// past the match. Returns the byte span, or `None` when the segment text does
/// not occur verbatim ahead of the cursor (page attribution then degrades to
/// the estimate).
fn locate(flat_text: &str, needle: &str, cursor: &mut usize) -> Option<Span> {
    let start = flat_text.get(*cursor..)?.find(needle)? + *cursor;
    let end = start + needle.len();
    *cursor = end;
    Some((start, end))
}
