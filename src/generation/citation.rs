//! Source-page reconciliation for generated answers

use std::collections::BTreeSet;

use crate::retrieval::RetrievedChunk;

/// The ascending, deduplicated pages behind an answer.
///
/// Derived from the chunks supplied to the generator, not from the generated
/// text: every context chunk is counted as used. Chunks without page metadata
/// (or with a malformed page of zero) contribute nothing; they are never
/// reported as page `0`.
pub fn cited_pages(context: &[RetrievedChunk]) -> Vec<u32> {
    let pages: BTreeSet<u32> = context
        .iter()
        .filter_map(|chunk| chunk.page)
        .filter(|&page| page > 0)
        .collect();

    pages.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentKind;

    fn chunk_on(page: Option<u32>) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: "chunk_t_0".to_string(),
            filename: "doc.pdf".to_string(),
            text: "content".to_string(),
            page,
            content_kind: SegmentKind::Text,
            has_table: false,
            has_image: false,
            similarity: 0.8,
        }
    }

    #[test]
    fn empty_context_yields_empty_citations() {
        assert!(cited_pages(&[]).is_empty());
    }

    #[test]
    fn pages_are_sorted_and_deduplicated() {
        let context: Vec<_> = [3, 1, 3, 2].into_iter().map(|p| chunk_on(Some(p))).collect();
        assert_eq!(cited_pages(&context), vec![1, 2, 3]);
    }

    #[test]
    fn pageless_and_zero_pages_are_excluded() {
        let context = vec![chunk_on(Some(2)), chunk_on(None), chunk_on(Some(0))];
        assert_eq!(cited_pages(&context), vec![2]);
    }
}
