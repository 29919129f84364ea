//! Document, segment, and chunk types with page provenance

use serde::{Deserialize, Serialize};

/// One page of text as reported by the parsing service.
///
/// Pages arrive ordered by page number; concatenating their texts in order
/// yields the document's flat text for offset purposes. Page numbers are
/// accepted as given; attribution accuracy for malformed upstream numbering is
/// a known limitation of the source data, not of this pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub page_number: u32,
    /// Text content of the page
    pub text: String,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// Structural kind of a segment or chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Markdown table block
    Table,
    /// Image, diagram, or chart description block
    Image,
    /// Ordinary prose
    Text,
}

impl SegmentKind {
    /// Stable name used in store metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Image => "image",
            Self::Text => "text",
        }
    }
}

/// An intermediate structural unit produced by segmentation.
///
/// Segment text is trimmed and non-empty. Table and image segments each hold
/// one entire structural block and are never split downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Trimmed text content
    pub text: String,
    /// Structural kind
    pub kind: SegmentKind,
}

impl Segment {
    /// Create a segment, trimming the text
    pub fn new(text: impl Into<String>, kind: SegmentKind) -> Self {
        Self {
            text: text.into().trim().to_string(),
            kind,
        }
    }
}

/// The atomic retrieval unit: embedded, stored, and retrieved as a whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Identifier unique within the document
    pub id: String,
    /// Assembly order, strictly increasing
    pub index: u32,
    /// Text content, never empty or whitespace-only
    pub text: String,
    /// Resolved source page
    pub page_number: u32,
    /// Structural kind of the originating segment(s)
    pub content_kind: SegmentKind,
    /// Whether the chunk holds a table block
    pub has_table: bool,
    /// Whether the chunk holds an image description block
    pub has_image: bool,
    /// True when the page was estimated rather than resolved from the offset index
    pub page_estimated: bool,
}

impl Chunk {
    /// Build the metadata record stored alongside the chunk text.
    pub fn to_store_metadata(&self, filename: &str) -> ChunkMetadata {
        ChunkMetadata {
            page: Some(self.page_number),
            filename: filename.to_string(),
            chunk_id: self.id.clone(),
            content_type: self.content_kind,
            has_table: self.has_table,
            has_image: self.has_image,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Metadata record exchanged with the vector store.
///
/// Field names are the store-side contract; `page` is optional on the read
/// side so foreign records without page provenance deserialize cleanly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source page number
    #[serde(default)]
    pub page: Option<u32>,
    /// Source document filename
    #[serde(default)]
    pub filename: String,
    /// Chunk identifier
    #[serde(default)]
    pub chunk_id: String,
    /// Structural kind
    #[serde(default = "default_content_type")]
    pub content_type: SegmentKind,
    /// Whether the chunk holds a table block
    #[serde(default)]
    pub has_table: bool,
    /// Whether the chunk holds an image description block
    #[serde(default)]
    pub has_image: bool,
    /// Ingestion timestamp
    #[serde(default = "chrono::Utc::now")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

fn default_content_type() -> SegmentKind {
    SegmentKind::Text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_trims_text() {
        let seg = Segment::new("  hello world \n", SegmentKind::Text);
        assert_eq!(seg.text, "hello world");
    }

    #[test]
    fn metadata_round_trip() {
        let chunk = Chunk {
            id: "chunk_abc_0".to_string(),
            index: 0,
            text: "| A | B |".to_string(),
            page_number: 3,
            content_kind: SegmentKind::Table,
            has_table: true,
            has_image: false,
            page_estimated: false,
        };

        let meta = chunk.to_store_metadata("report.pdf");
        let json = serde_json::to_string(&meta).unwrap();
        let back: ChunkMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(back.page, Some(3));
        assert_eq!(back.filename, "report.pdf");
        assert_eq!(back.content_type, SegmentKind::Table);
        assert!(back.has_table);
    }

    #[test]
    fn metadata_tolerates_missing_page() {
        let back: ChunkMetadata = serde_json::from_str(r#"{"filename": "x.pdf"}"#).unwrap();
        assert_eq!(back.page, None);
        assert_eq!(back.content_type, SegmentKind::Text);
    }
}
