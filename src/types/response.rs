//! Response types for ingestion and querying

use serde::{Deserialize, Serialize};

/// Answer to a query, with the source pages that back it.
///
/// Citations reflect the chunks supplied to the generator, not a textual
/// verification of the generated answer against them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer
    pub answer: String,
    /// Ascending, deduplicated source page numbers
    pub citations: Vec<u32>,
    /// Number of chunks supplied as context
    pub sources_used: usize,
    /// Whether the context contained table data
    pub contained_tables: bool,
    /// Whether the context contained image descriptions
    pub contained_images: bool,
    /// Rough token estimate for the prompt plus answer
    pub tokens_used: u64,
}

impl QueryResponse {
    /// Response returned when retrieval produced no context at all
    pub fn no_context() -> Self {
        Self {
            answer: "I couldn't find relevant information in your document to answer this \
                     question. Please try asking about topics covered in the document."
                .to_string(),
            citations: Vec::new(),
            sources_used: 0,
            contained_tables: false,
            contained_images: false,
            tokens_used: 0,
        }
    }
}

/// Summary of one document ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    /// Source filename
    pub filename: String,
    /// Number of chunks stored
    pub chunks_stored: usize,
    /// Number of table chunks
    pub tables: usize,
    /// Number of image-description chunks
    pub images: usize,
    /// Page count reported by the parse service, if a breakdown was present
    pub total_pages: Option<u32>,
}
