//! Document ingestion: parsing, page indexing, segmentation, chunk assembly

pub mod chunker;
pub mod external_parser;
pub mod page_index;
pub mod pipeline;
pub mod segmenter;

pub use chunker::ChunkAssembler;
pub use external_parser::{ParseClient, ParsedDocument};
pub use page_index::{OffsetPageIndex, PageIndexBuilder};
pub use pipeline::IngestPipeline;
pub use segmenter::StructuralSegmenter;
