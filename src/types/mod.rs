//! Core types for the pipeline

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkMetadata, PageRecord, Segment, SegmentKind};
pub use query::QueryRequest;
pub use response::{IngestSummary, QueryResponse};
