//! pagemark-rag: page-aware document segmentation and citation-backed retrieval
//!
//! This crate turns the output of an asynchronous parsing service (flat markdown
//! plus an optional per-page breakdown) into retrieval-ready chunks that keep
//! tables and image descriptions intact and carry page provenance, then
//! reconciles retrieved chunks back into the set of source pages backing a
//! generated answer.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Chunk, ChunkMetadata, PageRecord, Segment, SegmentKind},
    query::QueryRequest,
    response::{IngestSummary, QueryResponse},
};
