//! Configuration for the pipeline and its external collaborators

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagConfig {
    /// Parse service configuration
    #[serde(default)]
    pub parser: ParseServiceConfig,
    /// Segmentation and chunk assembly configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Vector store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Answer generator configuration
    #[serde(default)]
    pub llm: LlmConfig,
    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file, then apply environment overrides
    /// for secrets (`PARSE_API_KEY`, `CHROMA_API_KEY`, `GEMINI_API_KEY`).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("PARSE_API_KEY") {
            self.parser.api_key = key;
        }
        if let Ok(key) = std::env::var("CHROMA_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            self.llm.api_key = key;
        }
    }
}

/// Configuration for the asynchronous parse service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseServiceConfig {
    /// Base URL of the parsing API
    pub base_url: String,
    /// API key (bearer token)
    pub api_key: String,
    /// Instruction sent alongside each upload describing extraction fidelity
    pub parsing_instruction: String,
    /// Seconds between job status polls
    pub poll_interval_secs: u64,
    /// Maximum number of status polls before giving up
    pub max_poll_attempts: u32,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ParseServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cloud.llamaindex.ai/api/parsing".to_string(),
            api_key: String::new(),
            parsing_instruction: "Extract all text, tables, and describe any images or charts. \
                                  Preserve table structure in markdown format. \
                                  For images, provide detailed descriptions of visual content."
                .to_string(),
            poll_interval_secs: 10,
            max_poll_attempts: 30,
            request_timeout_secs: 120,
        }
    }
}

/// Segmentation and chunk assembly configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of a merged text chunk in characters
    pub max_chunk_size: usize,
    /// A paragraph buffer must exceed this length before a blank line flushes it
    pub min_segment_len: usize,
    /// Estimated chunks per page, used when no offset index entry exists
    pub fallback_chunks_per_page: u32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: 1000,
            min_segment_len: 20,
            fallback_chunks_per_page: 3,
        }
    }
}

/// Vector store (Chroma-style HTTP API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the store
    pub base_url: String,
    /// Tenant name
    pub tenant: String,
    /// Database name
    pub database: String,
    /// Collection name, resolved once into a handle at connect time
    pub collection: String,
    /// Optional API key
    pub api_key: Option<String>,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            tenant: "default_tenant".to_string(),
            database: "default_database".to_string(),
            collection: "pdf_documents".to_string(),
            api_key: None,
            request_timeout_secs: 60,
        }
    }
}

/// Answer generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the generation API
    pub base_url: String,
    /// API key
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_output_tokens: u32,
    /// Per-request HTTP timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            temperature: 0.3,
            max_output_tokens: 2048,
            request_timeout_secs: 120,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Default number of chunks to retrieve per query
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.max_chunk_size, 1000);
        assert_eq!(config.chunking.fallback_chunks_per_page, 3);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.parser.max_poll_attempts, 30);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            [chunking]
            max_chunk_size = 500
            min_segment_len = 20
            fallback_chunks_per_page = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.chunking.max_chunk_size, 500);
        assert_eq!(config.store.collection, "pdf_documents");
    }
}
