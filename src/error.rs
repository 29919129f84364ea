//! Error types for the ingestion and retrieval pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content extraction failure: the parsed document yielded no usable text
    #[error("Content extraction failed: {0}")]
    Extraction(String),

    /// The remote parse job did not finish within the polling budget
    #[error("Parse job {job_id} timed out after {attempts} attempts")]
    ParseTimeout { job_id: String, attempts: u32 },

    /// The remote parse job reported a terminal failure state
    #[error("Parse job {job_id} failed remotely with status '{status}'")]
    ParseFailed { job_id: String, status: String },

    /// Vector store error (add, query, or count)
    #[error("Vector store error: {0}")]
    Store(String),

    /// Answer generation error
    #[error("LLM error: {0}")]
    Llm(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create a vector store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}
