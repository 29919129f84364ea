//! Chroma-style HTTP vector store client
//!
//! The collection is resolved once at connect time into an explicit handle
//! that every later call reuses; there is no mutable "current collection"
//! state. Embeddings are computed server-side from the document and query
//! text, per the store's contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::types::{Chunk, ChunkMetadata};

use super::vector_store::{ScoredChunk, VectorStoreProvider};

/// Identifies a resolved collection
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    /// Server-assigned collection id
    pub id: String,
    /// Collection name
    pub name: String,
}

/// HTTP client for a Chroma-style vector store
pub struct ChromaStore {
    client: Client,
    config: StoreConfig,
    collection: CollectionHandle,
}

#[derive(Serialize)]
struct CreateCollectionRequest<'a> {
    name: &'a str,
    get_or_create: bool,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
    name: String,
}

#[derive(Serialize)]
struct AddRequest<'a> {
    ids: Vec<&'a str>,
    documents: Vec<&'a str>,
    metadatas: Vec<ChunkMetadata>,
}

#[derive(Serialize)]
struct QueryRequestBody<'a> {
    query_texts: Vec<&'a str>,
    n_results: usize,
    include: Vec<&'a str>,
}

/// Query results arrive as parallel arrays, one inner array per query text
#[derive(Deserialize)]
struct QueryResponseBody {
    #[serde(default)]
    documents: Vec<Vec<String>>,
    #[serde(default)]
    metadatas: Vec<Vec<ChunkMetadata>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

impl ChromaStore {
    /// Connect to the store and resolve the configured collection.
    pub async fn connect(config: StoreConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(Error::Http)?;

        let url = format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            config.base_url, config.tenant, config.database
        );

        let mut request = client.post(&url).json(&CreateCollectionRequest {
            name: &config.collection,
            get_or_create: true,
        });
        if let Some(ref key) = config.api_key {
            request = request.header("x-chroma-token", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::store(format!(
                "collection setup failed ({status}): {body}"
            )));
        }

        let collection: CollectionResponse = response.json().await?;
        tracing::info!(
            collection = %collection.name,
            id = %collection.id,
            "vector store collection ready"
        );

        Ok(Self {
            client,
            config,
            collection: CollectionHandle {
                id: collection.id,
                name: collection.name,
            },
        })
    }

    /// The resolved collection handle
    pub fn collection(&self) -> &CollectionHandle {
        &self.collection
    }

    fn collection_url(&self, suffix: &str) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections/{}/{}",
            self.config.base_url,
            self.config.tenant,
            self.config.database,
            self.collection.id,
            suffix
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key {
            Some(ref key) => request.header("x-chroma-token", key),
            None => request,
        }
    }

    async fn check(&self, response: reqwest::Response, action: &str) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(Error::store(format!("{action} failed ({status}): {body}")))
        }
    }
}

#[async_trait]
impl VectorStoreProvider for ChromaStore {
    async fn add_chunks(&self, filename: &str, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let request = AddRequest {
            ids: chunks.iter().map(|c| c.id.as_str()).collect(),
            documents: chunks.iter().map(|c| c.text.as_str()).collect(),
            metadatas: chunks
                .iter()
                .map(|c| c.to_store_metadata(filename))
                .collect(),
        };

        let tables = chunks.iter().filter(|c| c.has_table).count();
        let images = chunks.iter().filter(|c| c.has_image).count();
        tracing::info!(
            filename,
            chunks = chunks.len(),
            tables,
            images,
            collection = %self.collection.name,
            "storing chunks"
        );

        let response = self
            .authorized(self.client.post(self.collection_url("add")))
            .json(&request)
            .send()
            .await?;
        self.check(response, "add").await?;

        Ok(chunks.len())
    }

    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<ScoredChunk>> {
        let body = QueryRequestBody {
            query_texts: vec![text],
            n_results: top_k,
            include: vec!["documents", "metadatas", "distances"],
        };

        let response = self
            .authorized(self.client.post(self.collection_url("query")))
            .json(&body)
            .send()
            .await?;
        let response = self.check(response, "query").await?;
        let results: QueryResponseBody = response.json().await?;

        // Single query text, so only the first inner arrays matter
        let documents = results.documents.into_iter().next().unwrap_or_default();
        let metadatas = results.metadatas.into_iter().next().unwrap_or_default();
        let distances = results
            .distances
            .and_then(|d| d.into_iter().next())
            .unwrap_or_default();

        let matches = documents
            .into_iter()
            .zip(metadatas)
            .enumerate()
            .map(|(i, (text, metadata))| ScoredChunk {
                text,
                metadata,
                distance: distances.get(i).copied(),
            })
            .collect();

        Ok(matches)
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .authorized(self.client.get(self.collection_url("count")))
            .send()
            .await?;
        let response = self.check(response, "count").await?;
        let count: usize = response.json().await?;
        Ok(count)
    }

    fn name(&self) -> &str {
        "chroma"
    }
}
