//! Client for the asynchronous document parsing service
//!
//! Upload returns a job id; the job is then polled on a fixed interval up to a
//! fixed attempt budget. A `SUCCESS` status yields two result fetches (the
//! per-page JSON breakdown and the flat markdown body); a reported failure
//! state ends the poll immediately. Exhausting the budget is a distinct
//! timeout error so callers can tell "still processing elsewhere" from
//! "permanently failed".

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::config::ParseServiceConfig;
use crate::error::{Error, Result};
use crate::types::PageRecord;

/// Flat markdown plus the optional per-page breakdown for one parsed document
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Flat markdown-like body
    pub markdown: String,
    /// Ordered per-page breakdown; empty when the service supplied none
    pub pages: Vec<PageRecord>,
}

/// HTTP client for the parse service
pub struct ParseClient {
    client: Client,
    config: ParseServiceConfig,
}

#[derive(Deserialize)]
struct UploadResponse {
    id: String,
}

#[derive(Deserialize)]
struct JobStatusResponse {
    status: String,
}

#[derive(Deserialize)]
struct JsonResult {
    #[serde(default)]
    pages: Vec<JsonPage>,
}

#[derive(Deserialize)]
struct JsonPage {
    #[serde(alias = "page_number")]
    page: Option<u32>,
    text: Option<String>,
    md: Option<String>,
}

/// The markdown result may arrive as a raw body or wrapped in an envelope
#[derive(Deserialize)]
struct MarkdownEnvelope {
    markdown: String,
}

impl ParseClient {
    /// Create a new client
    pub fn new(config: ParseServiceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(Error::Http)?;
        Ok(Self { client, config })
    }

    /// Upload a document and await the parsed result.
    pub async fn parse_document(&self, filename: &str, data: Vec<u8>) -> Result<ParsedDocument> {
        let job_id = self.upload(filename, data).await?;
        tracing::info!(%job_id, filename, "parse job submitted");
        self.await_result(&job_id).await
    }

    /// Submit the document with the extraction instruction
    async fn upload(&self, filename: &str, data: Vec<u8>) -> Result<String> {
        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(filename.to_string()),
            )
            .text(
                "parsing_instruction",
                self.config.parsing_instruction.clone(),
            );

        let response = self
            .client
            .post(format!("{}/upload", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let upload: UploadResponse = response.json().await?;
        Ok(upload.id)
    }

    /// Bounded poll loop over the job status.
    ///
    /// Transient transport errors consume an attempt and retry; the final
    /// attempt's error propagates instead of masquerading as a timeout.
    async fn await_result(&self, job_id: &str) -> Result<ParsedDocument> {
        let max_attempts = self.config.max_poll_attempts;
        let interval = Duration::from_secs(self.config.poll_interval_secs);

        for attempt in 1..=max_attempts {
            match self.job_status(job_id).await {
                Ok(status) => {
                    tracing::debug!(%job_id, attempt, %status, "parse job status");
                    match status.as_str() {
                        "SUCCESS" => return self.fetch_result(job_id).await,
                        "ERROR" | "FAILED" => {
                            return Err(Error::ParseFailed {
                                job_id: job_id.to_string(),
                                status,
                            });
                        }
                        _ => {}
                    }
                }
                Err(e) if attempt == max_attempts => return Err(e),
                Err(e) => {
                    tracing::warn!(%job_id, attempt, error = %e, "parse status poll failed, retrying");
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(interval).await;
            }
        }

        Err(Error::ParseTimeout {
            job_id: job_id.to_string(),
            attempts: max_attempts,
        })
    }

    async fn job_status(&self, job_id: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/job/{}", self.config.base_url, job_id))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?
            .error_for_status()?;
        let status: JobStatusResponse = response.json().await?;
        Ok(status.status)
    }

    /// Fetch both result representations once the job succeeded
    async fn fetch_result(&self, job_id: &str) -> Result<ParsedDocument> {
        let json_body = self
            .client
            .get(format!(
                "{}/job/{}/result/json",
                self.config.base_url, job_id
            ))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let markdown_body = self
            .client
            .get(format!(
                "{}/job/{}/result/markdown",
                self.config.base_url, job_id
            ))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let markdown = unwrap_markdown(markdown_body);
        if markdown.trim().is_empty() {
            return Err(Error::extraction("parse service returned no text content"));
        }

        let pages = parse_page_breakdown(&json_body);
        if pages.is_empty() {
            tracing::warn!(%job_id, "no per-page breakdown in parse result, page attribution will be estimated");
        } else {
            tracing::info!(%job_id, pages = pages.len(), "parse result received");
        }

        Ok(ParsedDocument { markdown, pages })
    }
}

/// Accept either a bare markdown body or a `{"markdown": …}` envelope
fn unwrap_markdown(body: String) -> String {
    match serde_json::from_str::<MarkdownEnvelope>(&body) {
        Ok(envelope) => envelope.markdown,
        Err(_) => body,
    }
}

/// Extract the ordered page records from the JSON result, tolerating the
/// field-name variants the service emits (`page`/`page_number`, `text`/`md`).
/// An unparseable or page-less body degrades to no breakdown rather than
/// failing the document.
fn parse_page_breakdown(json_body: &str) -> Vec<PageRecord> {
    let result: JsonResult = match serde_json::from_str(json_body) {
        Ok(r) => r,
        Err(_) => return Vec::new(),
    };

    result
        .pages
        .into_iter()
        .map(|page| PageRecord {
            page_number: page.page.unwrap_or(1),
            text: page.text.or(page.md).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_envelope_is_unwrapped() {
        assert_eq!(
            unwrap_markdown(r##"{"markdown": "# Title"}"##.to_string()),
            "# Title"
        );
        assert_eq!(unwrap_markdown("# Raw body".to_string()), "# Raw body");
    }

    #[test]
    fn page_breakdown_tolerates_field_variants() {
        let body = r#"{"pages": [
            {"page": 1, "text": "first"},
            {"page_number": 2, "md": "second"},
            {"text": "unnumbered"}
        ]}"#;
        let pages = parse_page_breakdown(body);
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "first");
        assert_eq!(pages[1].page_number, 2);
        assert_eq!(pages[1].text, "second");
        assert_eq!(pages[2].page_number, 1);
    }

    #[test]
    fn missing_breakdown_degrades_to_empty() {
        assert!(parse_page_breakdown("not json at all").is_empty());
        assert!(parse_page_breakdown(r#"{"something": "else"}"#).is_empty());
    }
}
