//! Answer generation: prompt assembly, the LLM call, and citation reconciliation

pub mod citation;
pub mod prompt;

pub use citation::cited_pages;
pub use prompt::PromptBuilder;

use std::sync::Arc;

use crate::error::Result;
use crate::providers::llm::LlmProvider;
use crate::retrieval::RetrievedChunk;
use crate::types::QueryResponse;

/// Turns retrieved context into a generated, citation-backed answer
pub struct AnswerEngine {
    llm: Arc<dyn LlmProvider>,
}

impl AnswerEngine {
    /// Create an engine over a generator
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Generate an answer for `question` from the retrieved context.
    ///
    /// With no context the short-circuit response goes out without an LLM
    /// call. Citations come from the supplied chunks' metadata, independent of
    /// whether the generated text mentions those pages.
    pub async fn answer(
        &self,
        question: &str,
        context_chunks: &[RetrievedChunk],
    ) -> Result<QueryResponse> {
        if context_chunks.is_empty() {
            return Ok(QueryResponse::no_context());
        }

        let contained_tables = context_chunks.iter().any(|c| c.has_table);
        let contained_images = context_chunks.iter().any(|c| c.has_image);

        let context = PromptBuilder::build_context(context_chunks);
        let prompt = PromptBuilder::build_answer_prompt(question, &context);

        tracing::info!(
            model = self.llm.model(),
            chunks = context_chunks.len(),
            contained_tables,
            contained_images,
            "generating answer"
        );
        let answer = self.llm.generate(&prompt).await?;

        let citations = cited_pages(context_chunks);
        tracing::debug!(?citations, "citations resolved");

        // Rough estimate at ~4 characters per token
        let tokens_used = ((prompt.len() + answer.len()) / 4) as u64;

        Ok(QueryResponse {
            answer,
            citations,
            sources_used: context_chunks.len(),
            contained_tables,
            contained_images,
            tokens_used,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentKind;
    use async_trait::async_trait;

    struct CannedLlm;

    #[async_trait]
    impl LlmProvider for CannedLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok("The table on page 2 shows growth.".to_string())
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            "canned-1"
        }
    }

    fn chunk(page: u32, has_table: bool) -> RetrievedChunk {
        RetrievedChunk {
            chunk_id: format!("chunk_t_{page}"),
            filename: "doc.pdf".to_string(),
            text: "body".to_string(),
            page: Some(page),
            content_kind: if has_table {
                SegmentKind::Table
            } else {
                SegmentKind::Text
            },
            has_table,
            has_image: false,
            similarity: 0.7,
        }
    }

    #[tokio::test]
    async fn empty_context_short_circuits() {
        let engine = AnswerEngine::new(Arc::new(CannedLlm));
        let response = engine.answer("anything?", &[]).await.unwrap();
        assert!(response.citations.is_empty());
        assert_eq!(response.sources_used, 0);
        assert!(response.answer.contains("couldn't find"));
    }

    #[tokio::test]
    async fn citations_come_from_context_pages() {
        let engine = AnswerEngine::new(Arc::new(CannedLlm));
        let context = vec![chunk(3, false), chunk(1, true), chunk(3, false)];
        let response = engine.answer("what grew?", &context).await.unwrap();

        assert_eq!(response.citations, vec![1, 3]);
        assert_eq!(response.sources_used, 3);
        assert!(response.contained_tables);
        assert!(!response.contained_images);
        assert!(response.tokens_used > 0);
    }
}
