//! Prompt assembly for answer generation

use crate::retrieval::RetrievedChunk;

/// Builds the context block and the grounded-answer prompt
pub struct PromptBuilder;

impl PromptBuilder {
    /// Concatenate chunk texts, each prefixed with its page number and
    /// content-type markers, separated by rules.
    pub fn build_context(chunks: &[RetrievedChunk]) -> String {
        chunks
            .iter()
            .map(|chunk| {
                let mut prefix = match chunk.page {
                    Some(page) => format!("[Page {}", page),
                    None => "[Page ?".to_string(),
                };
                if chunk.has_table {
                    prefix.push_str(" - TABLE DATA");
                }
                if chunk.has_image {
                    prefix.push_str(" - IMAGE/VISUAL");
                }
                prefix.push_str("]: ");

                format!("{}{}", prefix, chunk.text)
            })
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }

    /// Build the full answer prompt over an assembled context block
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are analyzing content from a parsed document. The content may include regular text, markdown tables, and image/chart descriptions.

DOCUMENT CONTENT:
{context}

QUESTION: {question}

INSTRUCTIONS:
- Answer clearly and directly based ONLY on the provided content
- When you see "TABLE DATA", interpret it as structured data in markdown table format
- When you see "IMAGE/VISUAL", treat it as a description of visual content (charts, diagrams, images)
- For table data: analyze rows and columns, provide insights about the data
- For images: reference the visual descriptions provided
- Always mention the page number when citing information
- If the content includes tables, you can summarize or extract specific values
- If the content includes image descriptions, explain what the visual shows
- If you cannot fully answer, explain what information is missing

ANSWER:"#
        )
    }
}
