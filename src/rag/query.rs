//! Query engine over a built index: retrieve, cite, answer.

use std::sync::Arc;

use super::index::{SearchHit, VectorIndex};
use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};

const MAX_CONTEXT_CHARS: usize = 4000;

const ANSWER_INSTRUCTIONS: &str = "Answer the question using only the numbered context \
passages below. If the context does not contain the answer, say that the information \
is not available. Cite passage numbers where relevant.";

pub struct QueryEngine {
    index: Arc<VectorIndex>,
    provider: Arc<dyn LlmProvider>,
    chat_model: String,
    embed_model: String,
    top_k: usize,
}

impl QueryEngine {
    pub fn new(
        index: Arc<VectorIndex>,
        provider: Arc<dyn LlmProvider>,
        chat_model: String,
        embed_model: String,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            provider,
            chat_model,
            embed_model,
            top_k,
        }
    }

    /// Top-k chunks for the question.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>, AppError> {
        let embeddings = self
            .provider
            .embed(&[question.to_string()], &self.embed_model)
            .await?;
        let query_embedding = embeddings
            .first()
            .ok_or_else(|| AppError::Provider("embedding response was empty".to_string()))?;

        Ok(self.index.search(query_embedding, self.top_k))
    }

    /// Retrieve and answer from the retrieved context alone.
    pub async fn answer(&self, question: &str) -> Result<String, AppError> {
        let hits = self.retrieve(question).await?;
        let context = format_context(&hits);

        if context.is_empty() {
            return Ok("I do not have the required information.".to_string());
        }

        let messages = vec![
            ChatMessage::system(format!("{}\n\nContext:\n{}", ANSWER_INSTRUCTIONS, context)),
            ChatMessage::user(question),
        ];

        // Deterministic answers for grounded retrieval.
        self.provider
            .chat(ChatRequest::new(messages).with_temperature(0.0), &self.chat_model)
            .await
    }
}

/// Format hits into a numbered, cited context block, capped at
/// `MAX_CONTEXT_CHARS`.
pub fn format_context(hits: &[SearchHit]) -> String {
    let mut context = String::new();
    let mut current_length = 0;

    for (i, hit) in hits.iter().enumerate() {
        // Extra for the citation header.
        let addition_length = hit.chunk.text.len() + 50;
        if current_length + addition_length > MAX_CONTEXT_CHARS {
            break;
        }

        context.push_str(&format!(
            "[{}] (Source: {}, relevance: {:.2})\n{}\n\n",
            i + 1,
            hit.chunk.source,
            hit.score,
            hit.chunk.text
        ));
        current_length += addition_length;
    }

    context.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::chunk::TextChunk;

    fn make_hit(text: &str, source: &str, score: f32) -> SearchHit {
        SearchHit {
            chunk: TextChunk {
                text: text.to_string(),
                source: source.to_string(),
                chunk_index: 0,
            },
            score,
        }
    }

    #[test]
    fn context_is_numbered_and_cited() {
        let hits = vec![
            make_hit("First passage.", "doc1.txt", 0.91),
            make_hit("Second passage.", "doc2.txt", 0.72),
        ];

        let context = format_context(&hits);
        assert!(context.starts_with("[1] (Source: doc1.txt"));
        assert!(context.contains("[2] (Source: doc2.txt"));
        assert!(context.contains("First passage."));
    }

    #[test]
    fn context_respects_length_cap() {
        let big = "x".repeat(MAX_CONTEXT_CHARS);
        let hits = vec![
            make_hit(&big, "doc1", 0.9),
            make_hit("should not fit", "doc2", 0.8),
        ];

        let context = format_context(&hits);
        assert!(!context.contains("should not fit"));
    }

    #[test]
    fn empty_hits_give_empty_context() {
        assert!(format_context(&[]).is_empty());
    }
}
