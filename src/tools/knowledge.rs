use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::{extract_string_arg, Tool};
use crate::errors::AppError;
use crate::rag::QueryEngine;

/// Answers questions from the indexed knowledge base via the query engine.
pub struct KnowledgeTool {
    engine: Arc<QueryEngine>,
}

impl KnowledgeTool {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for KnowledgeTool {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> &str {
        "this gives detailed information from the user's indexed documents"
    }

    async fn call(&self, args: &Value) -> Result<String, AppError> {
        let question = extract_string_arg(args, &["query", "question", "input"])
            .ok_or_else(|| AppError::BadRequest("query missing".to_string()))?;

        self.engine.answer(&question).await
    }
}
