//! Tools the agent can call.

mod knowledge;
mod note;

pub use knowledge::KnowledgeTool;
pub use note::NoteTool;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::AppError;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// One-line description advertised to the model.
    fn description(&self) -> &str;

    async fn call(&self, args: &Value) -> Result<String, AppError>;
}

/// Dispatch a tool call by name.
pub async fn execute_tool(
    tools: &[Arc<dyn Tool>],
    tool_name: &str,
    args: &Value,
) -> Result<String, AppError> {
    for tool in tools {
        if tool.name() == tool_name {
            return tool.call(args).await;
        }
    }
    Err(AppError::BadRequest(format!("Unknown tool: {}", tool_name)))
}

/// Pull a string argument out of loosely-structured tool args. Models vary
/// in the key they pick, so a few synonyms are accepted, and a bare string
/// is taken as-is.
pub(crate) fn extract_string_arg(args: &Value, keys: &[&str]) -> Option<String> {
    if let Some(s) = args.as_str() {
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            return Some(trimmed.to_string());
        }
        return None;
    }

    for key in keys {
        if let Some(s) = args.get(*key).and_then(|v| v.as_str()) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_from_synonym_keys() {
        let args = json!({"input": "hello"});
        assert_eq!(
            extract_string_arg(&args, &["note", "input"]),
            Some("hello".to_string())
        );
    }

    #[test]
    fn extracts_bare_string() {
        let args = json!("  spaced  ");
        assert_eq!(
            extract_string_arg(&args, &["note"]),
            Some("spaced".to_string())
        );
    }

    #[test]
    fn missing_or_blank_yields_none() {
        assert_eq!(extract_string_arg(&json!({}), &["note"]), None);
        assert_eq!(extract_string_arg(&json!({"note": "  "}), &["note"]), None);
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let tools: Vec<Arc<dyn Tool>> = Vec::new();
        let err = execute_tool(&tools, "nope", &json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
