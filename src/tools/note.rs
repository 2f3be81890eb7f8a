use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use super::{extract_string_arg, Tool};
use crate::errors::AppError;

/// Appends text notes to a plain-text file, one per line. The file is
/// created on first use and only ever appended to.
pub struct NoteTool {
    notes_path: PathBuf,
}

impl NoteTool {
    pub fn new(notes_path: PathBuf) -> Self {
        Self { notes_path }
    }
}

#[async_trait]
impl Tool for NoteTool {
    fn name(&self) -> &str {
        "note_saver"
    }

    fn description(&self) -> &str {
        "this tool can save a text based note to a file for the user"
    }

    async fn call(&self, args: &Value) -> Result<String, AppError> {
        let note = extract_string_arg(args, &["note", "text", "content", "input"])
            .ok_or_else(|| AppError::BadRequest("note text missing".to_string()))?;

        if let Some(parent) = self.notes_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.notes_path)?;
        writeln!(file, "{}", note)?;

        tracing::info!("saved note to {}", self.notes_path.display());
        Ok("note saved".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn notes_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        let tool = NoteTool::new(path.clone());

        let reply = tool.call(&json!({"note": "first"})).await.unwrap();
        assert_eq!(reply, "note saved");
        tool.call(&json!({"note": "second"})).await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[tokio::test]
    async fn creates_missing_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.txt");
        let tool = NoteTool::new(path.clone());

        tool.call(&json!({"note": "hello"})).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn empty_note_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = NoteTool::new(dir.path().join("notes.txt"));

        let err = tool.call(&json!({})).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
