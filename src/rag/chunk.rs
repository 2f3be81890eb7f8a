//! Text chunking for the vector index.
//!
//! Documents are split into fixed-size overlapping character windows,
//! trimmed back to a sentence boundary where one falls near the end.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks
    pub chunk_overlap: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// A text chunk with source attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextChunk {
    pub text: String,
    pub source: String,
    pub chunk_index: usize,
}

/// Split text into overlapping chunks.
pub fn split_into_chunks(config: &ChunkConfig, text: &str, source: &str) -> Vec<TextChunk> {
    let chunk_size = config.chunk_size;
    let step = chunk_size.saturating_sub(config.chunk_overlap).max(1);

    let chars: Vec<char> = text.chars().collect();
    let total_chars = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut chunk_index = 0;

    while start < total_chars {
        let end = (start + chunk_size).min(total_chars);
        let window: String = chars[start..end].iter().collect();

        let final_text = if end < total_chars {
            trim_to_sentence_boundary(&window)
        } else {
            window
        };

        let trimmed = final_text.trim();
        if !trimmed.is_empty() {
            chunks.push(TextChunk {
                text: trimmed.to_string(),
                source: source.to_string(),
                chunk_index,
            });
            chunk_index += 1;
        }

        start += step;
    }

    chunks
}

/// Cut the window back to the last sentence ending in its final 20%, when
/// one exists.
fn trim_to_sentence_boundary(text: &str) -> String {
    let sentence_endings = [". ", "! ", "? ", ".\n", "!\n", "?\n"];

    let mut search_start = (text.len() * 80) / 100;
    while search_start > 0 && !text.is_char_boundary(search_start) {
        search_start -= 1;
    }
    let search_text = &text[search_start..];

    for ending in sentence_endings.iter() {
        if let Some(pos) = search_text.rfind(ending) {
            let cut_pos = search_start + pos + ending.len();
            return text[..cut_pos].to_string();
        }
    }

    text.to_string()
}
