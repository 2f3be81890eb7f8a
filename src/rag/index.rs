//! Flat vector index with an on-disk cache.
//!
//! The index directory is treated as a cache in the original spirit: if it
//! exists and its metadata matches, the persisted vectors are served as-is;
//! otherwise the corpus is chunked, embedded, and the directory rewritten.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chunk::{split_into_chunks, ChunkConfig, TextChunk};
use crate::errors::AppError;
use crate::ingest::Document;
use crate::llm::LlmProvider;

const INDEX_FILE: &str = "index.json";
const INDEX_VERSION: u32 = 1;
const EMBED_BATCH_SIZE: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexRow {
    chunk_id: String,
    chunk: TextChunk,
    embedding: Vec<f32>,
}

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    embed_model: String,
    chunking: ChunkConfig,
    rows: Vec<IndexRow>,
}

/// Result of a similarity search.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: TextChunk,
    /// Cosine similarity (higher = better).
    pub score: f32,
}

#[derive(Debug)]
pub struct VectorIndex {
    embed_model: String,
    chunking: ChunkConfig,
    rows: Vec<IndexRow>,
}

impl VectorIndex {
    /// Load the persisted index from `dir` if present and compatible,
    /// otherwise build it from `documents` and persist the result.
    pub async fn load_or_build(
        dir: &Path,
        documents: &[Document],
        provider: &dyn LlmProvider,
        embed_model: &str,
        chunking: ChunkConfig,
    ) -> Result<Self, AppError> {
        if dir.join(INDEX_FILE).exists() {
            match Self::load(dir) {
                Ok(index) if index.embed_model == embed_model => {
                    tracing::info!("loaded index from {} ({} chunks)", dir.display(), index.len());
                    return Ok(index);
                }
                Ok(index) => {
                    tracing::warn!(
                        "index at {} was built with embedding model '{}', rebuilding with '{}'",
                        dir.display(),
                        index.embed_model,
                        embed_model
                    );
                }
                Err(err) => {
                    tracing::warn!("failed to load index at {}: {}, rebuilding", dir.display(), err);
                }
            }
        } else {
            tracing::info!("building index at {}", dir.display());
        }

        let index = Self::build(documents, provider, embed_model, chunking).await?;
        index.persist(dir)?;
        Ok(index)
    }

    /// Chunk and embed the documents into a fresh index.
    pub async fn build(
        documents: &[Document],
        provider: &dyn LlmProvider,
        embed_model: &str,
        chunking: ChunkConfig,
    ) -> Result<Self, AppError> {
        let mut chunks = Vec::new();
        for doc in documents {
            chunks.extend(split_into_chunks(&chunking, &doc.text, &doc.source));
        }

        if chunks.is_empty() {
            return Err(AppError::Index(
                "no indexable text found in the provided sources".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_BATCH_SIZE) {
            let inputs: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
            let embeddings = provider.embed(&inputs, embed_model).await?;
            for (chunk, embedding) in batch.iter().zip(embeddings) {
                rows.push(IndexRow {
                    chunk_id: Uuid::new_v4().to_string(),
                    chunk: chunk.clone(),
                    embedding,
                });
            }
        }
        tracing::info!("embedded {} chunks with {}", rows.len(), embed_model);

        Ok(Self {
            embed_model: embed_model.to_string(),
            chunking,
            rows,
        })
    }

    pub fn load(dir: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(dir.join(INDEX_FILE))?;
        let file: IndexFile =
            serde_json::from_str(&raw).map_err(|e| AppError::Index(e.to_string()))?;

        if file.version != INDEX_VERSION {
            return Err(AppError::Index(format!(
                "unsupported index version {}",
                file.version
            )));
        }

        Ok(Self {
            embed_model: file.embed_model,
            chunking: file.chunking,
            rows: file.rows,
        })
    }

    pub fn persist(&self, dir: &Path) -> Result<(), AppError> {
        fs::create_dir_all(dir)?;
        let file = IndexFile {
            version: INDEX_VERSION,
            embed_model: self.embed_model.clone(),
            chunking: self.chunking.clone(),
            rows: self.rows.clone(),
        };
        let raw = serde_json::to_string(&file).map_err(AppError::internal)?;
        fs::write(dir.join(INDEX_FILE), raw)?;
        tracing::info!("persisted index to {}", dir.display());
        Ok(())
    }

    /// Top-k chunks by cosine similarity to the query embedding.
    pub fn search(&self, query_embedding: &[f32], limit: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = self
            .rows
            .iter()
            .map(|row| SearchHit {
                chunk: row.chunk.clone(),
                score: cosine_similarity(query_embedding, &row.embedding),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(limit);
        hits
    }

    pub fn embed_model(&self) -> &str {
        &self.embed_model
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| (*x as f64) * (*y as f64))
        .sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    ((dot / (norm_a * norm_b)).clamp(-1.0, 1.0)) as f32
}
