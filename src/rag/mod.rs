//! Retrieval over the ingested corpus.
//!
//! This module provides:
//! - `chunk`: overlapping character chunking
//! - `VectorIndex`: a flat embedded index persisted as a cache directory
//! - `QueryEngine`: retrieve + cited context + grounded answer

pub mod chunk;
mod index;
mod query;

pub use chunk::{ChunkConfig, TextChunk};
pub use index::{SearchHit, VectorIndex};
pub use query::QueryEngine;
