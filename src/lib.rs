//! CardioBot: a document-grounded chatbot.
//!
//! Two surfaces share one core: a terminal loop (`chat`) and a full-screen
//! chat window (`tui`). User-supplied documents and URLs are chunked,
//! embedded through an OpenAI-compatible API, and indexed into a persisted
//! vector cache; questions run through a tool-calling agent that answers
//! only from that corpus.

pub mod agent;
pub mod app;
pub mod chat;
pub mod config;
pub mod errors;
pub mod ingest;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod rag;
pub mod tools;
pub mod tui;
