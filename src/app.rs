//! Shared bootstrap for the chat surfaces.

use std::sync::Arc;

use crate::agent::{Agent, BASE_CONTEXT};
use crate::config::{AppPaths, Settings};
use crate::errors::AppError;
use crate::ingest::{self, Document};
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::rag::{ChunkConfig, QueryEngine, VectorIndex};
use crate::tools::{KnowledgeTool, NoteTool, Tool};

pub struct App {
    pub paths: AppPaths,
    pub settings: Settings,
    pub provider: Arc<dyn LlmProvider>,
}

impl App {
    pub fn initialize(paths: AppPaths) -> Result<Self, AppError> {
        let settings = Settings::from_env()?;
        let provider = Arc::new(OpenAiProvider::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
        ));

        Ok(Self {
            paths,
            settings,
            provider,
        })
    }

    /// Warn-only reachability probe before entering a chat loop.
    pub async fn check_provider(&self) {
        match self.provider.health_check().await {
            Ok(true) => tracing::info!("provider {} reachable", self.provider.name()),
            Ok(false) => tracing::warn!(
                "provider {} is not reachable; queries will fail until it is",
                self.provider.name()
            ),
            Err(err) => tracing::warn!("provider health check failed: {}", err),
        }
    }

    /// Resolve user-entered sources into documents.
    pub async fn load_sources(&self, sources: &[String]) -> Result<Vec<Document>, AppError> {
        ingest::load_sources(&self.paths, sources).await
    }

    /// Documents already sitting in the data directory.
    pub fn load_data_dir(&self) -> Result<Vec<Document>, AppError> {
        ingest::read_directory(&self.paths.data_dir)
    }

    /// Build (or load from cache) the index and wire up the agent with the
    /// note and knowledge-base tools.
    pub async fn build_agent(&self, documents: &[Document]) -> Result<Agent, AppError> {
        let index = VectorIndex::load_or_build(
            &self.paths.index_dir,
            documents,
            self.provider.as_ref(),
            &self.settings.embed_model,
            ChunkConfig::default(),
        )
        .await?;

        let engine = Arc::new(QueryEngine::new(
            Arc::new(index),
            self.provider.clone(),
            self.settings.chat_model.clone(),
            self.settings.embed_model.clone(),
            self.settings.top_k,
        ));

        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(NoteTool::new(self.paths.notes_path.clone())),
            Arc::new(KnowledgeTool::new(engine)),
        ];

        Ok(Agent::new(
            self.provider.clone(),
            tools,
            BASE_CONTEXT.to_string(),
            self.settings.chat_model.clone(),
            self.settings.token_limit,
            self.settings.max_steps,
        ))
    }
}
