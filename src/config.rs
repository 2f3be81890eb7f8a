use std::env;
use std::fs;
use std::path::PathBuf;

use crate::errors::AppError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-4";
const DEFAULT_EMBED_MODEL: &str = "text-embedding-3-small";
const DEFAULT_TOKEN_LIMIT: usize = 2048;
const DEFAULT_TOP_K: usize = 5;
const DEFAULT_MAX_STEPS: usize = 6;

/// Filesystem layout for a run: the document corpus, the persisted index,
/// the notes file, and logs all live under one data directory.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
    pub notes_path: PathBuf,
    pub log_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        Self::with_data_dir(discover_data_dir())
    }

    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        let index_dir = env::var("CARDIOBOT_INDEX_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("knowledge_base"));
        let notes_path = data_dir.join("notes.txt");
        let log_dir = data_dir.join("logs");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }

        AppPaths {
            data_dir,
            index_dir,
            notes_path,
            log_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("CARDIOBOT_DATA_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("data")
}

/// Runtime settings resolved from the environment. A `.env` file in the
/// working directory is honored before lookup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embed_model: String,
    pub token_limit: usize,
    pub top_k: usize,
    pub max_steps: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| AppError::Config("OPENAI_API_KEY is not set".to_string()))?;

        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let chat_model =
            env::var("CARDIOBOT_CHAT_MODEL").unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let embed_model =
            env::var("CARDIOBOT_EMBED_MODEL").unwrap_or_else(|_| DEFAULT_EMBED_MODEL.to_string());

        let token_limit = parse_env("CARDIOBOT_TOKEN_LIMIT", DEFAULT_TOKEN_LIMIT);
        let top_k = parse_env("CARDIOBOT_TOP_K", DEFAULT_TOP_K);
        let max_steps = parse_env("CARDIOBOT_MAX_STEPS", DEFAULT_MAX_STEPS);

        Ok(Settings {
            api_key,
            base_url,
            chat_model,
            embed_model,
            token_limit,
            top_k,
            max_steps,
        })
    }
}

fn parse_env(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_derive_from_data_dir() {
        let paths = AppPaths::with_data_dir(PathBuf::from("/tmp/cardiobot-test-paths"));
        assert_eq!(
            paths.notes_path,
            PathBuf::from("/tmp/cardiobot-test-paths/notes.txt")
        );
        assert_eq!(
            paths.log_dir,
            PathBuf::from("/tmp/cardiobot-test-paths/logs")
        );
        assert!(paths
            .index_dir
            .starts_with("/tmp/cardiobot-test-paths"));
    }

    #[test]
    fn parse_env_falls_back_on_garbage() {
        env::set_var("CARDIOBOT_TEST_NUM", "not-a-number");
        assert_eq!(parse_env("CARDIOBOT_TEST_NUM", 7), 7);
        env::set_var("CARDIOBOT_TEST_NUM", "12");
        assert_eq!(parse_env("CARDIOBOT_TEST_NUM", 7), 12);
        env::remove_var("CARDIOBOT_TEST_NUM");
    }
}
