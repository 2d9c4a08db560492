use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_BASE_URL};

pub const DEFAULT_OUTPUT_DIR: &str = "parsed_outputs";

/// Process configuration loaded from environment variables.
/// Fails at startup if the API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub output_dir: PathBuf,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            output_dir: std::env::var("PARSED_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Settings for every model call of one run.
    pub fn llm_settings(&self, model: &str) -> LlmSettings {
        LlmSettings::new(self.openai_api_key.clone(), model.to_string())
            .with_base_url(&self.openai_base_url)
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
