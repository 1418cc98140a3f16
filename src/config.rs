use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::llm::DEFAULT_BASE_URL;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Local front-end origins allowed to call the API from a browser.
pub const ALLOWED_ORIGINS: &[&str] = &["http://127.0.0.1:5500", "http://localhost:5500"];

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub llm_base_url: String,
    pub groq_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            groq_api_key: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let port = match var("PORT").filter(|p| !p.trim().is_empty()) {
            Some(p) => p
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT: {}", p))?,
            None => defaults.port,
        };

        Ok(Self {
            host: var("HOST").unwrap_or(defaults.host),
            port,
            data_dir: var("LEGALBOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            llm_base_url: var("GROQ_BASE_URL").unwrap_or(defaults.llm_base_url),
            groq_api_key: var("GROQ_API_KEY").filter(|k| !k.is_empty()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
