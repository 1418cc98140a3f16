mod chat;
mod config;
mod dataset;
mod llm;
mod prompts;
mod retrieval;
mod server;
mod state;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::ServerConfig;
use dataset::Dataset;
use llm::{ChatModel, LlmClient};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = ServerConfig::from_env()?;

    info!("Starting LegalBot server...");

    // Load dataset
    let data = Dataset::load(&config.data_dir);
    info!(
        data_dir = %config.data_dir.display(),
        data_loaded = data.data_loaded(),
        constitution_loaded = data.constitution_loaded(),
        "Dataset loaded"
    );

    // Init LLM client
    let llm: Option<Arc<dyn ChatModel>> = match &config.groq_api_key {
        Some(key) => {
            info!(base_url = %config.llm_base_url, model = llm::MODEL, "LLM client initialized");
            let client: Arc<dyn ChatModel> = Arc::new(LlmClient::new(&config.llm_base_url, key)?);
            Some(client)
        }
        None => {
            warn!("GROQ_API_KEY not set; chat requests will report a configuration error");
            None
        }
    };

    let state = AppState::new(data, llm);
    server::serve(&config, state).await
}
