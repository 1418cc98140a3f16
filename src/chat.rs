use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::prompts::build_prompt;
use crate::state::AppState;

pub const INVALID_QUESTION: &str = "Please enter a valid question.";
pub const CONFIG_ERROR: &str = "Service configuration error. Please check API key.";
pub const UPSTREAM_APOLOGY: &str =
    "I'm experiencing technical difficulties. Please try again in a moment.";

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Why a chat request ended without a model answer.
#[derive(Debug)]
pub enum Rejection {
    EmptyMessage,
    Unconfigured,
    Upstream(anyhow::Error),
}

impl Rejection {
    /// The text shown to the user in place of an answer.
    pub fn reply(&self) -> &'static str {
        match self {
            Rejection::EmptyMessage => INVALID_QUESTION,
            Rejection::Unconfigured => CONFIG_ERROR,
            Rejection::Upstream(_) => UPSTREAM_APOLOGY,
        }
    }
}

/// Answer one question. Always produces text for the response body.
pub async fn answer(state: &AppState, message: Option<&str>) -> String {
    match respond(state, message).await {
        Ok(text) => text,
        Err(rejection) => {
            match &rejection {
                Rejection::EmptyMessage => debug!("Rejected empty message"),
                Rejection::Unconfigured => error!("GROQ_API_KEY not found in environment"),
                Rejection::Upstream(e) => error!("Error calling LLM API: {:#}", e),
            }
            rejection.reply().to_string()
        }
    }
}

async fn respond(state: &AppState, message: Option<&str>) -> Result<String, Rejection> {
    let question = message
        .filter(|m| !m.is_empty())
        .ok_or(Rejection::EmptyMessage)?;
    info!(question, "Received question");

    let context = state.retriever.context_for(question);
    debug!(context_len = context.len(), "Context retrieved");

    let llm = state.llm.as_ref().ok_or(Rejection::Unconfigured)?;
    let prompt = build_prompt(question, &context);

    info!("Sending request to LLM API");
    let text = llm.complete(&prompt).await.map_err(Rejection::Upstream)?;
    info!(answer_len = text.len(), "Received LLM response");

    Ok(text)
}
