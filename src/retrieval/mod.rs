pub mod matcher;

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::dataset::Dataset;

/// How many headings are kept as matches.
pub const MAX_MATCHES: usize = 3;
/// Minimum similarity for a heading to count as a match.
pub const MATCH_CUTOFF: f64 = 0.3;
/// How many content rows go into the context blob.
pub const EXCERPT_ROWS: usize = 3;

/// Outcome of a context lookup. Every variant renders to usable prompt text.
#[derive(Debug, Clone, PartialEq)]
pub enum Retrieval {
    /// One of the tables is empty.
    Unavailable,
    Matched {
        heading: String,
        excerpts: Vec<String>,
    },
    NoMatch {
        query: String,
    },
    Failed(String),
}

impl fmt::Display for Retrieval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Retrieval::Unavailable => {
                f.write_str("Constitutional database not available - using general knowledge.")
            }
            Retrieval::Matched { heading, excerpts } => write!(
                f,
                "Relevant constitutional context for {}:\n\n{}",
                heading,
                excerpts.join("\n\n")
            ),
            Retrieval::NoMatch { query } => write!(
                f,
                "No specific constitutional match found for '{}'. Using general constitutional knowledge.",
                query
            ),
            Retrieval::Failed(message) => write!(f, "Error retrieving legal data: {}", message),
        }
    }
}

/// Fuzzy heading lookup over the loaded dataset.
pub struct ContextRetriever {
    data: Arc<Dataset>,
}

impl ContextRetriever {
    pub fn new(data: Arc<Dataset>) -> Self {
        Self { data }
    }

    /// Look up context for `query`. Failures come back as [`Retrieval::Failed`].
    pub fn retrieve(&self, query: &str) -> Retrieval {
        info!(query, "Searching constitutional headings");
        match self.try_retrieve(query) {
            Ok(found) => found,
            Err(e) => {
                warn!("Error in context retrieval: {:#}", e);
                Retrieval::Failed(format!("{:#}", e))
            }
        }
    }

    /// Rendered context blob for the prompt.
    pub fn context_for(&self, query: &str) -> String {
        self.retrieve(query).to_string()
    }

    fn try_retrieve(&self, query: &str) -> Result<Retrieval> {
        if self.data.headings.is_empty() || self.data.content.is_empty() {
            return Ok(Retrieval::Unavailable);
        }

        let candidates = self.data.headings.headings();
        let sample = &candidates[..candidates.len().min(5)];
        debug!(candidates = candidates.len(), ?sample, "Available headings");

        let matches = matcher::close_matches(query, &candidates, MAX_MATCHES, MATCH_CUTOFF);
        let names: Vec<&str> = matches.iter().map(|m| m.text).collect();
        info!(matches = ?names, "Heading matches");

        let Some(best) = matches.first() else {
            return Ok(Retrieval::NoMatch {
                query: query.to_string(),
            });
        };

        debug!(heading = best.text, score = best.score, "Best heading match");

        // The content rows are not tied to the matched heading; the blob is
        // always the leading rows of the constitution table.
        let excerpts = self
            .data
            .content
            .head(EXCERPT_ROWS)
            .map(|(row, bytes)| {
                std::str::from_utf8(bytes)
                    .map(str::to_string)
                    .with_context(|| format!("content row {} is not valid UTF-8", row + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Retrieval::Matched {
            heading: best.text.to_string(),
            excerpts,
        })
    }
}
