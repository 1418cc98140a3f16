use std::sync::Arc;

use crate::dataset::Dataset;
use crate::llm::ChatModel;
use crate::retrieval::ContextRetriever;

/// Everything a request handler needs, built once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<Dataset>,
    pub retriever: Arc<ContextRetriever>,
    /// `None` when no API key is configured.
    pub llm: Option<Arc<dyn ChatModel>>,
}

impl AppState {
    pub fn new(data: Dataset, llm: Option<Arc<dyn ChatModel>>) -> Self {
        let data = Arc::new(data);
        let retriever = Arc::new(ContextRetriever::new(data.clone()));
        Self {
            data,
            retriever,
            llm,
        }
    }
}
