use analysis_core::{AnalysisError, SummaryParams, Summarizer};
use async_trait::async_trait;

use crate::SummarizationClient;

/// HTTP-backed summarizer that delegates to `SummarizationClient`.
pub struct HttpSummarizer {
    client: SummarizationClient,
}

impl HttpSummarizer {
    pub fn new(client: SummarizationClient) -> Self {
        Self { client }
    }
}

impl From<SummarizationClient> for HttpSummarizer {
    fn from(client: SummarizationClient) -> Self {
        Self::new(client)
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, AnalysisError> {
        self.client.summarize(text, params).await.map_err(|e| {
            tracing::warn!("Summarization via {} failed: {}", self.client.model_url(), e);
            AnalysisError::from(e)
        })
    }

    fn backend_name(&self) -> &'static str {
        "http"
    }
}
