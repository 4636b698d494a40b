pub mod error;
pub mod provider;
pub mod summarization;

pub use error::{MLError, MLResult};
pub use provider::HttpSummarizer;
pub use summarization::SummarizationClient;

use std::time::Duration;

pub const DEFAULT_SUMMARIZATION_URL: &str =
    "https://router.huggingface.co/hf-inference/models/facebook/bart-large-cnn";

/// Configuration for the summarization service
#[derive(Debug, Clone)]
pub struct MLConfig {
    pub summarization_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl Default for MLConfig {
    fn default() -> Self {
        Self {
            summarization_url: std::env::var("SUMMARIZATION_MODEL_URL")
                .unwrap_or_else(|_| DEFAULT_SUMMARIZATION_URL.to_string()),
            api_token: std::env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
            timeout: Duration::from_secs(30),
        }
    }
}

impl MLConfig {
    pub fn summarizer(&self) -> HttpSummarizer {
        HttpSummarizer::new(SummarizationClient::new(
            self.summarization_url.clone(),
            self.api_token.clone(),
            self.timeout,
        ))
    }
}
