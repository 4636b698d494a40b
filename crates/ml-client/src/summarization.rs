use analysis_core::SummaryParams;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::error::{MLError, MLResult};

#[derive(Debug, Clone, Serialize)]
pub struct SummarizationRequest<'a> {
    pub inputs: &'a str,
    pub parameters: &'a SummaryParams,
}

#[derive(Debug, Clone, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

/// Client for a hosted text-summarization model (Hugging Face inference API).
#[derive(Clone)]
pub struct SummarizationClient {
    client: reqwest::Client,
    model_url: String,
    api_token: Option<String>,
}

impl SummarizationClient {
    pub fn new(model_url: String, api_token: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            model_url,
            api_token,
        }
    }

    pub fn model_url(&self) -> &str {
        &self.model_url
    }

    /// Summarize `text` with the given length bounds.
    pub async fn summarize(&self, text: &str, params: &SummaryParams) -> MLResult<String> {
        let request = SummarizationRequest {
            inputs: text,
            parameters: params,
        };

        tracing::debug!(
            "POST {} ({} chars, min_length={}, max_length={})",
            self.model_url,
            text.len(),
            params.min_length,
            params.max_length
        );

        let mut builder = self.client.post(&self.model_url).json(&request);
        if let Some(token) = &self.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(MLError::from_request)?;
        let status = response.status();
        let body = response.text().await.map_err(MLError::from_request)?;

        let json: Value = match serde_json::from_str(&body) {
            Ok(json) => json,
            Err(_) if !status.is_success() => {
                return Err(MLError::ServiceUnavailable(format!("Status: {}", status)))
            }
            Err(e) => return Err(MLError::Serialization(e)),
        };

        parse_response(json)
    }
}

/// Interpret an inference response: `[{"summary_text": ...}]` or `{"error": ...}`.
pub fn parse_response(json: Value) -> MLResult<String> {
    if let Some(message) = json.get("error") {
        let message = message
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| message.to_string());

        // Cold models answer 503 with an estimated load time
        return Err(if json.get("estimated_time").is_some() {
            MLError::ModelNotLoaded(message)
        } else {
            MLError::ServiceUnavailable(message)
        });
    }

    let outputs: Vec<SummaryOutput> = serde_json::from_value(json)?;
    outputs
        .into_iter()
        .next()
        .map(|o| o.summary_text.trim().to_string())
        .ok_or_else(|| MLError::InvalidResponse("empty summarization output".to_string()))
}
