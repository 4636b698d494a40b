use async_trait::async_trait;
use crate::{AnalysisError, Bar, KeyMetrics, SearchHit, SummaryParams, TickerSymbol};

/// Source of company metadata and daily price history
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn key_metrics(&self, ticker: &TickerSymbol) -> Result<KeyMetrics, AnalysisError>;

    /// Daily bars covering the trailing six months, oldest first.
    async fn price_history(&self, ticker: &TickerSymbol) -> Result<Vec<Bar>, AnalysisError>;

    fn provider_name(&self) -> &'static str;
}

/// Free-text web/news search
#[async_trait]
pub trait NewsSearchProvider: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AnalysisError>;

    fn provider_name(&self) -> &'static str;
}

/// Abstractive text summarization
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, params: &SummaryParams) -> Result<String, AnalysisError>;

    fn backend_name(&self) -> &'static str;
}
