use analysis_core::{AnalysisError, MarketDataProvider, StockSnapshot, TickerSymbol};
use std::sync::Arc;

/// Fetches metadata and six months of daily history for a resolved ticker.
pub struct MarketDataFetcher {
    provider: Arc<dyn MarketDataProvider>,
}

impl MarketDataFetcher {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Single attempt per call; provider failures come back as `FetchError`.
    pub async fn fetch(
        &self,
        company: &str,
        ticker: &TickerSymbol,
    ) -> Result<StockSnapshot, AnalysisError> {
        tracing::info!("Fetching market data for {} via {}", ticker, self.provider.provider_name());

        let metrics = self
            .provider
            .key_metrics(ticker)
            .await
            .map_err(|e| fetch_failed(ticker, e))?;

        let history = self
            .provider
            .price_history(ticker)
            .await
            .map_err(|e| fetch_failed(ticker, e))?;

        tracing::info!("Received {} daily bars for {}", history.len(), ticker);
        Ok(StockSnapshot::new(company, ticker.clone(), metrics, history))
    }
}

fn fetch_failed(ticker: &TickerSymbol, err: AnalysisError) -> AnalysisError {
    tracing::warn!("Market data fetch for {} failed: {}", ticker, err);
    err.into_fetch_error()
}
