use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::AnalysisError;

/// Short exchange-assigned code, always stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickerSymbol(String);

impl TickerSymbol {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TickerSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// OHLCV bar data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Key metrics shown in the stock overview table.
///
/// Every figure is optional: providers routinely omit fields (no dividend,
/// negative earnings, delisted instruments).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub long_name: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<f64>,
    pub trailing_pe: Option<f64>,
    /// Fraction, e.g. `0.0044` for 0.44%.
    pub dividend_yield: Option<f64>,
    pub total_revenue: Option<f64>,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
}

/// Metadata plus trailing price history for one company, fetched once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    company: String,
    ticker: TickerSymbol,
    metrics: KeyMetrics,
    history: Vec<Bar>,
}

impl StockSnapshot {
    pub fn new(
        company: impl Into<String>,
        ticker: TickerSymbol,
        metrics: KeyMetrics,
        history: Vec<Bar>,
    ) -> Self {
        Self {
            company: company.into(),
            ticker,
            metrics,
            history,
        }
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn ticker(&self) -> &TickerSymbol {
        &self.ticker
    }

    pub fn metrics(&self) -> &KeyMetrics {
        &self.metrics
    }

    pub fn history(&self) -> &[Bar] {
        &self.history
    }
}

/// News article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
}

/// Raw result returned by a search provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub body: Option<String>,
}

impl SearchHit {
    /// Body text exactly as the provider returned it, if non-empty.
    pub fn text(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

impl From<&SearchHit> for NewsArticle {
    fn from(hit: &SearchHit) -> Self {
        Self {
            title: hit.title.clone(),
            url: hit.url.clone(),
        }
    }
}

/// Recent articles for a company plus one abstractive summary of their text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsBundle {
    pub articles: Vec<NewsArticle>,
    pub summary: String,
}

/// Generation settings passed to the summarization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryParams {
    pub min_length: u32,
    pub max_length: u32,
    pub do_sample: bool,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            min_length: 30,
            max_length: 100,
            do_sample: false,
        }
    }
}

/// Outcome of one analysis run: exactly one success-or-error per sub-fetch.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub company: String,
    pub stock: Result<StockSnapshot, AnalysisError>,
    pub news: Result<NewsBundle, AnalysisError>,
}

impl AnalysisResult {
    pub fn is_complete(&self) -> bool {
        self.stock.is_ok() && self.news.is_ok()
    }
}
