//! Yahoo Finance market-data client.
//!
//! Metadata comes from the `quoteSummary` endpoint, which requires a session
//! cookie and a matching crumb token; price history comes from the public
//! `chart` endpoint. Each call is a single attempt.

use analysis_core::{AnalysisError, Bar, KeyMetrics, MarketDataProvider, TickerSymbol};
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tokio::sync::Mutex;

const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const CHART_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

const SUMMARY_MODULES: &str = "price,summaryDetail,financialData";
const HISTORY_RANGE: &str = "6mo";
const HISTORY_INTERVAL: &str = "1d";

pub struct YahooFinanceClient {
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinanceClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            crumb: Mutex::new(None),
        }
    }

    /// Obtain the session cookie and crumb, reusing them for the client's lifetime.
    async fn crumb(&self) -> Result<String, AnalysisError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        // fc.yahoo.com answers 404 but still sets the session cookie
        self.client
            .get(COOKIE_URL)
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(format!("failed to fetch Yahoo cookie: {}", e)))?;

        let response = self
            .client
            .get(CRUMB_URL)
            .header("Referer", "https://finance.yahoo.com/")
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(format!("failed to fetch Yahoo crumb: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;
        let crumb = body.trim();

        if !status.is_success() || crumb.is_empty() || crumb.len() > 64 || crumb.contains('<') {
            return Err(AnalysisError::ApiError(format!(
                "Yahoo crumb unavailable (HTTP {})",
                status
            )));
        }

        *cached = Some(crumb.to_string());
        Ok(crumb.to_string())
    }

    async fn get_json(&self, request: reqwest::RequestBuilder) -> Result<Value, AnalysisError> {
        let response = request
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let json: Option<Value> = serde_json::from_str(&body).ok();
        if !status.is_success() {
            // Yahoo reports unknown symbols as 404 with a JSON error body
            let detail = json
                .as_ref()
                .and_then(provider_error)
                .unwrap_or_else(|| format!("HTTP {}", status));
            return Err(AnalysisError::ApiError(detail));
        }

        json.ok_or_else(|| AnalysisError::InvalidData("response is not valid JSON".to_string()))
    }

    /// Get key metrics (market cap, P/E, dividend yield, revenue, 52-week range)
    pub async fn get_key_metrics(&self, symbol: &str) -> Result<KeyMetrics, AnalysisError> {
        let crumb = self.crumb().await?;
        let url = format!("{}/{}", SUMMARY_URL, symbol);
        tracing::debug!("GET {} (modules={})", url, SUMMARY_MODULES);

        let json = self
            .get_json(
                self.client
                    .get(&url)
                    .query(&[("modules", SUMMARY_MODULES), ("crumb", crumb.as_str())]),
            )
            .await?;

        parse_key_metrics(&json, symbol)
    }

    /// Get daily OHLCV bars for the trailing six months
    pub async fn get_historical_data(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
        let url = format!("{}/{}", CHART_URL, symbol);
        tracing::debug!("GET {} (range={}, interval={})", url, HISTORY_RANGE, HISTORY_INTERVAL);

        let json = self
            .get_json(
                self.client
                    .get(&url)
                    .query(&[("range", HISTORY_RANGE), ("interval", HISTORY_INTERVAL)]),
            )
            .await?;

        parse_chart(&json, symbol)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn key_metrics(&self, ticker: &TickerSymbol) -> Result<KeyMetrics, AnalysisError> {
        self.get_key_metrics(ticker.as_str()).await
    }

    async fn price_history(&self, ticker: &TickerSymbol) -> Result<Vec<Bar>, AnalysisError> {
        self.get_historical_data(ticker.as_str()).await
    }

    fn provider_name(&self) -> &'static str {
        "yahoo"
    }
}

/// Extract `<root>.error.description` from a Yahoo error payload.
fn provider_error(json: &Value) -> Option<String> {
    json.as_object()?
        .values()
        .find_map(|root| root.get("error"))
        .filter(|e| !e.is_null())
        .map(|e| {
            e.get("description")
                .and_then(|d| d.as_str())
                .or_else(|| e.get("code").and_then(|c| c.as_str()))
                .unwrap_or("unknown provider error")
                .to_string()
        })
}

fn first_result<'a>(json: &'a Value, root: &str) -> Option<&'a Value> {
    json.get(root)
        .and_then(|v| v.get("result"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
}

/// Yahoo wraps numbers as `{ "raw": 1.0, "fmt": "1.00" }`; empty objects mean absent.
fn raw(module: Option<&Value>, key: &str) -> Option<f64> {
    module?
        .get(key)
        .and_then(|v| v.get("raw").or(Some(v)))
        .and_then(|v| v.as_f64())
}

pub fn parse_key_metrics(json: &Value, symbol: &str) -> Result<KeyMetrics, AnalysisError> {
    if let Some(message) = provider_error(json) {
        return Err(AnalysisError::ApiError(message));
    }

    let data = first_result(json, "quoteSummary").ok_or_else(|| {
        AnalysisError::InvalidData(format!("No summary data found for {}", symbol))
    })?;

    let price = data.get("price");
    let summary = data.get("summaryDetail");
    let financial = data.get("financialData");

    Ok(KeyMetrics {
        long_name: price
            .and_then(|p| p.get("longName").or_else(|| p.get("shortName")))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        currency: price
            .and_then(|p| p.get("currency"))
            .or_else(|| summary.and_then(|s| s.get("currency")))
            .and_then(|v| v.as_str())
            .map(str::to_string),
        market_cap: raw(summary, "marketCap").or_else(|| raw(price, "marketCap")),
        trailing_pe: raw(summary, "trailingPE"),
        dividend_yield: raw(summary, "dividendYield"),
        total_revenue: raw(financial, "totalRevenue"),
        fifty_two_week_high: raw(summary, "fiftyTwoWeekHigh"),
        fifty_two_week_low: raw(summary, "fiftyTwoWeekLow"),
    })
}

fn column<'a>(quotes: &'a Value, name: &str) -> Result<&'a Vec<Value>, AnalysisError> {
    quotes
        .get(name)
        .and_then(|v| v.as_array())
        .ok_or_else(|| AnalysisError::InvalidData(format!("No {} values", name)))
}

pub fn parse_chart(json: &Value, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
    if let Some(message) = provider_error(json) {
        return Err(AnalysisError::ApiError(message));
    }

    let chart = first_result(json, "chart")
        .ok_or_else(|| AnalysisError::InvalidData(format!("No chart data found for {}", symbol)))?;

    // A valid symbol with no trades in range has no timestamp array
    let timestamps = match chart.get("timestamp").and_then(|v| v.as_array()) {
        Some(ts) => ts,
        None => return Ok(Vec::new()),
    };

    let quotes = chart
        .get("indicators")
        .and_then(|v| v.get("quote"))
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .ok_or_else(|| AnalysisError::InvalidData("No quote data found".to_string()))?;

    let opens = column(quotes, "open")?;
    let highs = column(quotes, "high")?;
    let lows = column(quotes, "low")?;
    let closes = column(quotes, "close")?;
    let volumes = column(quotes, "volume")?;

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, ts) in timestamps.iter().enumerate() {
        // Yahoo emits nulls for halted sessions; skip incomplete rows
        if let (Some(ts), Some(o), Some(h), Some(l), Some(c), Some(v)) = (
            ts.as_i64(),
            opens.get(i).and_then(|v| v.as_f64()),
            highs.get(i).and_then(|v| v.as_f64()),
            lows.get(i).and_then(|v| v.as_f64()),
            closes.get(i).and_then(|v| v.as_f64()),
            volumes.get(i).and_then(|v| v.as_f64()),
        ) {
            bars.push(Bar {
                timestamp: DateTime::from_timestamp(ts, 0)
                    .ok_or_else(|| AnalysisError::InvalidData("Invalid timestamp".to_string()))?,
                open: o,
                high: h,
                low: l,
                close: c,
                volume: v,
            });
        }
    }

    Ok(bars)
}
