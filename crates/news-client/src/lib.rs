//! DuckDuckGo web search client.
//!
//! Queries the script-free HTML endpoint and scrapes organic results.
//! Ads are skipped and redirect links are unwrapped to the target URL.

use analysis_core::{AnalysisError, NewsSearchProvider, SearchHit};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use url::Url;

const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

pub struct DuckDuckGoClient {
    client: Client,
    base_url: String,
}

impl DuckDuckGoClient {
    pub fn new(timeout: Duration) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: SEARCH_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (mirrors, local fixtures).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn search_news(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchHit>, AnalysisError> {
        tracing::debug!("DuckDuckGo search: {:?} (max {})", query, max_results);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(format!("search request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::ApiError(format!(
                "search returned HTTP {}",
                status
            )));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        let hits = parse_results(&html, max_results)?;
        tracing::debug!("DuckDuckGo returned {} results", hits.len());
        Ok(hits)
    }
}

impl Default for DuckDuckGoClient {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl NewsSearchProvider for DuckDuckGoClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, AnalysisError> {
        self.search_news(query, max_results).await
    }

    fn provider_name(&self) -> &'static str {
        "duckduckgo"
    }
}

fn selector(css: &str) -> Result<Selector, AnalysisError> {
    Selector::parse(css)
        .map_err(|e| AnalysisError::InvalidData(format!("bad selector {}: {:?}", css, e)))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Unwrap `//duckduckgo.com/l/?uddg=<target>` redirects; other links pass through.
pub fn resolve_link(href: &str) -> Option<String> {
    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else {
        href.to_string()
    };

    let url = Url::parse(&absolute).ok()?;
    let is_redirect = url
        .host_str()
        .map_or(false, |h| h.ends_with("duckduckgo.com"))
        && url.path().starts_with("/l/");

    if is_redirect {
        return url
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }

    match url.scheme() {
        "http" | "https" => Some(url.to_string()),
        _ => None,
    }
}

/// Extract up to `max_results` organic hits from a results page, in page order.
pub fn parse_results(html: &str, max_results: usize) -> Result<Vec<SearchHit>, AnalysisError> {
    let document = Html::parse_document(html);
    let result_sel = selector("div.result")?;
    let link_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let mut hits = Vec::new();

    for result in document.select(&result_sel) {
        if hits.len() >= max_results {
            break;
        }

        let is_ad = result
            .value()
            .classes()
            .any(|c| c == "result--ad" || c == "result--ad--small");
        if is_ad {
            continue;
        }

        let Some(link) = result.select(&link_sel).next() else {
            continue;
        };
        let Some(url) = link.value().attr("href").and_then(resolve_link) else {
            continue;
        };

        let title = element_text(link);
        // Snippet text is kept verbatim; only a missing or empty snippet is absent
        let body = result
            .select(&snippet_sel)
            .next()
            .map(|s| s.text().collect::<String>())
            .filter(|s| !s.is_empty());

        hits.push(SearchHit { title, url, body });
    }

    Ok(hits)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
        <div class="results">
          <div class="result results_links result--ad">
            <h2><a class="result__a" href="https://ads.example.com/buy">Sponsored</a></h2>
            <a class="result__snippet">Buy now</a>
          </div>
          <div class="result results_links results_links_deep web-result">
            <h2 class="result__title">
              <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fnews.example.com%2Facme%3Fid%3D1&amp;rut=abc">Acme   shares <b>jump</b></a>
            </h2>
            <a class="result__snippet" href="#">Acme Corp reported <b>record</b>  quarterly revenue.</a>
          </div>
          <div class="result results_links web-result">
            <h2><a class="result__a" href="https://finance.example.org/acme">Acme outlook</a></h2>
          </div>
          <div class="result results_links web-result">
            <h2><a class="result__a" href="https://third.example.net/">Third</a></h2>
            <a class="result__snippet">Third body</a>
          </div>
        </div>
        </body></html>
    "##;

    #[test]
    fn parses_organic_results_in_order() {
        let hits = parse_results(PAGE, 5).unwrap();
        assert_eq!(hits.len(), 3);

        assert_eq!(hits[0].title, "Acme shares jump");
        assert_eq!(hits[0].url, "https://news.example.com/acme?id=1");
        assert_eq!(
            hits[0].body.as_deref(),
            Some("Acme Corp reported record  quarterly revenue.")
        );

        assert_eq!(hits[1].url, "https://finance.example.org/acme");
        assert_eq!(hits[1].body, None);
        assert_eq!(hits[2].title, "Third");
    }

    #[test]
    fn truncates_to_max_results() {
        let hits = parse_results(PAGE, 2).unwrap();
        assert_eq!(hits.len(), 2);
        assert!(parse_results(PAGE, 0).unwrap().is_empty());
    }

    #[test]
    fn page_without_results_is_empty() {
        let html = r#"<html><body><div class="no-results">No results.</div></body></html>"#;
        assert!(parse_results(html, 5).unwrap().is_empty());
    }

    #[test]
    fn resolves_redirect_and_direct_links() {
        assert_eq!(
            resolve_link("//duckduckgo.com/l/?uddg=https%3A%2F%2Fa.example%2Fx").as_deref(),
            Some("https://a.example/x")
        );
        assert_eq!(
            resolve_link("https://b.example/y").as_deref(),
            Some("https://b.example/y")
        );
        assert_eq!(resolve_link("javascript:void(0)"), None);
        assert_eq!(resolve_link("not a url"), None);
    }
}
