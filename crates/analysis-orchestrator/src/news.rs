use analysis_core::{
    AnalysisError, NewsArticle, NewsBundle, NewsSearchProvider, Summarizer, SummaryParams,
};
use std::sync::Arc;

pub const MAX_ARTICLES: usize = 5;
pub const NO_NEWS: &str = "No relevant news found";
pub const NO_ARTICLE_TEXT: &str = "No article text available to summarize";

/// Searches recent news for a company and summarizes the article text.
pub struct NewsFetcher {
    search: Arc<dyn NewsSearchProvider>,
    summarizer: Arc<dyn Summarizer>,
    params: SummaryParams,
}

impl NewsFetcher {
    pub fn new(search: Arc<dyn NewsSearchProvider>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            search,
            summarizer,
            params: SummaryParams::default(),
        }
    }

    pub fn query_for(company: &str) -> String {
        format!("{} stock news", company)
    }

    pub async fn fetch(&self, company: &str) -> Result<NewsBundle, AnalysisError> {
        let query = Self::query_for(company);
        tracing::info!("Searching news via {}: {:?}", self.search.provider_name(), query);

        let mut hits = self
            .search
            .search(&query, MAX_ARTICLES)
            .await
            .map_err(|e| failed("News search", e))?;
        hits.truncate(MAX_ARTICLES);

        if hits.is_empty() {
            tracing::warn!("No news results for {:?}", query);
            return Err(AnalysisError::FetchError(NO_NEWS.to_string()));
        }

        let bodies: Vec<&str> = hits.iter().filter_map(|h| h.text()).collect();
        if bodies.is_empty() {
            tracing::warn!("{} results for {:?} carry no body text", hits.len(), query);
            return Err(AnalysisError::FetchError(NO_ARTICLE_TEXT.to_string()));
        }

        let text = bodies.join("\n");
        let summary = self
            .summarizer
            .summarize(&text, &self.params)
            .await
            .map_err(|e| failed("Summarization", e))?;

        tracing::info!(
            "Summarized {} articles via {} backend",
            hits.len(),
            self.summarizer.backend_name()
        );

        Ok(NewsBundle {
            articles: hits.iter().map(NewsArticle::from).collect(),
            summary,
        })
    }
}

fn failed(stage: &str, err: AnalysisError) -> AnalysisError {
    tracing::warn!("{} failed: {}", stage, err);
    err.into_fetch_error()
}
