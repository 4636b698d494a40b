use analysis_core::{
    AnalysisResult, MarketDataProvider, NewsSearchProvider, Summarizer, TickerResolver,
};
use report_generator::{ReportBuilder, ReportDocument, ReportError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod market;
pub mod news;


pub use market::MarketDataFetcher;
pub use news::NewsFetcher;

/// Runs the report pipeline: resolve, market data, news, chart, document.
pub struct AnalysisOrchestrator {
    resolver: TickerResolver,
    market: MarketDataFetcher,
    news: NewsFetcher,
    builder: ReportBuilder,
    chart_output: Option<PathBuf>,
}

impl AnalysisOrchestrator {
    pub fn new(
        resolver: TickerResolver,
        market_data: Arc<dyn MarketDataProvider>,
        search: Arc<dyn NewsSearchProvider>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            resolver,
            market: MarketDataFetcher::new(market_data),
            news: NewsFetcher::new(search, summarizer),
            builder: ReportBuilder::default(),
            chart_output: None,
        }
    }

    pub fn with_report_builder(mut self, builder: ReportBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Also write the rendered chart as a PNG at `path`.
    pub fn with_chart_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.chart_output = Some(path.into());
        self
    }

    /// Fetch stock and news data for one company, sequentially.
    ///
    /// Never fails as a whole: each sub-fetch carries its own outcome. An
    /// unresolved name skips the market fetch but news is still attempted.
    pub async fn run_analysis(&self, company: &str) -> AnalysisResult {
        let company = company.trim();
        tracing::info!("Starting analysis for {:?}", company);

        let stock = match self.resolver.resolve(company) {
            Ok(ticker) => {
                tracing::info!("Resolved {:?} to {}", company, ticker);
                self.market.fetch(company, &ticker).await
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Err(e)
            }
        };

        let news = self.news.fetch(company).await;

        let result = AnalysisResult {
            company: company.to_string(),
            stock,
            news,
        };
        tracing::info!(
            "Analysis for {:?} finished (stock ok: {}, news ok: {})",
            company,
            result.stock.is_ok(),
            result.news.is_ok()
        );
        result
    }

    pub fn build_report(&self, result: &AnalysisResult) -> ReportDocument {
        self.builder.build(result)
    }

    /// Run the analysis and write the PDF to `output`, overwriting it.
    pub async fn generate_report(
        &self,
        company: &str,
        output: impl AsRef<Path>,
    ) -> Result<PathBuf, ReportError> {
        let result = self.run_analysis(company).await;
        let document = self.build_report(&result);

        if let (Some(path), Some(chart)) = (&self.chart_output, document.chart()) {
            chart.write_png(path)?;
        }

        let output = output.as_ref();
        document.save(output)?;
        Ok(output.to_path_buf())
    }
}
