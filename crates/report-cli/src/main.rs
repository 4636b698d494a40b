use std::io::{self, BufRead, Write};
use std::sync::Arc;

use analysis_core::TickerResolver;
use analysis_orchestrator::AnalysisOrchestrator;
use anyhow::{bail, Context, Result};
use news_client::DuckDuckGoClient;
use yahoo_client::YahooFinanceClient;

mod config;

use config::{CliArgs, ReportConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_writer(io::stderr)
            .init();
    }

    // Panic hook: log panic info before crashing
    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    // 2. Configuration and command-line overrides
    let config = ReportConfig::from_env()?;
    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args)?;
    let output = cli.output.unwrap_or_else(|| config.output_path.clone());

    // 3. Ticker table (loaded once, read-only afterwards)
    let resolver = if config.ticker_table_path.exists() {
        TickerResolver::from_file(&config.ticker_table_path).with_context(|| {
            format!("failed to load ticker table {}", config.ticker_table_path.display())
        })?
    } else {
        tracing::warn!(
            "Ticker table {} not found; every company lookup will fail",
            config.ticker_table_path.display()
        );
        TickerResolver::empty()
    };

    // 4. Company name from --company or the prompt
    let company = match cli.company {
        Some(name) => name,
        None => prompt("Enter Company Name: ")?,
    };
    let company = company.trim().to_string();
    if company.is_empty() {
        bail!("Company name must not be empty");
    }

    // 5. Providers
    let orchestrator = {
        let orchestrator = AnalysisOrchestrator::new(
            resolver,
            Arc::new(YahooFinanceClient::new(config.http_timeout)),
            Arc::new(DuckDuckGoClient::new(config.http_timeout)),
            Arc::new(config.ml_config().summarizer()),
        );
        match &config.chart_output_path {
            Some(path) => orchestrator.with_chart_output(path),
            None => orchestrator,
        }
    };

    println!("Generating PDF Report...");
    let path = orchestrator
        .generate_report(&company, &output)
        .await
        .with_context(|| format!("failed to write report to {}", output.display()))?;
    println!("PDF Report Generated: {}", path.display());

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read company name")?;
    if read == 0 {
        bail!("No company name given (end of input)");
    }
    Ok(line)
}
