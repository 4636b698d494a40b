use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// JSON object mapping company names to tickers
    pub ticker_table_path: PathBuf,
    pub output_path: PathBuf,
    /// Where to also save the chart PNG, if anywhere
    pub chart_output_path: Option<PathBuf>,

    // Summarization model
    pub summarization_url: String,
    pub hf_api_token: Option<String>,

    pub http_timeout: Duration,
}

impl ReportConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank values take the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let http_timeout_secs: u64 = var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Self {
            ticker_table_path: var("TICKER_TABLE_PATH")
                .unwrap_or_else(|| "tickers.json".to_string())
                .into(),
            output_path: var("REPORT_OUTPUT_PATH")
                .unwrap_or_else(|| "Financial_Report.pdf".to_string())
                .into(),
            chart_output_path: var("CHART_OUTPUT_PATH").map(PathBuf::from),

            summarization_url: var("SUMMARIZATION_MODEL_URL")
                .unwrap_or_else(|| ml_client::DEFAULT_SUMMARIZATION_URL.to_string()),
            hf_api_token: var("HF_API_TOKEN"),

            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    pub fn ml_config(&self) -> ml_client::MLConfig {
        ml_client::MLConfig {
            summarization_url: self.summarization_url.clone(),
            api_token: self.hf_api_token.clone(),
            timeout: self.http_timeout,
        }
    }
}

/// Command-line overrides: `--company <name>` and `--output <path>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub company: Option<String>,
    pub output: Option<PathBuf>,
}

impl CliArgs {
    pub fn parse(args: &[String]) -> Result<Self> {
        let value_of = |flag: &str| -> Result<Option<String>> {
            match args.iter().position(|a| a == flag) {
                Some(i) => args
                    .get(i + 1)
                    .filter(|v| !v.starts_with("--"))
                    .cloned()
                    .map(Some)
                    .with_context(|| format!("{} requires a value", flag)),
                None => Ok(None),
            }
        };

        Ok(Self {
            company: value_of("--company")?,
            output: value_of("--output")?.map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ReportConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.ticker_table_path, PathBuf::from("tickers.json"));
        assert_eq!(config.output_path, PathBuf::from("Financial_Report.pdf"));
        assert_eq!(config.chart_output_path, None);
        assert_eq!(config.summarization_url, ml_client::DEFAULT_SUMMARIZATION_URL);
        assert_eq!(config.hf_api_token, None);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn overrides_are_read() {
        let config = ReportConfig::from_lookup(lookup(&[
            ("REPORT_OUTPUT_PATH", "out/acme.pdf"),
            ("CHART_OUTPUT_PATH", "financial_analysis.png"),
            ("HF_API_TOKEN", "hf_secret"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("TICKER_TABLE_PATH", "  "),
        ]))
        .unwrap();

        assert_eq!(config.output_path, PathBuf::from("out/acme.pdf"));
        assert_eq!(config.chart_output_path, Some(PathBuf::from("financial_analysis.png")));
        assert_eq!(config.hf_api_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.ml_config().timeout, Duration::from_secs(5));
        // Blank values fall back to the default
        assert_eq!(config.ticker_table_path, PathBuf::from("tickers.json"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(ReportConfig::from_lookup(lookup(&[("HTTP_TIMEOUT_SECS", "soon")])).is_err());
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let parsed = CliArgs::parse(&args(&[
            "financial-report",
            "--company",
            "Apple",
            "--output",
            "apple.pdf",
        ]))
        .unwrap();
        assert_eq!(parsed.company.as_deref(), Some("Apple"));
        assert_eq!(parsed.output, Some(PathBuf::from("apple.pdf")));

        assert_eq!(CliArgs::parse(&args(&["financial-report"])).unwrap(), CliArgs::default());
    }

    #[test]
    fn flag_without_value_is_an_error() {
        assert!(CliArgs::parse(&args(&["financial-report", "--company"])).is_err());
        assert!(CliArgs::parse(&args(&["financial-report", "--company", "--output", "x.pdf"])).is_err());
    }
}
