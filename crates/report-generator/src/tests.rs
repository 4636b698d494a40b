use analysis_core::{
    AnalysisError, AnalysisResult, Bar, KeyMetrics, NewsArticle, NewsBundle, StockSnapshot,
    TickerSymbol,
};
use chrono::{Duration, TimeZone, Utc};

use crate::layout::{paginate, TextStyle};
use crate::report::{NEWS_HEADING, REPORT_TITLE};
use crate::{Block, ChartRenderer, ReportBuilder};

fn history(n: usize) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let close = 50.0 + i as f64 * 0.25;
            Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: 2_500_000.0,
            }
        })
        .collect()
}

fn snapshot(bars: Vec<Bar>) -> StockSnapshot {
    let metrics = KeyMetrics {
        long_name: Some("Acme Corporation".to_string()),
        currency: Some("USD".to_string()),
        market_cap: Some(1_234_567_890.0),
        trailing_pe: Some(18.5),
        dividend_yield: Some(0.0125),
        total_revenue: Some(987_654_321.0),
        fifty_two_week_high: Some(97.1),
        fifty_two_week_low: Some(42.0),
    };
    StockSnapshot::new("Acme Corp", TickerSymbol::new("ACME"), metrics, bars)
}

fn news() -> NewsBundle {
    NewsBundle {
        articles: vec![
            NewsArticle {
                title: "Acme beats estimates".to_string(),
                url: "https://news.example.com/acme-q3".to_string(),
            },
            NewsArticle {
                title: "Analysts raise Acme targets".to_string(),
                url: "https://markets.example.com/acme".to_string(),
            },
        ],
        summary: "Acme reported strong quarterly results.".to_string(),
    }
}

fn builder() -> ReportBuilder {
    ReportBuilder::new(ChartRenderer::new(600, 400))
}

#[test]
fn complete_result_renders_all_sections() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(snapshot(history(120))),
        news: Ok(news()),
    };

    let doc = builder().build(&result);
    let lines = doc.text_lines();

    assert_eq!(doc.title(), REPORT_TITLE);
    assert_eq!(lines[0], "Stock Overview: Acme Corp (ACME)");
    for row in [
        "Market Cap: $1,234,567,890",
        "P/E Ratio: 18.50",
        "Dividend Yield: 1.25%",
        "Revenue: $987,654,321",
        "52-Week High: $97.10",
        "52-Week Low: $42.00",
    ] {
        assert!(lines.iter().any(|l| l == row), "missing row {:?}", row);
    }

    let news_at = lines.iter().position(|l| l == NEWS_HEADING).unwrap();
    assert_eq!(lines[news_at + 1], "Summary: Acme reported strong quarterly results.");
    assert_eq!(lines[news_at + 2], "Acme beats estimates");
    assert_eq!(lines[news_at + 3], "https://news.example.com/acme-q3");

    assert!(doc.chart().is_some());
    // The chart follows the news links directly
    assert!(matches!(doc.blocks().last(), Some(Block::Chart(_))));
    assert!(!lines.iter().any(|l| l == "Technical Charts"));
}

#[test]
fn links_are_blue_and_body_is_black() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(snapshot(history(10))),
        news: Ok(news()),
    };
    let doc = builder().build(&result);
    let pages = paginate(&doc);

    let styles: Vec<(String, TextStyle)> = pages
        .iter()
        .flat_map(|p| p.texts().into_iter().map(|(t, s)| (t.to_string(), s)).collect::<Vec<_>>())
        .collect();

    let style_of = |text: &str| styles.iter().find(|(t, _)| t == text).map(|(_, s)| *s);
    assert_eq!(style_of("Acme beats estimates"), Some(TextStyle::Link));
    assert_eq!(style_of("https://markets.example.com/acme"), Some(TextStyle::Link));
    assert_eq!(style_of("Summary: Acme reported strong quarterly results."), Some(TextStyle::Body));
}

#[test]
fn failed_stock_fetch_renders_message_in_overview_and_chart() {
    let result = AnalysisResult {
        company: "unknown-co".to_string(),
        stock: Err(AnalysisError::TickerNotFound("unknown-co".to_string())),
        news: Ok(news()),
    };

    let doc = builder().build(&result);
    let lines = doc.text_lines();
    let message = "Could not find ticker for 'unknown-co'";

    assert_eq!(lines.iter().filter(|l| *l == message).count(), 2);
    assert!(!lines.iter().any(|l| l.starts_with("Market Cap")));
    assert!(doc.chart().is_none());
    // News section is unaffected
    assert!(lines.iter().any(|l| l == "Acme beats estimates"));
}

#[test]
fn failed_news_fetch_renders_message() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(snapshot(history(30))),
        news: Err(AnalysisError::FetchError("No relevant news found".to_string())),
    };

    let lines = builder().build(&result).text_lines();
    let news_at = lines.iter().position(|l| l == NEWS_HEADING).unwrap();
    assert_eq!(lines[news_at + 1], "No relevant news found");
    assert!(!lines.iter().any(|l| l.starts_with("Summary:")));
}

#[test]
fn empty_history_renders_chart_error() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(snapshot(Vec::new())),
        news: Ok(news()),
    };

    let doc = builder().build(&result);
    let lines = doc.text_lines();
    // Chart notice closes the report, after the news links
    let notice = lines.last().unwrap();
    assert!(notice.starts_with("Render error:"), "got {:?}", notice);
    assert_eq!(lines[lines.len() - 2], "https://markets.example.com/acme");
    assert!(doc.chart().is_none());
    // Overview rows still render
    assert!(lines.iter().any(|l| l == "P/E Ratio: 18.50"));
}

#[test]
fn absent_metrics_render_not_available() {
    let stock = StockSnapshot::new(
        "Acme Corp",
        TickerSymbol::new("ACME"),
        KeyMetrics::default(),
        history(5),
    );
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(stock),
        news: Ok(news()),
    };

    let doc = builder().build(&result);
    let rows: Vec<_> = doc
        .blocks()
        .iter()
        .filter_map(|b| match b {
            Block::Row { value, .. } => Some(value.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(rows, vec!["N/A"; 6]);
}

#[test]
fn pdf_bytes_and_overwrite() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Ok(snapshot(history(60))),
        news: Ok(news()),
    };
    let doc = builder().build(&result);

    let bytes = doc.to_pdf_bytes().unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Financial_Report.pdf");
    std::fs::write(&path, b"stale contents").unwrap();

    doc.save(&path).unwrap();
    let written = std::fs::read(&path).unwrap();
    assert!(written.starts_with(b"%PDF"));
    assert!(written.len() > 100);
}

#[test]
fn unwritable_path_is_an_io_error() {
    let result = AnalysisResult {
        company: "Acme Corp".to_string(),
        stock: Err(AnalysisError::FetchError("offline".to_string())),
        news: Err(AnalysisError::FetchError("offline".to_string())),
    };
    let doc = builder().build(&result);

    let dir = tempfile::tempdir().unwrap();
    let err = doc.save(dir.path().join("missing").join("report.pdf")).unwrap_err();
    assert!(matches!(err, crate::ReportError::Io(_)));
}
