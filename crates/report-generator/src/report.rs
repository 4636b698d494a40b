//! Report document model and its construction from an analysis result.

use analysis_core::{AnalysisResult, NewsBundle, StockSnapshot};
use std::path::Path;

use crate::chart::{ChartImage, ChartRenderer};
use crate::format::overview_rows;
use crate::{pdf, ReportError};

pub const REPORT_TITLE: &str = "Financial Analysis Report";
pub const NEWS_HEADING: &str = "Latest Financial News";

/// One layout block, in reading order.
#[derive(Debug, Clone)]
pub enum Block {
    Heading(String),
    /// Bordered two-column table row.
    Row { label: String, value: String },
    Paragraph(String),
    /// Article title and URL, drawn in blue.
    Link { title: String, url: String },
    /// Failure message standing in for a section's content.
    Notice(String),
    /// Four-panel chart; titles and axes are part of the raster.
    Chart(ChartImage),
    Spacer,
}

#[derive(Debug, Clone)]
pub struct ReportDocument {
    title: String,
    blocks: Vec<Block>,
}

impl ReportDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn chart(&self) -> Option<&ChartImage> {
        self.blocks.iter().find_map(|b| match b {
            Block::Chart(image) => Some(image),
            _ => None,
        })
    }

    /// Body text in reading order, one entry per rendered line group.
    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading(text) | Block::Paragraph(text) | Block::Notice(text) => {
                    lines.push(text.clone())
                }
                Block::Row { label, value } => lines.push(format!("{}: {}", label, value)),
                Block::Link { title, url } => {
                    lines.push(title.clone());
                    lines.push(url.clone());
                }
                Block::Chart(_) | Block::Spacer => {}
            }
        }
        lines
    }

    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, ReportError> {
        pdf::render(self)
    }

    /// Write the PDF to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        let bytes = self.to_pdf_bytes()?;
        std::fs::write(path, bytes)?;
        tracing::info!("Report written to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    renderer: ChartRenderer,
}

impl ReportBuilder {
    pub fn new(renderer: ChartRenderer) -> Self {
        Self { renderer }
    }

    pub fn build(&self, result: &AnalysisResult) -> ReportDocument {
        let mut doc = ReportDocument::new(REPORT_TITLE);

        match &result.stock {
            Ok(stock) => self.stock_section(&mut doc, stock),
            Err(err) => {
                doc.push(Block::Heading(format!("Stock Overview: {}", result.company)));
                doc.push(Block::Notice(err.to_string()));
                doc.push(Block::Spacer);
            }
        }

        doc.push(Block::Heading(NEWS_HEADING.to_string()));
        match &result.news {
            Ok(news) => news_section(&mut doc, news),
            Err(err) => doc.push(Block::Notice(err.to_string())),
        }
        doc.push(Block::Spacer);

        match &result.stock {
            Ok(stock) => match self.renderer.render(stock.history()) {
                Ok(image) => doc.push(Block::Chart(image)),
                Err(err) => {
                    tracing::warn!("Chart for {} not rendered: {}", stock.ticker(), err);
                    doc.push(Block::Notice(err.to_string()));
                }
            },
            Err(err) => doc.push(Block::Notice(err.to_string())),
        }

        doc
    }

    fn stock_section(&self, doc: &mut ReportDocument, stock: &StockSnapshot) {
        doc.push(Block::Heading(format!(
            "Stock Overview: {} ({})",
            stock.company(),
            stock.ticker()
        )));
        if let Some(name) = &stock.metrics().long_name {
            doc.push(Block::Paragraph(name.clone()));
        }
        for (label, value) in overview_rows(stock.metrics()) {
            doc.push(Block::Row {
                label: label.to_string(),
                value,
            });
        }
        doc.push(Block::Spacer);
    }
}

fn news_section(doc: &mut ReportDocument, news: &NewsBundle) {
    doc.push(Block::Paragraph(format!("Summary: {}", news.summary)));
    for article in &news.articles {
        doc.push(Block::Link {
            title: article.title.clone(),
            url: article.url.clone(),
        });
    }
}
