//! Pagination of a `ReportDocument` onto A4 pages.
//!
//! Coordinates are millimetres from the bottom-left corner, as PDF expects.
//! Every page carries the report header and a `Page N` footer.

use crate::chart::ChartImage;
use crate::report::{Block, ReportDocument};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 10.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;

const HEADER_BASELINE: f32 = 282.0;
const CONTENT_TOP: f32 = 270.0;
const CONTENT_BOTTOM: f32 = 20.0;
const FOOTER_BASELINE: f32 = 10.0;

const HEADING_HEIGHT: f32 = 10.0;
const LINE_HEIGHT: f32 = 6.0;
const ROW_HEIGHT: f32 = 8.0;
const SPACER_HEIGHT: f32 = 5.0;
const LABEL_WIDTH: f32 = 60.0;
const VALUE_WIDTH: f32 = 90.0;

/// Characters per wrapped body line at the body font size.
pub const WRAP_COLUMNS: usize = 90;
/// Characters per wrapped heading line at the heading font size.
pub const HEADING_COLUMNS: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Header,
    Heading,
    Body,
    Link,
    Notice,
    Footer,
}

impl TextStyle {
    pub fn size(self) -> f32 {
        match self {
            TextStyle::Header => 16.0,
            TextStyle::Heading => 14.0,
            TextStyle::Body | TextStyle::Link | TextStyle::Notice => 11.0,
            TextStyle::Footer => 10.0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Element<'a> {
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    /// Rectangle outline; `y` is the bottom edge.
    Cell {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Image scaled to `width`; `y` is the bottom edge.
    Image {
        x: f32,
        y: f32,
        width: f32,
        image: &'a ChartImage,
    },
}

#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub number: usize,
    pub elements: Vec<Element<'a>>,
}

impl Page<'_> {
    pub fn texts(&self) -> Vec<(&str, TextStyle)> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, style, .. } => Some((text.as_str(), *style)),
                _ => None,
            })
            .collect()
    }
}

/// Greedy word wrap; words longer than `columns` are split.
pub fn wrap(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..columns).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() { word.len() } else { current.len() + 1 + word.len() };
        if needed > columns && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Approximate rendered width of Helvetica text, used for centring.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.5 * 0.3528
}

struct Paginator<'a> {
    title: &'a str,
    pages: Vec<Page<'a>>,
    y: f32,
}

impl<'a> Paginator<'a> {
    fn new(title: &'a str) -> Self {
        let mut p = Self {
            title,
            pages: Vec::new(),
            y: CONTENT_TOP,
        };
        p.new_page();
        p
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        let footer = format!("Page {}", number);
        let elements = vec![
            Element::Text {
                x: (PAGE_WIDTH - text_width(self.title, TextStyle::Header.size())) / 2.0,
                y: HEADER_BASELINE,
                style: TextStyle::Header,
                text: self.title.to_string(),
            },
            Element::Text {
                x: (PAGE_WIDTH - text_width(&footer, TextStyle::Footer.size())) / 2.0,
                y: FOOTER_BASELINE,
                style: TextStyle::Footer,
                text: footer,
            },
        ];
        self.pages.push(Page { number, elements });
        self.y = CONTENT_TOP;
    }

    fn current(&mut self) -> &mut Page<'a> {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Start a new page unless `height` still fits above the footer.
    fn reserve(&mut self, height: f32) {
        if self.y - height < CONTENT_BOTTOM && self.y < CONTENT_TOP {
            self.new_page();
        }
    }

    fn text_line(&mut self, text: String, style: TextStyle, height: f32) {
        self.reserve(height);
        let y = self.y - height + 1.5;
        self.current().elements.push(Element::Text {
            x: MARGIN,
            y,
            style,
            text,
        });
        self.y -= height;
    }

    fn wrapped(&mut self, text: &str, style: TextStyle) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.text_line(line, style, LINE_HEIGHT);
        }
    }

    /// Headings move to the next page together with their first row or line.
    fn heading(&mut self, text: &str) {
        let lines = wrap(text, HEADING_COLUMNS);
        self.reserve(lines.len() as f32 * HEADING_HEIGHT + ROW_HEIGHT);
        for line in lines {
            self.text_line(line, TextStyle::Heading, HEADING_HEIGHT);
        }
    }

    fn row(&mut self, label: &str, value: &str) {
        self.reserve(ROW_HEIGHT);
        let bottom = self.y - ROW_HEIGHT;
        let baseline = bottom + 2.5;
        let page = self.current();
        page.elements.extend([
            Element::Cell { x: MARGIN, y: bottom, width: LABEL_WIDTH, height: ROW_HEIGHT },
            Element::Cell {
                x: MARGIN + LABEL_WIDTH,
                y: bottom,
                width: VALUE_WIDTH,
                height: ROW_HEIGHT,
            },
            Element::Text {
                x: MARGIN + 2.0,
                y: baseline,
                style: TextStyle::Body,
                text: label.to_string(),
            },
            Element::Text {
                x: MARGIN + LABEL_WIDTH + 2.0,
                y: baseline,
                style: TextStyle::Body,
                text: value.to_string(),
            },
        ]);
        self.y = bottom;
    }

    fn chart(&mut self, image: &'a ChartImage) {
        let height = CONTENT_WIDTH * image.height() as f32 / image.width().max(1) as f32;
        self.reserve(height);
        let bottom = self.y - height;
        self.current().elements.push(Element::Image {
            x: MARGIN,
            y: bottom,
            width: CONTENT_WIDTH,
            image,
        });
        self.y = bottom;
    }

    fn block(&mut self, block: &'a Block) {
        match block {
            Block::Heading(text) => self.heading(text),
            Block::Row { label, value } => self.row(label, value),
            Block::Paragraph(text) => self.wrapped(text, TextStyle::Body),
            Block::Link { title, url } => {
                self.wrapped(title, TextStyle::Link);
                self.wrapped(url, TextStyle::Link);
            }
            Block::Notice(text) => self.wrapped(text, TextStyle::Notice),
            Block::Chart(image) => self.chart(image),
            Block::Spacer => {
                if self.y - SPACER_HEIGHT >= CONTENT_BOTTOM {
                    self.y -= SPACER_HEIGHT;
                }
            }
        }
    }
}

pub fn paginate(doc: &ReportDocument) -> Vec<Page<'_>> {
    let mut paginator = Paginator::new(doc.title());
    for block in doc.blocks() {
        paginator.block(block);
    }
    paginator.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn splits_overlong_words() {
        let url = "https://example.com/".to_string() + &"x".repeat(30);
        let lines = wrap(&url, 20);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.concat(), url);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(wrap("", 10), vec![String::new()]);
    }

    #[test]
    fn every_page_has_header_and_footer() {
        let mut doc = ReportDocument::new("Financial Analysis Report");
        for i in 0..120 {
            doc.push(Block::Paragraph(format!("Paragraph {}", i)));
        }

        let pages = paginate(&doc);
        assert!(pages.len() > 1);

        for page in &pages {
            let texts = page.texts();
            assert!(texts.contains(&("Financial Analysis Report", TextStyle::Header)));
            let footer = format!("Page {}", page.number);
            assert!(texts.contains(&(footer.as_str(), TextStyle::Footer)));
        }
    }

    #[test]
    fn body_text_stays_inside_margins() {
        let mut doc = ReportDocument::new("T");
        for _ in 0..30 {
            doc.push(Block::Row { label: "L".into(), value: "V".into() });
            doc.push(Block::Spacer);
        }

        for page in paginate(&doc) {
            for element in &page.elements {
                if let Element::Cell { y, height, .. } = element {
                    assert!(*y >= CONTENT_BOTTOM);
                    assert!(*y + *height <= CONTENT_TOP + 0.001);
                }
            }
        }
    }

    #[test]
    fn long_headings_wrap_inside_margins() {
        let mut doc = ReportDocument::new("T");
        doc.push(Block::Heading(format!(
            "Stock Overview: {} (ACME)",
            "The Extremely Long Named Consolidated Holdings Company ".repeat(3)
        )));

        let pages = paginate(&doc);
        let headings: Vec<&str> = pages[0]
            .texts()
            .into_iter()
            .filter(|(_, s)| *s == TextStyle::Heading)
            .map(|(t, _)| t)
            .collect();

        assert!(headings.len() > 1);
        for line in &headings {
            assert!(line.chars().count() <= HEADING_COLUMNS);
            assert!(MARGIN + text_width(line, TextStyle::Heading.size()) <= PAGE_WIDTH - MARGIN);
        }
        assert!(headings.last().unwrap().ends_with("(ACME)"));
    }

    #[test]
    fn heading_is_never_last_on_a_page() {
        let page_of = |pages: &[Page<'_>], text: &str| {
            pages
                .iter()
                .find(|p| p.texts().iter().any(|(t, _)| *t == text))
                .map(|p| p.number)
        };

        // Fill levels that leave room for the heading but not its row
        for filler in 30..45 {
            let mut doc = ReportDocument::new("T");
            for i in 0..filler {
                doc.push(Block::Paragraph(format!("Line {}", i)));
            }
            doc.push(Block::Heading("Stock Overview: Acme Corp (ACME)".into()));
            doc.push(Block::Row { label: "Market Cap".into(), value: "$1,000".into() });

            let pages = paginate(&doc);
            assert_eq!(
                page_of(&pages, "Stock Overview: Acme Corp (ACME)"),
                page_of(&pages, "Market Cap"),
                "heading separated from its row after {} lines",
                filler
            );
        }
    }
}
