//! Four-panel technical chart rendered to an in-memory RGB raster.

use analysis_core::{AnalysisError, Bar};
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::io::Cursor;
use std::path::Path;
use std::sync::OnceLock;
use technical_analysis::{closes, histogram, pct_change, rolling_sma, volumes, HistogramBucket};

use crate::ReportError;

pub const CHART_WIDTH: u32 = 1500;
pub const CHART_HEIGHT: u32 = 1000;
pub const SMA_PERIOD: usize = 50;
pub const RETURN_BINS: usize = 30;

/// Panel titles, left to right then top to bottom.
pub const PANEL_TITLES: [&str; 4] = [
    "Stock Price Over Time",
    "Moving Averages (Close, 50-day SMA)",
    "Volume Trends",
    "Daily Returns Distribution",
];

const PURPLE: RGBColor = RGBColor(128, 0, 128);
const GREEN_BAR: RGBColor = RGBColor(0, 128, 0);
const ORANGE: RGBColor = RGBColor(255, 127, 14);
const GRID: RGBColor = RGBColor(225, 225, 225);

const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

/// Date labels per panel x axis.
const X_LABELS: usize = 6;

/// Series plotted in each panel, derived once from the price history.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    /// Bar dates as `YYYY-MM-DD`, used for the x-axis labels.
    pub dates: Vec<String>,
    pub closes: Vec<f64>,
    pub sma: Vec<Option<f64>>,
    pub volumes: Vec<f64>,
    /// Percentage change per period; the first (undefined) change is excluded.
    pub returns: Vec<f64>,
    pub buckets: Vec<HistogramBucket>,
}

impl ChartData {
    pub fn from_history(history: &[Bar]) -> Self {
        let closes = closes(history);
        let returns = pct_change(&closes);
        Self {
            dates: history
                .iter()
                .map(|b| b.timestamp.format("%Y-%m-%d").to_string())
                .collect(),
            sma: rolling_sma(&closes, SMA_PERIOD),
            volumes: volumes(history),
            buckets: histogram(&returns, RETURN_BINS),
            returns,
            closes,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartImage {
    raster: RgbImage,
    data: ChartData,
}

impl ChartImage {
    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Raw RGB8 pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.raster.as_raw()
    }

    pub fn png_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.raster.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| ReportError::Image(e.to_string()))?;
        Ok(bytes)
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), ReportError> {
        let path = path.as_ref();
        std::fs::write(path, self.png_bytes()?)?;
        tracing::info!("Chart written to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT,
        }
    }
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn render(&self, history: &[Bar]) -> Result<ChartImage, AnalysisError> {
        if history.is_empty() {
            return Err(AnalysisError::RenderError("No price history to chart".to_string()));
        }

        ensure_font()?;
        let data = ChartData::from_history(history);
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (self.width, self.height))
                .into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;

            let panels = root.split_evenly((2, 2));
            draw_close(&panels[0], &data)?;
            draw_sma(&panels[1], &data)?;
            draw_volume(&panels[2], &data)?;
            draw_returns(&panels[3], &data)?;

            root.present().map_err(render_err)?;
        }

        let raster = RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| AnalysisError::RenderError("raster size mismatch".to_string()))?;

        tracing::debug!("Rendered {}x{} chart from {} bars", self.width, self.height, history.len());
        Ok(ChartImage { raster, data })
    }
}

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn render_err(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::RenderError(e.to_string())
}

/// Register the embedded face under the family plotters uses for labels.
fn ensure_font() -> Result<(), AnalysisError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();
    let ok = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if ok {
        Ok(())
    } else {
        Err(AnalysisError::RenderError("embedded chart font is invalid".to_string()))
    }
}

/// Value range padded by 5%; degenerate ranges are widened to stay drawable.
fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Date of the bar nearest to a position on the index axis.
fn date_label(dates: &[String], x: f64) -> String {
    if !x.is_finite() || x < -0.5 {
        return String::new();
    }
    dates.get(x.round() as usize).cloned().unwrap_or_default()
}

fn price_label(v: &f64) -> String {
    format!("{:.2}", v)
}

/// Volume with a K/M/B suffix.
fn compact_label(v: &f64) -> String {
    let abs = v.abs();
    if abs >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if abs >= 1e3 {
        format!("{:.0}K", v / 1e3)
    } else {
        format!("{:.0}", v)
    }
}

fn percent_label(v: &f64) -> String {
    format!("{:.1}%", v)
}

fn count_label(v: &f64) -> String {
    format!("{:.0}", v)
}

fn panel_builder<'a, 'b>(panel: &'a Panel<'b>, title: &str) -> ChartBuilder<'a, 'a, BitMapBackend<'b>> {
    let mut builder = ChartBuilder::on(panel);
    builder
        .caption(title, (FONT_FAMILY, 22))
        .margin(12)
        .x_label_area_size(35)
        .y_label_area_size(70);
    builder
}

fn draw_close(panel: &Panel<'_>, data: &ChartData) -> Result<(), AnalysisError> {
    let n = data.closes.len() as f64;
    let mut chart = panel_builder(panel, PANEL_TITLES[0])
        .build_cartesian_2d(0.0..n.max(1.0), padded_range(data.closes.iter().copied()))
        .map_err(render_err)?;

    let dates = |x: &f64| date_label(&data.dates, *x);
    chart
        .configure_mesh()
        .x_labels(X_LABELS)
        .x_label_formatter(&dates)
        .y_label_formatter(&price_label)
        .label_style((FONT_FAMILY, 14))
        .light_line_style(GRID)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            data.closes.iter().enumerate().map(|(i, c)| (i as f64, *c)),
            BLUE.stroke_width(2),
        ))
        .map_err(render_err)?;
    Ok(())
}

fn draw_sma(panel: &Panel<'_>, data: &ChartData) -> Result<(), AnalysisError> {
    let n = data.closes.len() as f64;
    let mut chart = panel_builder(panel, PANEL_TITLES[1])
        .build_cartesian_2d(0.0..n.max(1.0), padded_range(data.closes.iter().copied()))
        .map_err(render_err)?;

    let dates = |x: &f64| date_label(&data.dates, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(X_LABELS)
        .x_label_formatter(&dates)
        .y_label_formatter(&price_label)
        .label_style((FONT_FAMILY, 14))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            data.closes.iter().enumerate().map(|(i, c)| (i as f64, *c)),
            BLUE.stroke_width(1),
        ))
        .map_err(render_err)?
        .label("Close")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    // Undefined SMA points are skipped, so the line starts at the 50th bar
    chart
        .draw_series(DashedLineSeries::new(
            data.sma
                .iter()
                .enumerate()
                .filter_map(|(i, v)| v.map(|v| (i as f64, v))),
            8,
            4,
            ORANGE.stroke_width(2),
        ))
        .map_err(render_err)?
        .label(format!("{}-day SMA", SMA_PERIOD))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ORANGE.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font((FONT_FAMILY, 14))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}

fn draw_volume(panel: &Panel<'_>, data: &ChartData) -> Result<(), AnalysisError> {
    let n = data.volumes.len() as f64;
    let top = data.volumes.iter().copied().fold(0.0_f64, f64::max);
    let mut chart = panel_builder(panel, PANEL_TITLES[2])
        .build_cartesian_2d(0.0..n.max(1.0), 0.0..(top * 1.05).max(1.0))
        .map_err(render_err)?;

    let dates = |x: &f64| date_label(&data.dates, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(X_LABELS)
        .x_label_formatter(&dates)
        .y_label_formatter(&compact_label)
        .label_style((FONT_FAMILY, 14))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(data.volumes.iter().enumerate().map(|(i, v)| {
            let x = i as f64;
            Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *v)], PURPLE.filled())
        }))
        .map_err(render_err)?;
    Ok(())
}

fn draw_returns(panel: &Panel<'_>, data: &ChartData) -> Result<(), AnalysisError> {
    let (first, last) = match (data.buckets.first(), data.buckets.last()) {
        (Some(first), Some(last)) => (first.lower, last.upper),
        // Fewer than two closes: empty axes under the title
        _ => (-1.0, 1.0),
    };

    let top = data.buckets.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    let mut chart = panel_builder(panel, PANEL_TITLES[3])
        .build_cartesian_2d(first..last, 0.0..(top * 1.1).max(1.0))
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(X_LABELS)
        .x_label_formatter(&percent_label)
        .y_label_formatter(&count_label)
        .label_style((FONT_FAMILY, 14))
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(data.buckets.iter().map(|b| {
            Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], GREEN_BAR.filled())
        }))
        .map_err(render_err)?;
    Ok(())
}
