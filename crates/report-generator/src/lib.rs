pub mod chart;
pub mod error;
pub mod format;
pub mod layout;
pub mod pdf;
pub mod report;

#[cfg(test)]
mod tests;

pub use chart::{ChartData, ChartImage, ChartRenderer};
pub use error::ReportError;
pub use report::{Block, ReportBuilder, ReportDocument};
