use analysis_core::Bar;
use serde::{Deserialize, Serialize};

/// Simple Moving Average
///
/// Returns only the defined values: `data.len() - period + 1` points.
pub fn sma(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return vec![];
    }

    let mut result = Vec::with_capacity(data.len() - period + 1);
    for i in period - 1..data.len() {
        let sum: f64 = data[i + 1 - period..=i].iter().sum();
        result.push(sum / period as f64);
    }
    result
}

/// Simple Moving Average aligned with its input.
///
/// The output has the same length as `data`; the first `period - 1` entries
/// are `None` because the trailing window is incomplete there.
pub fn rolling_sma(data: &[f64], period: usize) -> Vec<Option<f64>> {
    let defined = sma(data, period);
    let undefined = data.len() - defined.len();

    std::iter::repeat(None)
        .take(undefined)
        .chain(defined.into_iter().map(Some))
        .collect()
}

/// Period-over-period percentage change (`100 * (x[i] - x[i-1]) / x[i-1]`).
///
/// The first period has no predecessor and is dropped, so the result holds
/// `data.len() - 1` values. A zero previous value yields a non-finite entry,
/// which callers are expected to filter.
pub fn pct_change(data: &[f64]) -> Vec<f64> {
    data.windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .collect()
}

/// One bucket of a fixed-width histogram, covering `[lower, upper)`
/// (the last bucket also includes its upper edge).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite values of `data`.
///
/// Buckets span `[min, max]`; when every value is identical the range is
/// widened by 0.5 on each side so the single value still lands in a bucket.
pub fn histogram(data: &[f64], bins: usize) -> Vec<HistogramBucket> {
    let values: Vec<f64> = data.iter().copied().filter(|v| v.is_finite()).collect();
    if bins == 0 || values.is_empty() {
        return vec![];
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let width = (max - min) / bins as f64;
    let mut buckets: Vec<HistogramBucket> = (0..bins)
        .map(|i| HistogramBucket {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        buckets[idx].count += 1;
    }

    buckets
}

/// Closing prices of a bar series, in order.
pub fn closes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Traded volume of a bar series, in order.
pub fn volumes(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}
