//! Display formatting for the stock overview table.

use analysis_core::KeyMetrics;

pub const NOT_AVAILABLE: &str = "N/A";

/// `$` for US dollars or an unreported currency, otherwise the ISO code.
pub fn currency_prefix(currency: Option<&str>) -> String {
    match currency.map(str::trim) {
        None | Some("") => "$".to_string(),
        Some(code) if code.eq_ignore_ascii_case("USD") => "$".to_string(),
        Some(code) => format!("{} ", code.to_uppercase()),
    }
}

/// Insert `,` every three digits of an unsigned integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn signed(value: f64, prefix: &str, body: String) -> String {
    if value < 0.0 && body.chars().any(|c| c != '0' && c != '.' && c != ',') {
        format!("-{}{}", prefix, body)
    } else {
        format!("{}{}", prefix, body)
    }
}

/// Whole units with thousands separators: `$1,234,567`.
pub fn money_whole(value: Option<f64>, prefix: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => signed(v, prefix, group_thousands(&format!("{:.0}", v.abs()))),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Two decimals with thousands separators: `$1,234.56`.
pub fn money_cents(value: Option<f64>, prefix: &str) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let text = format!("{:.2}", v.abs());
            let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
            signed(v, prefix, format!("{}.{}", group_thousands(int), frac))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn ratio(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}", v),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Provider fraction rendered as a percentage: `0.0044` -> `0.44%`.
pub fn percent(fraction: Option<f64>) -> String {
    match fraction.filter(|v| v.is_finite()) {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Label/value pairs of the overview table, in display order.
pub fn overview_rows(metrics: &KeyMetrics) -> Vec<(&'static str, String)> {
    let prefix = currency_prefix(metrics.currency.as_deref());
    vec![
        ("Market Cap", money_whole(metrics.market_cap, &prefix)),
        ("P/E Ratio", ratio(metrics.trailing_pe)),
        ("Dividend Yield", percent(metrics.dividend_yield)),
        ("Revenue", money_whole(metrics.total_revenue, &prefix)),
        ("52-Week High", money_cents(metrics.fifty_two_week_high, &prefix)),
        ("52-Week Low", money_cents(metrics.fifty_two_week_low, &prefix)),
    ]
}
