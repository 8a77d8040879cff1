//! Display formatting shared by the summary cards and chart annotations.

use serde::{Deserialize, Serialize};

/// Render a ratio as a percentage with one decimal place (`0.0467` → `"4.7%"`).
pub fn format_rate(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Render a total as a whole number, truncating toward zero.
pub fn format_whole(value: f64) -> String {
    (value.trunc() as i64).to_string()
}

pub fn format_sample_size(sample_size: u64) -> String {
    format!("N={sample_size}")
}

/// How a chart series' values are annotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Value already scaled to percent; one decimal and a `%` sign.
    Percent,
    OneDecimal,
    TwoDecimals,
    /// Rounded to the nearest whole number.
    Rounded,
    /// Integer count.
    Count,
}

impl ValueFormat {
    pub fn render(&self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format!("{value:.1}%"),
            ValueFormat::OneDecimal => format!("{value:.1}"),
            ValueFormat::TwoDecimals => format!("{value:.2}"),
            ValueFormat::Rounded => format!("{value:.0}"),
            ValueFormat::Count => format_whole(value),
        }
    }
}
