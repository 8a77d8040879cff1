//! Chart-ready series: every breakdown flattened to ordered
//! (label, value, sample size) points.

use serde::{Deserialize, Serialize};

use crate::aggregate::{FeedbackMetrics, RegionConversion, StageMeans, StageOrders};
use crate::crosstab::CrossTab;
use crate::format::{format_sample_size, ValueFormat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub sample_size: Option<u64>,
}

/// One bar series of one chart. Stacked charts carry one series per stack
/// layer under the same `chart` id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub chart: String,
    pub name: String,
    pub format: ValueFormat,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    fn new(chart: &str, name: &str, format: ValueFormat, points: Vec<ChartPoint>) -> Self {
        Self {
            chart: chart.to_string(),
            name: name.to_string(),
            format,
            points,
        }
    }

    /// Bar annotation text, e.g. `"33.3% N=3"`.
    pub fn annotation(&self, point: &ChartPoint) -> String {
        let value = self.format.render(point.value);
        match point.sample_size {
            Some(n) => format!("{value} {}", format_sample_size(n)),
            None => value,
        }
    }
}

fn point(label: &str, value: f64, sample_size: Option<u64>) -> ChartPoint {
    ChartPoint {
        label: label.to_string(),
        value,
        sample_size,
    }
}

pub fn region_conversion(rows: &[RegionConversion]) -> ChartSeries {
    ChartSeries::new(
        "region_conversion",
        "Conversion rate (%)",
        ValueFormat::Percent,
        rows.iter()
            .map(|r| point(&r.region, r.conversion_pct, Some(r.sample_size)))
            .collect(),
    )
}

pub fn feedback_metrics(rows: &[FeedbackMetrics]) -> Vec<ChartSeries> {
    vec![
        ChartSeries::new(
            "feedback_metrics",
            "Conversion rate (%)",
            ValueFormat::Percent,
            rows.iter()
                .map(|r| point(&r.feedback, r.conversion_pct, Some(r.sample_size)))
                .collect(),
        ),
        ChartSeries::new(
            "feedback_metrics",
            "Mean orders",
            ValueFormat::OneDecimal,
            rows.iter()
                .map(|r| point(&r.feedback, r.mean_orders, None))
                .collect(),
        ),
    ]
}

pub fn stage_orders(rows: &[StageOrders]) -> ChartSeries {
    ChartSeries::new(
        "stage_orders",
        "Total orders",
        ValueFormat::Rounded,
        rows.iter()
            .map(|r| point(&r.lifecycle_stage, r.total_orders, None))
            .collect(),
    )
}

/// One stacked layer per column label; absent cells are skipped.
pub fn crosstab(table: &CrossTab) -> Vec<ChartSeries> {
    table
        .column_labels
        .iter()
        .enumerate()
        .map(|(c, column)| {
            let points = table
                .row_labels
                .iter()
                .zip(&table.cells)
                .filter_map(|(row, cells)| cells[c].map(|n| point(row, n as f64, None)))
                .collect();
            ChartSeries::new("feedback_stage_crosstab", column, ValueFormat::Count, points)
        })
        .collect()
}

pub fn stage_means(rows: &[StageMeans]) -> Vec<ChartSeries> {
    vec![
        ChartSeries::new(
            "stage_means",
            "Mean conversion",
            ValueFormat::TwoDecimals,
            rows.iter()
                .map(|r| point(&r.lifecycle_stage, r.mean_converted, None))
                .collect(),
        ),
        ChartSeries::new(
            "stage_means",
            "Mean orders",
            ValueFormat::OneDecimal,
            rows.iter()
                .map(|r| point(&r.lifecycle_stage, r.mean_orders, None))
                .collect(),
        ),
    ]
}
