//! Plain-text dashboard rendering.

use insights_engine::{ChartSeries, DashboardReport};

const CARD_WIDTH: usize = 16;

pub fn render_text(report: &DashboardReport) -> String {
    let mut out = format!(
        "Campaign insights ({} of {} rows selected)\n\n",
        report.filtered_rows, report.source_rows
    );
    let cards = &report.cards;
    for (title, value) in [
        ("Read rate", &cards.read_rate),
        ("Click rate", &cards.click_rate),
        ("Conversion rate", &cards.conversion_rate),
        ("Total orders", &cards.total_orders),
    ] {
        out.push_str(&format!("  {title:<CARD_WIDTH$}{value}\n"));
    }

    for series in report.chart_series() {
        out.push('\n');
        out.push_str(&render_series(&series));
    }
    out
}

fn render_series(series: &ChartSeries) -> String {
    let mut out = format!("[{}] {}\n", series.chart, series.name);
    if series.points.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let width = series
        .points
        .iter()
        .map(|p| p.label.chars().count())
        .max()
        .unwrap_or(0);
    for point in &series.points {
        out.push_str(&format!(
            "  {:<width$}  {}\n",
            point.label,
            series.annotation(point)
        ));
    }
    out
}
