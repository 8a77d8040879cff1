//! One full recomputation pass: filter → normalize → rates and breakdowns.

use chrono::{DateTime, Utc};
use insights_core::{CategoryUniverse, InsightsResult, RecordTable, ViewsConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::aggregate::{
    DimensionalAggregator, FeedbackMetrics, RegionConversion, StageMeans, StageOrders,
};
use crate::crosstab::CrossTab;
use crate::filter::FilterSelection;
use crate::normalize::normalize;
use crate::rates::{FunnelSummary, SummaryCards};
use crate::series::{self, ChartSeries};

/// Everything the dashboard shows for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub session_id: Option<Uuid>,
    pub source_rows: usize,
    pub filtered_rows: usize,
    pub summary: FunnelSummary,
    pub cards: SummaryCards,
    pub region_conversion: Vec<RegionConversion>,
    pub feedback_metrics: Vec<FeedbackMetrics>,
    pub stage_orders: Vec<StageOrders>,
    pub feedback_stage_crosstab: CrossTab,
    pub stage_means: Vec<StageMeans>,
    pub generated_at: DateTime<Utc>,
}

impl DashboardReport {
    /// All charts as ordered series, in dashboard order.
    pub fn chart_series(&self) -> Vec<ChartSeries> {
        let mut charts = vec![series::region_conversion(&self.region_conversion)];
        charts.extend(series::feedback_metrics(&self.feedback_metrics));
        charts.push(series::stage_orders(&self.stage_orders));
        charts.extend(series::crosstab(&self.feedback_stage_crosstab));
        charts.extend(series::stage_means(&self.stage_means));
        charts
    }

    pub fn to_json(&self) -> InsightsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs complete passes with a fixed set of view policies.
#[derive(Debug, Clone, Default)]
pub struct InsightsPipeline {
    views: ViewsConfig,
}

impl InsightsPipeline {
    pub fn new(views: ViewsConfig) -> Self {
        Self { views }
    }

    pub fn views(&self) -> &ViewsConfig {
        &self.views
    }

    /// Filter `source` by `selection` and compute every card and view over
    /// the surviving rows. `source` is only read.
    pub fn run(
        &self,
        source: &RecordTable,
        universe: &CategoryUniverse,
        selection: &FilterSelection,
    ) -> DashboardReport {
        let filtered = selection.apply(source);
        debug!(
            source_rows = source.len(),
            filtered_rows = filtered.len(),
            "Selection applied"
        );
        let table = normalize(&filtered);

        let summary = FunnelSummary::compute(&table);
        let aggregator = DimensionalAggregator::new(universe, self.views);

        let report = DashboardReport {
            session_id: None,
            source_rows: source.len(),
            filtered_rows: table.len(),
            cards: summary.cards(),
            summary,
            region_conversion: aggregator.conversion_by_region(&table),
            feedback_metrics: aggregator.feedback_metrics(&table),
            stage_orders: aggregator.orders_by_stage(&table),
            feedback_stage_crosstab: aggregator.feedback_stage_crosstab(&table),
            stage_means: aggregator.stage_means(&table),
            generated_at: Utc::now(),
        };

        metrics::counter!("insights.pipeline.runs").increment(1);
        metrics::counter!("insights.rows.filtered").increment(report.filtered_rows as u64);
        info!(
            filtered_rows = report.filtered_rows,
            read_rate = %report.cards.read_rate,
            conversion_rate = %report.cards.conversion_rate,
            total_orders = %report.cards.total_orders,
            "Insights pass complete"
        );

        report
    }
}
