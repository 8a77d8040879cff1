//! Dimensional breakdowns: grouped means, sums and counts per category,
//! one result table per dashboard chart.
//!
//! Labels come out in ascending order so bars keep their position between
//! renders. By default a view only lists categories present in the table it
//! was given; a view whose [`ViewPolicy`] zero-fills also lists every
//! load-time category, with zero values and a sample size of `0`. An empty
//! table always produces an empty view.

use insights_core::{CategoryUniverse, Dimension, ViewPolicy, ViewsConfig};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::crosstab::CrossTab;
use crate::normalize::NormalizedTable;

/// Mean conversion of one region, as a percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConversion {
    pub region: String,
    pub conversion_pct: f64,
    pub sample_size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackMetrics {
    pub feedback: String,
    pub conversion_pct: f64,
    pub mean_orders: f64,
    pub sample_size: u64,
}

/// Orders of one lifecycle stage, summed per entity first and then per stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageOrders {
    pub lifecycle_stage: String,
    pub total_orders: f64,
    /// Distinct entities contributing to the stage.
    pub entities: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageMeans {
    pub lifecycle_stage: String,
    pub mean_converted: f64,
    pub mean_orders: f64,
    pub sample_size: u64,
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupStats {
    rows: u64,
    converted: f64,
    orders: f64,
}

impl GroupStats {
    fn push(&mut self, converted: f64, orders: f64) {
        self.rows += 1;
        self.converted += converted;
        self.orders += orders;
    }

    fn mean_converted(&self) -> f64 {
        mean(self.converted, self.rows)
    }

    fn mean_orders(&self) -> f64 {
        mean(self.orders, self.rows)
    }
}

fn mean(sum: f64, rows: u64) -> f64 {
    if rows > 0 {
        sum / rows as f64
    } else {
        0.0
    }
}

fn group_by(table: &NormalizedTable, dimension: Dimension) -> BTreeMap<&str, GroupStats> {
    let mut groups: BTreeMap<&str, GroupStats> = BTreeMap::new();
    for record in table {
        groups
            .entry(record.dimension(dimension))
            .or_default()
            .push(record.counters.converted, record.counters.orders);
    }
    groups
}

/// Computes every breakdown view against one load-time category universe.
pub struct DimensionalAggregator<'a> {
    universe: &'a CategoryUniverse,
    views: ViewsConfig,
}

impl<'a> DimensionalAggregator<'a> {
    pub fn new(universe: &'a CategoryUniverse, views: ViewsConfig) -> Self {
        Self { universe, views }
    }

    /// Output labels of a one-dimensional view, ascending.
    fn labels<'t>(
        &self,
        observed: impl Iterator<Item = &'t str>,
        dimension: Dimension,
        policy: ViewPolicy,
        table: &NormalizedTable,
    ) -> Vec<String> {
        if table.is_empty() {
            return Vec::new();
        }
        let mut labels: BTreeSet<String> = observed.map(str::to_string).collect();
        if policy.zero_fill_missing_categories {
            labels.extend(self.universe.values(dimension).iter().cloned());
        }
        labels.into_iter().collect()
    }

    /// Mean `converted` ×100 and row count per region.
    pub fn conversion_by_region(&self, table: &NormalizedTable) -> Vec<RegionConversion> {
        let groups = group_by(table, Dimension::Region);
        self.labels(
            groups.keys().copied(),
            Dimension::Region,
            self.views.region_conversion,
            table,
        )
        .into_iter()
        .map(|region| {
            let stats = groups.get(region.as_str()).copied().unwrap_or_default();
            RegionConversion {
                conversion_pct: stats.mean_converted() * 100.0,
                sample_size: stats.rows,
                region,
            }
        })
        .collect()
    }

    /// Mean `converted` ×100, mean `orders` and row count per feedback label.
    pub fn feedback_metrics(&self, table: &NormalizedTable) -> Vec<FeedbackMetrics> {
        let groups = group_by(table, Dimension::Feedback);
        self.labels(
            groups.keys().copied(),
            Dimension::Feedback,
            self.views.feedback_metrics,
            table,
        )
        .into_iter()
        .map(|feedback| {
            let stats = groups.get(feedback.as_str()).copied().unwrap_or_default();
            FeedbackMetrics {
                conversion_pct: stats.mean_converted() * 100.0,
                mean_orders: stats.mean_orders(),
                sample_size: stats.rows,
                feedback,
            }
        })
        .collect()
    }

    /// Total orders per lifecycle stage.
    ///
    /// Orders are first summed per (entity, stage) so an entity with several
    /// rows under one stage is collapsed to a single stage-scoped total, then
    /// those totals are summed per stage.
    pub fn orders_by_stage(&self, table: &NormalizedTable) -> Vec<StageOrders> {
        let mut per_entity: BTreeMap<(&str, &str), f64> = BTreeMap::new();
        for record in table {
            *per_entity
                .entry((record.entity_id.as_str(), record.lifecycle_stage.as_str()))
                .or_default() += record.counters.orders;
        }

        let mut per_stage: BTreeMap<&str, (f64, u64)> = BTreeMap::new();
        for ((_, stage), orders) in &per_entity {
            let entry = per_stage.entry(*stage).or_default();
            entry.0 += orders;
            entry.1 += 1;
        }

        self.labels(
            per_stage.keys().copied(),
            Dimension::LifecycleStage,
            self.views.stage_orders,
            table,
        )
        .into_iter()
        .map(|lifecycle_stage| {
            let (total_orders, entities) = per_stage
                .get(lifecycle_stage.as_str())
                .copied()
                .unwrap_or_default();
            StageOrders {
                lifecycle_stage,
                total_orders,
                entities,
            }
        })
        .collect()
    }

    /// Record counts with feedback as rows and lifecycle stage as columns.
    pub fn feedback_stage_crosstab(&self, table: &NormalizedTable) -> CrossTab {
        CrossTab::count(
            table,
            Dimension::Feedback,
            Dimension::LifecycleStage,
            self.views.feedback_stage_crosstab,
        )
    }

    /// Mean `converted` and mean `orders` per lifecycle stage.
    pub fn stage_means(&self, table: &NormalizedTable) -> Vec<StageMeans> {
        let groups = group_by(table, Dimension::LifecycleStage);
        self.labels(
            groups.keys().copied(),
            Dimension::LifecycleStage,
            self.views.stage_means,
            table,
        )
        .into_iter()
        .map(|lifecycle_stage| {
            let stats = groups
                .get(lifecycle_stage.as_str())
                .copied()
                .unwrap_or_default();
            StageMeans {
                mean_converted: stats.mean_converted(),
                mean_orders: stats.mean_orders(),
                sample_size: stats.rows,
                lifecycle_stage,
            }
        })
        .collect()
    }
}
