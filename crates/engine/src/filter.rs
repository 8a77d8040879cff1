//! Selection filtering: keeps rows whose region, feedback and lifecycle
//! stage are all among the selected values.

use insights_core::{CategoryUniverse, Dimension, Record, RecordTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Allowed values per dimension. A row survives only if every one of its
/// three labels is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub regions: HashSet<String>,
    pub feedback: HashSet<String>,
    pub lifecycle_stages: HashSet<String>,
}

impl FilterSelection {
    /// Select every value the universe observed at load time.
    pub fn all(universe: &CategoryUniverse) -> Self {
        let collect =
            |d: Dimension| -> HashSet<String> { universe.values(d).iter().cloned().collect() };
        Self {
            regions: collect(Dimension::Region),
            feedback: collect(Dimension::Feedback),
            lifecycle_stages: collect(Dimension::LifecycleStage),
        }
    }

    /// Replace the allowed values of one dimension.
    pub fn with<I, S>(mut self, dimension: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.values_mut(dimension) = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(&self, dimension: Dimension) -> &HashSet<String> {
        match dimension {
            Dimension::Region => &self.regions,
            Dimension::Feedback => &self.feedback,
            Dimension::LifecycleStage => &self.lifecycle_stages,
        }
    }

    fn values_mut(&mut self, dimension: Dimension) -> &mut HashSet<String> {
        match dimension {
            Dimension::Region => &mut self.regions,
            Dimension::Feedback => &mut self.feedback,
            Dimension::LifecycleStage => &mut self.lifecycle_stages,
        }
    }

    pub fn matches<C>(&self, record: &Record<C>) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| self.values(*d).contains(record.dimension(*d)))
    }

    /// Whether every value allowed by `self` is also allowed by `other`.
    pub fn is_subset(&self, other: &FilterSelection) -> bool {
        Dimension::ALL
            .iter()
            .all(|d| self.values(*d).is_subset(other.values(*d)))
    }

    /// Apply the selection, producing a new table in the original row order.
    pub fn apply<C: Clone>(&self, table: &RecordTable<C>) -> RecordTable<C> {
        table.iter().filter(|r| self.matches(*r)).cloned().collect()
    }
}
