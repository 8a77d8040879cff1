//! Two-dimensional record counts for stacked bar charts.

use insights_core::{Dimension, ViewPolicy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::normalize::NormalizedTable;

/// Counts of records per (row label, column label) pair.
///
/// Axes hold the labels observed in the counted table, ascending. Pairs with
/// no records are `Some(0)` when the table was built zero-filled and `None`
/// otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_dimension: Dimension,
    pub column_dimension: Dimension,
    pub row_labels: Vec<String>,
    pub column_labels: Vec<String>,
    pub cells: Vec<Vec<Option<u64>>>,
}

impl CrossTab {
    pub fn count(
        table: &NormalizedTable,
        rows: Dimension,
        columns: Dimension,
        policy: ViewPolicy,
    ) -> Self {
        let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
        let mut column_labels = BTreeSet::new();
        for record in table {
            let column = record.dimension(columns);
            column_labels.insert(column);
            *counts.entry((record.dimension(rows), column)).or_default() += 1;
        }

        let row_labels: BTreeSet<&str> = counts.keys().map(|(row, _)| *row).collect();
        let missing = if policy.zero_fill_missing_categories {
            Some(0)
        } else {
            None
        };
        let cells: Vec<Vec<Option<u64>>> = row_labels
            .iter()
            .map(|row| {
                column_labels
                    .iter()
                    .map(|column| counts.get(&(*row, *column)).copied().or(missing))
                    .collect()
            })
            .collect();

        Self {
            row_dimension: rows,
            column_dimension: columns,
            row_labels: row_labels.into_iter().map(str::to_string).collect(),
            column_labels: column_labels.into_iter().map(str::to_string).collect(),
            cells,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<u64> {
        let r = self.row_labels.iter().position(|l| l == row)?;
        let c = self.column_labels.iter().position(|l| l == column)?;
        self.cells[r][c]
    }

    /// Sum of a row's counts; absent cells count as zero.
    pub fn row_total(&self, row: &str) -> u64 {
        self.row_labels
            .iter()
            .position(|l| l == row)
            .map_or(0, |r| self.cells[r].iter().flatten().sum())
    }

    pub fn column_total(&self, column: &str) -> u64 {
        self.column_labels
            .iter()
            .position(|l| l == column)
            .map_or(0, |c| self.cells.iter().filter_map(|cells| cells[c]).sum())
    }
}
