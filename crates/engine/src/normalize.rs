//! Numeric normalization of funnel counters.
//!
//! Every counter cell resolves to a finite, non-negative `f64`. Cells that are
//! missing, non-numeric, non-finite or negative become `0`. The pass never
//! fails and applying it to an already-normalized table changes nothing.

use insights_core::{CounterValue, Record, RecordTable};

/// A table whose counters have been coerced to plain numbers.
pub type NormalizedTable = RecordTable<f64>;

/// A counter cell that can be coerced to a number.
pub trait CounterCell {
    fn to_counter(&self) -> f64;
}

impl CounterCell for CounterValue {
    fn to_counter(&self) -> f64 {
        normalize_counter(self)
    }
}

impl CounterCell for f64 {
    fn to_counter(&self) -> f64 {
        sanitize(*self)
    }
}

/// Coerce one raw cell. Text is trimmed before parsing.
pub fn normalize_counter(value: &CounterValue) -> f64 {
    match value {
        CounterValue::Number(n) => sanitize(*n),
        CounterValue::Text(raw) => raw.trim().parse::<f64>().map_or(0.0, sanitize),
        CounterValue::Missing => 0.0,
    }
}

fn sanitize(n: f64) -> f64 {
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

/// Normalize every counter of every row, preserving row order and labels.
pub fn normalize<C: CounterCell>(table: &RecordTable<C>) -> NormalizedTable {
    table
        .iter()
        .map(|r| Record {
            entity_id: r.entity_id.clone(),
            region: r.region.clone(),
            feedback: r.feedback.clone(),
            lifecycle_stage: r.lifecycle_stage.clone(),
            counters: r.counters.map(C::to_counter),
        })
        .collect()
}
