//! Record table data model: contact rows, funnel counters, and the
//! categorical dimensions the dashboard filters and groups by.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Categorical columns a record can be filtered and grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Region,
    Feedback,
    LifecycleStage,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [
        Dimension::Region,
        Dimension::Feedback,
        Dimension::LifecycleStage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Region => "region",
            Dimension::Feedback => "feedback",
            Dimension::LifecycleStage => "lifecycle_stage",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Funnel counter columns, in funnel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    Sent,
    Read,
    Clicked,
    Converted,
    Orders,
}

impl Counter {
    pub const ALL: [Counter; 5] = [
        Counter::Sent,
        Counter::Read,
        Counter::Clicked,
        Counter::Converted,
        Counter::Orders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Counter::Sent => "sent",
            Counter::Read => "read",
            Counter::Clicked => "clicked",
            Counter::Converted => "converted",
            Counter::Orders => "orders",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A counter cell exactly as the source delivered it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CounterValue {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl CounterValue {
    /// Classify a raw text cell. Blank cells are `Missing`; anything that
    /// parses as a float is a `Number`; everything else is kept as `Text`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CounterValue::Missing
        } else if let Ok(n) = trimmed.parse::<f64>() {
            CounterValue::Number(n)
        } else {
            CounterValue::Text(raw.to_string())
        }
    }
}

impl From<f64> for CounterValue {
    fn from(value: f64) -> Self {
        CounterValue::Number(value)
    }
}

impl From<i64> for CounterValue {
    fn from(value: i64) -> Self {
        CounterValue::Number(value as f64)
    }
}

impl From<&str> for CounterValue {
    fn from(value: &str) -> Self {
        CounterValue::Text(value.to_string())
    }
}

impl<T: Into<CounterValue>> From<Option<T>> for CounterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CounterValue::Missing, Into::into)
    }
}

/// The five funnel counters of one record (or one aggregate).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Counters<T> {
    pub sent: T,
    pub read: T,
    pub clicked: T,
    pub converted: T,
    pub orders: T,
}

impl<T> Counters<T> {
    pub fn get(&self, counter: Counter) -> &T {
        match counter {
            Counter::Sent => &self.sent,
            Counter::Read => &self.read,
            Counter::Clicked => &self.clicked,
            Counter::Converted => &self.converted,
            Counter::Orders => &self.orders,
        }
    }

    pub fn get_mut(&mut self, counter: Counter) -> &mut T {
        match counter {
            Counter::Sent => &mut self.sent,
            Counter::Read => &mut self.read,
            Counter::Clicked => &mut self.clicked,
            Counter::Converted => &mut self.converted,
            Counter::Orders => &mut self.orders,
        }
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Counters<U> {
        Counters {
            sent: f(&self.sent),
            read: f(&self.read),
            clicked: f(&self.clicked),
            converted: f(&self.converted),
            orders: f(&self.orders),
        }
    }
}

/// One contacted entity. `C` is the counter cell type: raw [`CounterValue`]
/// straight from a loader, or `f64` once normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<C = CounterValue> {
    pub entity_id: String,
    pub region: String,
    pub feedback: String,
    pub lifecycle_stage: String,
    pub counters: Counters<C>,
}

impl<C: Default> Record<C> {
    pub fn new(
        entity_id: impl Into<String>,
        region: impl Into<String>,
        feedback: impl Into<String>,
        lifecycle_stage: impl Into<String>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            region: region.into(),
            feedback: feedback.into(),
            lifecycle_stage: lifecycle_stage.into(),
            counters: Counters::default(),
        }
    }
}

impl<C> Record<C> {
    pub fn with_counter(mut self, counter: Counter, value: impl Into<C>) -> Self {
        *self.counters.get_mut(counter) = value.into();
        self
    }

    pub fn dimension(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Region => &self.region,
            Dimension::Feedback => &self.feedback,
            Dimension::LifecycleStage => &self.lifecycle_stage,
        }
    }
}

/// Ordered rows of a loaded (or filtered) dataset. Tables are replaced,
/// never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordTable<C = CounterValue> {
    rows: Vec<Record<C>>,
}

impl<C> RecordTable<C> {
    pub fn new(rows: Vec<Record<C>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record<C>] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record<C>> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn into_rows(self) -> Vec<Record<C>> {
        self.rows
    }
}

impl<C> Default for RecordTable<C> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<C> FromIterator<Record<C>> for RecordTable<C> {
    fn from_iter<I: IntoIterator<Item = Record<C>>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl<'a, C> IntoIterator for &'a RecordTable<C> {
    type Item = &'a Record<C>;
    type IntoIter = std::slice::Iter<'a, Record<C>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Distinct values of every dimension, captured once when a table is loaded.
///
/// Values keep first-appearance order. The snapshot never changes afterwards,
/// so default filter selections cannot drift as filtered copies come and go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUniverse {
    regions: Vec<String>,
    feedback: Vec<String>,
    lifecycle_stages: Vec<String>,
}

impl CategoryUniverse {
    pub fn snapshot<C>(table: &RecordTable<C>) -> Self {
        Self {
            regions: distinct(table, Dimension::Region),
            feedback: distinct(table, Dimension::Feedback),
            lifecycle_stages: distinct(table, Dimension::LifecycleStage),
        }
    }

    pub fn values(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Region => &self.regions,
            Dimension::Feedback => &self.feedback,
            Dimension::LifecycleStage => &self.lifecycle_stages,
        }
    }

    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.values(dimension).iter().any(|v| v == value)
    }
}

fn distinct<C>(table: &RecordTable<C>, dimension: Dimension) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .iter()
        .map(|r| r.dimension(dimension))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
