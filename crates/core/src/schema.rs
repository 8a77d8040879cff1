//! Source schema contract: which header names feed which logical columns,
//! and resolution of a concrete header row against that mapping.

use serde::Deserialize;
use tracing::debug;

use crate::error::{InsightsError, InsightsResult};
use crate::types::{Counter, Dimension};

/// A column the engine needs, independent of how the source names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalColumn {
    EntityId,
    Dimension(Dimension),
    Counter(Counter),
}

impl LogicalColumn {
    /// Every required column, in validation order.
    pub const REQUIRED: [LogicalColumn; 9] = [
        LogicalColumn::EntityId,
        LogicalColumn::Dimension(Dimension::Region),
        LogicalColumn::Dimension(Dimension::Feedback),
        LogicalColumn::Dimension(Dimension::LifecycleStage),
        LogicalColumn::Counter(Counter::Sent),
        LogicalColumn::Counter(Counter::Read),
        LogicalColumn::Counter(Counter::Clicked),
        LogicalColumn::Counter(Counter::Converted),
        LogicalColumn::Counter(Counter::Orders),
    ];

    fn slot(&self) -> usize {
        match self {
            LogicalColumn::EntityId => 0,
            LogicalColumn::Dimension(Dimension::Region) => 1,
            LogicalColumn::Dimension(Dimension::Feedback) => 2,
            LogicalColumn::Dimension(Dimension::LifecycleStage) => 3,
            LogicalColumn::Counter(Counter::Sent) => 4,
            LogicalColumn::Counter(Counter::Read) => 5,
            LogicalColumn::Counter(Counter::Clicked) => 6,
            LogicalColumn::Counter(Counter::Converted) => 7,
            LogicalColumn::Counter(Counter::Orders) => 8,
        }
    }
}

/// Header names of the source file, one per logical column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_entity_id")]
    pub entity_id: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_feedback")]
    pub feedback: String,
    #[serde(default = "default_lifecycle_stage")]
    pub lifecycle_stage: String,
    #[serde(default = "default_sent")]
    pub sent: String,
    #[serde(default = "default_read")]
    pub read: String,
    #[serde(default = "default_clicked")]
    pub clicked: String,
    #[serde(default = "default_converted")]
    pub converted: String,
    #[serde(default = "default_orders")]
    pub orders: String,
}

fn default_entity_id() -> String {
    "entity_id".to_string()
}
fn default_region() -> String {
    "region".to_string()
}
fn default_feedback() -> String {
    "feedback".to_string()
}
fn default_lifecycle_stage() -> String {
    "lifecycle_stage".to_string()
}
fn default_sent() -> String {
    "sent".to_string()
}
fn default_read() -> String {
    "read".to_string()
}
fn default_clicked() -> String {
    "clicked".to_string()
}
fn default_converted() -> String {
    "converted".to_string()
}
fn default_orders() -> String {
    "orders".to_string()
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            entity_id: default_entity_id(),
            region: default_region(),
            feedback: default_feedback(),
            lifecycle_stage: default_lifecycle_stage(),
            sent: default_sent(),
            read: default_read(),
            clicked: default_clicked(),
            converted: default_converted(),
            orders: default_orders(),
        }
    }
}

impl ColumnMapping {
    /// Headers of the driver-campaign spreadsheet the dashboard was first
    /// built against.
    pub fn legacy() -> Self {
        Self {
            entity_id: "user_id".to_string(),
            region: "região".to_string(),
            feedback: "feedback".to_string(),
            lifecycle_stage: "ciclo de vida".to_string(),
            sent: "enviados".to_string(),
            read: "lidos".to_string(),
            clicked: "cliques".to_string(),
            converted: "conversão".to_string(),
            orders: "pedidos".to_string(),
        }
    }

    pub fn header(&self, column: LogicalColumn) -> &str {
        match column {
            LogicalColumn::EntityId => &self.entity_id,
            LogicalColumn::Dimension(Dimension::Region) => &self.region,
            LogicalColumn::Dimension(Dimension::Feedback) => &self.feedback,
            LogicalColumn::Dimension(Dimension::LifecycleStage) => &self.lifecycle_stage,
            LogicalColumn::Counter(Counter::Sent) => &self.sent,
            LogicalColumn::Counter(Counter::Read) => &self.read,
            LogicalColumn::Counter(Counter::Clicked) => &self.clicked,
            LogicalColumn::Counter(Counter::Converted) => &self.converted,
            LogicalColumn::Counter(Counter::Orders) => &self.orders,
        }
    }
}

/// Positions of every required column within a source header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    positions: [usize; 9],
}

impl HeaderIndex {
    /// Resolve `headers` against `mapping`. Fails on the first required
    /// column whose header is absent; the error names the header.
    pub fn resolve<S: AsRef<str>>(headers: &[S], mapping: &ColumnMapping) -> InsightsResult<Self> {
        let mut positions = [0usize; 9];
        for column in LogicalColumn::REQUIRED {
            let wanted = mapping.header(column);
            let position = headers
                .iter()
                .position(|h| h.as_ref().trim() == wanted)
                .ok_or_else(|| InsightsError::MissingColumn(wanted.to_string()))?;
            positions[column.slot()] = position;
        }
        debug!(?positions, "Resolved source header row");
        Ok(Self { positions })
    }

    pub fn position(&self, column: LogicalColumn) -> usize {
        self.positions[column.slot()]
    }
}
