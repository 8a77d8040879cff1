pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::{AppConfig, OutputConfig, OutputFormat, SourceConfig, ViewPolicy, ViewsConfig};
pub use error::{InsightsError, InsightsResult};
pub use schema::{ColumnMapping, HeaderIndex, LogicalColumn};
pub use types::{
    CategoryUniverse, Counter, CounterValue, Counters, Dimension, Record, RecordTable,
};
