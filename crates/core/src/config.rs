use serde::Deserialize;
use std::path::Path;

use crate::schema::ColumnMapping;

/// Root application configuration. Loaded from an optional TOML file, then
/// environment variables with the prefix `CAMPAIGN_INSIGHTS__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Path of the CSV or spreadsheet file to analyse.
    #[serde(default)]
    pub path: Option<String>,
    /// Worksheet name or 0-based index; first sheet when unset.
    #[serde(default)]
    pub sheet: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

/// Missing-category policy of one aggregation view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ViewPolicy {
    #[serde(default)]
    pub zero_fill_missing_categories: bool,
}

impl ViewPolicy {
    pub const OBSERVED: ViewPolicy = ViewPolicy {
        zero_fill_missing_categories: false,
    };
    pub const ZERO_FILLED: ViewPolicy = ViewPolicy {
        zero_fill_missing_categories: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_observed")]
    pub region_conversion: ViewPolicy,
    #[serde(default = "default_observed")]
    pub feedback_metrics: ViewPolicy,
    #[serde(default = "default_observed")]
    pub stage_orders: ViewPolicy,
    #[serde(default = "default_zero_filled")]
    pub feedback_stage_crosstab: ViewPolicy,
    #[serde(default = "default_observed")]
    pub stage_means: ViewPolicy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

// Default functions
fn default_delimiter() -> String {
    ",".to_string()
}
fn default_observed() -> ViewPolicy {
    ViewPolicy::OBSERVED
}
fn default_zero_filled() -> ViewPolicy {
    ViewPolicy::ZERO_FILLED
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: None,
            sheet: None,
            delimiter: default_delimiter(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            region_conversion: default_observed(),
            feedback_metrics: default_observed(),
            stage_orders: default_observed(),
            feedback_stage_crosstab: default_zero_filled(),
            stage_means: default_observed(),
        }
    }
}

impl SourceConfig {
    /// The CSV delimiter as a single byte.
    pub fn delimiter_byte(&self) -> Result<u8, crate::InsightsError> {
        match self.delimiter.as_bytes() {
            [b] => Ok(*b),
            _ => Err(crate::InsightsError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ))),
        }
    }
}

impl AppConfig {
    /// Load configuration from an optional config file and environment variables.
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
