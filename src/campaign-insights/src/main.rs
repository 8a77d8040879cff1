//! Campaign Insights: funnel and segment breakdowns for a campaign-contact
//! dataset.
//!
//! Loads one CSV or spreadsheet source, applies the selection given on the
//! command line, and prints the dashboard as text or JSON.

mod render;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use insights_core::{AppConfig, ColumnMapping, Dimension, OutputFormat};
use insights_engine::{FilterSelection, SessionRegistry};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DimensionArg {
    Region,
    Feedback,
    Stage,
}

impl From<DimensionArg> for Dimension {
    fn from(arg: DimensionArg) -> Self {
        match arg {
            DimensionArg::Region => Dimension::Region,
            DimensionArg::Feedback => Dimension::Feedback,
            DimensionArg::Stage => Dimension::LifecycleStage,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "campaign-insights")]
#[command(about = "Funnel rates and segment breakdowns for campaign-contact data")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Source file, .csv or a spreadsheet (overrides config)
    #[arg(long, env = "CAMPAIGN_INSIGHTS__SOURCE__PATH")]
    source: Option<String>,

    /// Worksheet name or 0-based index (overrides config)
    #[arg(long)]
    sheet: Option<String>,

    /// CSV field delimiter (overrides config)
    #[arg(long)]
    delimiter: Option<String>,

    /// Use the Portuguese column headers of the legacy campaign sheet
    #[arg(long, default_value_t = false)]
    legacy_columns: bool,

    /// Regions to keep; all loaded regions when omitted
    #[arg(long, value_delimiter = ',')]
    region: Vec<String>,

    /// Feedback values to keep; all when omitted
    #[arg(long, value_delimiter = ',')]
    feedback: Vec<String>,

    /// Lifecycle stages to keep; all when omitted
    #[arg(long, value_delimiter = ',')]
    stage: Vec<String>,

    /// Select no values at all for a dimension; every view comes out empty
    #[arg(long, value_enum, value_delimiter = ',')]
    none: Vec<DimensionArg>,

    /// Output format (overrides config)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "campaign_insights=info,insights_engine=info,insights_ingest=info".into()
            }),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;

    // Apply CLI overrides
    if let Some(source) = cli.source {
        config.source.path = Some(source);
    }
    if let Some(sheet) = cli.sheet {
        config.source.sheet = Some(sheet);
    }
    if let Some(delimiter) = cli.delimiter {
        config.source.delimiter = delimiter;
    }
    if cli.legacy_columns {
        config.columns = ColumnMapping::legacy();
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    info!(
        source = ?config.source.path,
        sheet = ?config.source.sheet,
        format = ?config.output.format,
        "Configuration loaded"
    );

    let table = insights_ingest::load_table(&config.source, &config.columns)
        .context("failed to load source table")?;

    let registry = SessionRegistry::new(config.views);
    let session = registry.open(Arc::new(table));

    let selection = narrow_selection(
        registry.default_selection(&session)?,
        [
            (Dimension::Region, cli.region),
            (Dimension::Feedback, cli.feedback),
            (Dimension::LifecycleStage, cli.stage),
        ],
        &cli.none,
    );

    let report = registry.run(&session, &selection)?;
    match config.output.format {
        OutputFormat::Text => print!("{}", render::render_text(&report)),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    registry.close(&session);
    Ok(())
}

/// An explicit `--config` file must load; only the implicit environment-only
/// configuration falls back to defaults.
fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    match path {
        Some(path) => AppConfig::load(Some(path))
            .with_context(|| format!("failed to load configuration from {}", path.display())),
        None => Ok(AppConfig::load(None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load config, using defaults");
            AppConfig::default()
        })),
    }
}

/// Replace each dimension given a non-empty value list, then clear every
/// dimension named in `none`.
fn narrow_selection(
    mut selection: FilterSelection,
    overrides: [(Dimension, Vec<String>); 3],
    none: &[DimensionArg],
) -> FilterSelection {
    for (dimension, values) in overrides {
        if !values.is_empty() {
            selection = selection.with(dimension, values);
        }
    }
    for arg in none {
        selection = selection.with(Dimension::from(*arg), Vec::<String>::new());
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use insights_core::{CategoryUniverse, Record, RecordTable};
    use std::fs;

    fn temp_config(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "campaign-insights-{}-{name}.toml",
            std::process::id()
        ));
        fs::write(&path, body).unwrap();
        path
    }

    fn table() -> RecordTable {
        RecordTable::new(vec![
            Record::new("1", "North", "Good", "Active"),
            Record::new("2", "South", "Bad", "Churned"),
        ])
    }

    fn universe() -> CategoryUniverse {
        CategoryUniverse::snapshot(&table())
    }

    #[test]
    fn test_explicit_config_with_bad_value_fails() {
        let path = temp_config(
            "bad-value",
            "[columns]\nentity_id = \"user_id\"\n\n\
             [views.region_conversion]\nzero_fill_missing_categories = \"yes please\"\n",
        );
        let result = load_config(Some(&path));
        fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().starts_with("failed to load configuration from"));
    }

    #[test]
    fn test_explicit_config_missing_file_fails() {
        let path = std::env::temp_dir().join("campaign-insights-no-such-config.toml");
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_config_keeps_mapping() {
        let path = temp_config("legacy", "[columns]\nentity_id = \"user_id\"\n");
        let config = load_config(Some(&path)).unwrap();
        fs::remove_file(&path).ok();
        assert_eq!(config.columns.entity_id, "user_id");
    }

    #[test]
    fn test_narrow_selection_overrides_only_given_dimensions() {
        let selection = narrow_selection(
            FilterSelection::all(&universe()),
            [
                (Dimension::Region, vec!["South".to_string()]),
                (Dimension::Feedback, Vec::new()),
                (Dimension::LifecycleStage, Vec::new()),
            ],
            &[],
        );
        assert_eq!(selection.values(Dimension::Region).len(), 1);
        assert_eq!(selection.values(Dimension::Feedback).len(), 2);
        assert_eq!(selection.values(Dimension::LifecycleStage).len(), 2);
    }

    #[test]
    fn test_none_clears_dimension() {
        let selection = narrow_selection(
            FilterSelection::all(&universe()),
            [
                (Dimension::Region, Vec::new()),
                (Dimension::Feedback, Vec::new()),
                (Dimension::LifecycleStage, vec!["Active".to_string()]),
            ],
            &[DimensionArg::Stage],
        );
        assert!(selection.values(Dimension::LifecycleStage).is_empty());
        assert_eq!(selection.values(Dimension::Region).len(), 2);
        assert!(selection.apply(&table()).is_empty());
    }

    #[test]
    fn test_none_flag_parses() {
        let cli = Cli::parse_from(["campaign-insights", "--none", "region,feedback"]);
        assert_eq!(cli.none, [DimensionArg::Region, DimensionArg::Feedback]);
    }
}
