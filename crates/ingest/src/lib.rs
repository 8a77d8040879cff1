//! Source loaders. Each turns one file into a raw `RecordTable`, validating
//! the header row against the configured `ColumnMapping` before reading any
//! data rows.

pub mod csv_source;
pub mod excel_source;

use insights_core::{
    ColumnMapping, Counter, CounterValue, Dimension, HeaderIndex, InsightsError, InsightsResult,
    LogicalColumn, Record, RecordTable, SourceConfig,
};
use std::path::Path;
use tracing::info;

pub use csv_source::CsvSource;
pub use excel_source::ExcelSource;

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xls", "xlsm", "xlsb", "ods"];

/// Load the table named by `source.path`, picking the reader from the file
/// extension.
pub fn load_table(source: &SourceConfig, mapping: &ColumnMapping) -> InsightsResult<RecordTable> {
    let path = source
        .path
        .as_deref()
        .ok_or_else(|| InsightsError::Config("no source path configured".to_string()))?;
    let path = Path::new(path);
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let table = if extension == "csv" {
        CsvSource::new(source.delimiter_byte()?).load(path, mapping)?
    } else if SPREADSHEET_EXTENSIONS.contains(&extension.as_str()) {
        ExcelSource::new(source.sheet.clone()).load(path, mapping)?
    } else {
        return Err(InsightsError::UnsupportedSource(path.display().to_string()));
    };

    info!(path = %path.display(), rows = table.len(), "Source table loaded");
    Ok(table)
}

/// Build one record from a data row, given accessors for label and counter
/// cells by column position.
pub(crate) fn assemble_record(
    index: &HeaderIndex,
    label: impl Fn(usize) -> String,
    counter: impl Fn(usize) -> CounterValue,
) -> Record {
    let mut record = Record::new(
        label(index.position(LogicalColumn::EntityId)),
        label(index.position(LogicalColumn::Dimension(Dimension::Region))),
        label(index.position(LogicalColumn::Dimension(Dimension::Feedback))),
        label(index.position(LogicalColumn::Dimension(Dimension::LifecycleStage))),
    );
    for c in Counter::ALL {
        *record.counters.get_mut(c) = counter(index.position(LogicalColumn::Counter(c)));
    }
    record
}
