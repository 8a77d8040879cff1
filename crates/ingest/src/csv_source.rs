use csv::{ReaderBuilder, StringRecord, Trim};
use insights_core::{ColumnMapping, CounterValue, HeaderIndex, InsightsResult, RecordTable};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::assemble_record;

/// Delimited-text reader. The first row is the header row; short rows are
/// accepted and their absent cells read as blank.
#[derive(Debug, Clone, Copy)]
pub struct CsvSource {
    delimiter: u8,
}

impl Default for CsvSource {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvSource {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn load(&self, path: &Path, mapping: &ColumnMapping) -> InsightsResult<RecordTable> {
        let file = File::open(path)?;
        self.read(file, mapping)
    }

    pub fn read<R: Read>(&self, input: R, mapping: &ColumnMapping) -> InsightsResult<RecordTable> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(input);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let index = HeaderIndex::resolve(&headers, mapping)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let row = result?;
            rows.push(assemble_record(
                &index,
                |i| label(&row, i),
                |i| CounterValue::from_raw(row.get(i).unwrap_or("")),
            ));
        }
        debug!(rows = rows.len(), columns = headers.len(), "CSV rows read");
        Ok(RecordTable::new(rows))
    }
}

fn label(row: &StringRecord, i: usize) -> String {
    row.get(i).unwrap_or_default().to_string()
}
