use calamine::{open_workbook_auto, Data, Range, Reader};
use insights_core::{
    ColumnMapping, CounterValue, HeaderIndex, InsightsError, InsightsResult, RecordTable,
};
use std::path::Path;
use tracing::debug;

use crate::assemble_record;

/// Workbook reader (xlsx, xls, xlsm, xlsb, ods). The first row of the chosen
/// worksheet is the header row.
#[derive(Debug, Clone, Default)]
pub struct ExcelSource {
    /// Worksheet name, or 0-based index when it parses as one. First sheet
    /// when unset.
    sheet: Option<String>,
}

impl ExcelSource {
    pub fn new(sheet: Option<String>) -> Self {
        Self { sheet }
    }

    pub fn load(&self, path: &Path, mapping: &ColumnMapping) -> InsightsResult<RecordTable> {
        let range = self.worksheet(path)?;
        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        rows_to_table(&rows, mapping)
    }

    fn worksheet(&self, path: &Path) -> InsightsResult<Range<Data>> {
        let mut workbook = open_workbook_auto(path).map_err(spreadsheet_error)?;
        if workbook.sheet_names().is_empty() {
            return Err(InsightsError::Spreadsheet(format!(
                "{} has no worksheets",
                path.display()
            )));
        }
        match self.sheet.as_deref() {
            Some(name) => match name.parse::<usize>() {
                Ok(idx) => workbook
                    .worksheet_range_at(idx)
                    .ok_or_else(|| InsightsError::Spreadsheet(format!("no sheet at index {idx}")))?
                    .map_err(spreadsheet_error),
                Err(_) => workbook.worksheet_range(name).map_err(spreadsheet_error),
            },
            None => workbook
                .worksheet_range_at(0)
                .ok_or_else(|| InsightsError::Spreadsheet("no first sheet".to_string()))?
                .map_err(spreadsheet_error),
        }
    }
}

fn spreadsheet_error(err: impl std::fmt::Display) -> InsightsError {
    InsightsError::Spreadsheet(err.to_string())
}

/// Build a table from worksheet rows; `rows[0]` is the header row. A sheet
/// with no rows at all has no header and fails on the first mapped column.
pub fn rows_to_table(rows: &[Vec<Data>], mapping: &ColumnMapping) -> InsightsResult<RecordTable> {
    let (header, body) = match rows.split_first() {
        Some((header, body)) => (header.as_slice(), body),
        None => (&[][..], &[][..]),
    };
    let headers: Vec<String> = header.iter().map(cell_to_label).collect();
    let index = HeaderIndex::resolve(&headers, mapping)?;

    let records: Vec<_> = body
        .iter()
        .map(|row| {
            assemble_record(
                &index,
                |i| row.get(i).map(cell_to_label).unwrap_or_default(),
                |i| row.get(i).map(cell_to_counter).unwrap_or_default(),
            )
        })
        .collect();
    debug!(rows = records.len(), columns = headers.len(), "Worksheet rows read");
    Ok(RecordTable::new(records))
}

pub fn cell_to_counter(cell: &Data) -> CounterValue {
    match cell {
        Data::Int(n) => CounterValue::Number(*n as f64),
        Data::Float(f) => CounterValue::Number(*f),
        Data::Bool(b) => CounterValue::Number(if *b { 1.0 } else { 0.0 }),
        Data::String(s) => CounterValue::from_raw(s),
        Data::Empty | Data::Error(_) => CounterValue::Missing,
        other => CounterValue::Text(other.to_string()),
    }
}

pub fn cell_to_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty | Data::Error(_) => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;
    use insights_core::Counter;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn header() -> Vec<Data> {
        [
            "entity_id",
            "region",
            "feedback",
            "lifecycle_stage",
            "sent",
            "read",
            "clicked",
            "converted",
            "orders",
        ]
        .into_iter()
        .map(s)
        .collect()
    }

    #[test]
    fn test_cell_to_counter() {
        assert_eq!(cell_to_counter(&Data::Int(7)), CounterValue::Number(7.0));
        assert_eq!(cell_to_counter(&Data::Float(2.5)), CounterValue::Number(2.5));
        assert_eq!(cell_to_counter(&Data::Bool(true)), CounterValue::Number(1.0));
        assert_eq!(cell_to_counter(&Data::Bool(false)), CounterValue::Number(0.0));
        assert_eq!(cell_to_counter(&s(" 12 ")), CounterValue::Number(12.0));
        assert_eq!(cell_to_counter(&s("")), CounterValue::Missing);
        assert_eq!(cell_to_counter(&s("abc")), CounterValue::Text("abc".to_string()));
        assert_eq!(cell_to_counter(&Data::Empty), CounterValue::Missing);
        assert_eq!(
            cell_to_counter(&Data::Error(CellErrorType::Div0)),
            CounterValue::Missing
        );
    }

    #[test]
    fn test_cell_to_label() {
        assert_eq!(cell_to_label(&s("North")), "North");
        assert_eq!(cell_to_label(&Data::Int(42)), "42");
        assert_eq!(cell_to_label(&Data::Empty), "");
    }

    #[test]
    fn test_rows_to_table() {
        let rows = vec![
            header(),
            vec![
                Data::Int(1),
                s("North"),
                s("Good"),
                s("Active"),
                Data::Float(100.0),
                Data::Float(50.0),
                Data::Empty,
                s("x"),
                Data::Int(3),
            ],
            vec![s("2"), s("South")],
        ];
        let table = rows_to_table(&rows, &ColumnMapping::default()).unwrap();
        assert_eq!(table.len(), 2);

        let first = &table.rows()[0];
        assert_eq!(first.entity_id, "1");
        assert_eq!(*first.counters.get(Counter::Sent), CounterValue::Number(100.0));
        assert_eq!(*first.counters.get(Counter::Clicked), CounterValue::Missing);
        assert_eq!(
            *first.counters.get(Counter::Converted),
            CounterValue::Text("x".to_string())
        );

        let short = &table.rows()[1];
        assert_eq!(short.region, "South");
        assert_eq!(short.feedback, "");
        assert_eq!(*short.counters.get(Counter::Orders), CounterValue::Missing);
    }

    #[test]
    fn test_missing_header_names_column() {
        let mut rows = vec![header()];
        rows[0].retain(|c| cell_to_label(c) != "orders");
        match rows_to_table(&rows, &ColumnMapping::default()) {
            Err(InsightsError::MissingColumn(name)) => assert_eq!(name, "orders"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_sheet_has_no_header() {
        assert!(matches!(
            rows_to_table(&[], &ColumnMapping::default()),
            Err(InsightsError::MissingColumn(name)) if name == "entity_id"
        ));
    }

    #[test]
    fn test_load_rejects_non_workbook() {
        let path = std::env::temp_dir().join(format!("insights-{}.xlsx", uuid::Uuid::new_v4()));
        std::fs::write(&path, "not a workbook").unwrap();
        let result = ExcelSource::default().load(&path, &ColumnMapping::default());
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(InsightsError::Spreadsheet(_))));
    }
}
