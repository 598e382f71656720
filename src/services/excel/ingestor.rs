use super::types::{CellValue, TabularDataset};
use crate::error::AppError;
use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

/// Decodes the first sheet of an `.xls`/`.xlsx` buffer.
///
/// The first row is always the header row. Trailing blank header cells are
/// dropped and every data row is fitted to the remaining width. Blank rows
/// inside the sheet's range are kept as all-empty rows.
pub fn read_first_sheet(file_data: Bytes) -> Result<TabularDataset, AppError> {
    let start = std::time::Instant::now();
    tracing::info!("Reading workbook, size: {}KB", file_data.len() / 1024);

    let cursor = Cursor::new(file_data);
    let mut workbook = open_workbook_auto_from_rs(cursor).map_err(|e| {
        tracing::error!("Failed to open workbook: {}", e);
        AppError::Parse(format!("Failed to open workbook: {}", e))
    })?;

    let sheet_names = workbook.sheet_names();
    tracing::debug!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    let range = match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => range,
        Some(Err(e)) => {
            tracing::error!("Failed to read first worksheet: {}", e);
            return Err(AppError::Parse(format!("Failed to read worksheet: {}", e)));
        }
        None => {
            return Err(AppError::EmptyDataset(
                "Workbook contains no sheets".to_string(),
            ))
        }
    };

    let mut rows = range.rows();
    let header_row = rows
        .next()
        .ok_or_else(|| AppError::EmptyDataset("Excel file is empty".to_string()))?;
    let headers = header_names(header_row);
    let width = headers.len();

    let data_rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().take(width).map(decode_cell).collect())
        .collect();

    if data_rows.is_empty() {
        tracing::warn!("First sheet has a header row but no data rows");
        return Err(AppError::EmptyDataset(
            "Excel file has no data rows".to_string(),
        ));
    }

    let dataset = TabularDataset::new(headers, data_rows);
    tracing::info!(
        "Workbook read in {:?}: {} rows, {} columns",
        start.elapsed(),
        dataset.row_count(),
        dataset.column_count()
    );

    Ok(dataset)
}

fn header_names(row: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = row.iter().map(|cell| decode_cell(cell).to_string()).collect();
    while names.last().map_or(false, |name| name.is_empty()) {
        names.pop();
    }
    names
}

pub(crate) fn decode_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // Serial day number, as the cell is stored
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_buffer_is_parse_error() {
        let result = read_first_sheet(Bytes::from_static(b"definitely not a workbook"));
        assert!(matches!(result, Err(AppError::Parse(_))));
    }

    #[test]
    fn test_header_names_drop_trailing_blanks() {
        let row = vec![
            Data::String("Name".into()),
            Data::Float(2024.0),
            Data::Empty,
            Data::Bool(true),
            Data::Empty,
            Data::String(String::new()),
        ];
        assert_eq!(header_names(&row), vec!["Name", "2024", "", "true"]);
    }

    #[test]
    fn test_decode_cell_keeps_native_types() {
        assert_eq!(decode_cell(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(decode_cell(&Data::Bool(false)), CellValue::Bool(false));
        assert_eq!(
            decode_cell(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(decode_cell(&Data::Empty), CellValue::Empty);
    }
}
