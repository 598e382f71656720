use serde::{Deserialize, Serialize};
use std::fmt;

use super::utils::{format_number, parse_number};

pub const SAMPLE_SIZE: usize = 3;

/// A single decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Bool(bool),
    Text(String),
    Empty,
}

impl CellValue {
    /// Absent cells and empty strings are both treated as missing.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the cell, if it converts cleanly.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => parse_number(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) => f.write_str(&format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

/// Header row plus data rows of one sheet.
///
/// Every row has exactly `headers.len()` cells; construction pads short rows
/// with [`CellValue::Empty`] and truncates long ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TabularDataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Position of the first header with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Non-empty cells of a column, in row order.
    pub fn column_values(&self, index: usize) -> Vec<&CellValue> {
        self.rows
            .iter()
            .filter_map(|row| row.get(index))
            .filter(|cell| !cell.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Numeric,
    Date,
    Categorical,
}

impl ColumnType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
}

/// Inferred semantics of one column. Derived on demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub index: usize,
    pub column_type: ColumnType,
    pub values: Vec<CellValue>,
    pub empty_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_padded_and_truncated_to_header_width() {
        let dataset = TabularDataset::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![CellValue::Number(1.0)],
                vec![
                    CellValue::Number(1.0),
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                ],
            ],
        );

        assert!(dataset.rows().iter().all(|row| row.len() == 3));
        assert_eq!(dataset.rows()[0][2], CellValue::Empty);
    }

    #[test]
    fn test_column_values_skip_empty_cells() {
        let dataset = TabularDataset::new(
            vec!["a".into()],
            vec![
                vec![CellValue::Text("x".into())],
                vec![CellValue::Text(String::new())],
                vec![CellValue::Empty],
                vec![CellValue::Bool(false)],
            ],
        );

        let values = dataset.column_values(0);
        assert_eq!(values, vec![&CellValue::Text("x".into()), &CellValue::Bool(false)]);
    }

    #[test]
    fn test_cell_json_shape() {
        let row = vec![
            CellValue::Number(1.5),
            CellValue::Text("a".into()),
            CellValue::Bool(true),
            CellValue::Empty,
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"[1.5,"a",true,null]"#);

        let back: Vec<CellValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn test_display_formats_whole_numbers_without_fraction() {
        assert_eq!(CellValue::Number(2024.0).to_string(), "2024");
        assert_eq!(CellValue::Number(0.25).to_string(), "0.25");
        assert_eq!(CellValue::Empty.to_string(), "");
    }
}
