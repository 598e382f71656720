use super::types::{CellValue, ColumnProfile, ColumnType, TabularDataset};
use super::utils::is_date_string;
use rayon::prelude::*;

/// A column takes a type when at least 4 of every 5 non-empty values pass its test.
fn meets_threshold(hits: usize, total: usize) -> bool {
    total > 0 && hits * 5 >= total * 4
}

fn is_date_like(value: &CellValue) -> bool {
    match value {
        CellValue::Text(s) => is_date_string(s),
        _ => false,
    }
}

/// Classifies a set of cell values. Empty cells are ignored.
///
/// Numeric is tested before date so that integer columns such as years are
/// never read as dates.
pub fn classify_values<'a, I>(values: I) -> ColumnType
where
    I: IntoIterator<Item = &'a CellValue>,
{
    let (total, numeric_count, date_count) = values
        .into_iter()
        .filter(|v| !v.is_empty())
        .fold((0, 0, 0), |(total, num, date), value| {
            if value.as_number().is_some() {
                (total + 1, num + 1, date)
            } else if is_date_like(value) {
                (total + 1, num, date + 1)
            } else {
                (total + 1, num, date)
            }
        });

    if total == 0 {
        return ColumnType::Categorical;
    }

    if meets_threshold(numeric_count, total) {
        ColumnType::Numeric
    } else if meets_threshold(date_count, total) {
        ColumnType::Date
    } else {
        ColumnType::Categorical
    }
}

pub fn classify_column(dataset: &TabularDataset, index: usize) -> ColumnType {
    classify_values(dataset.column_values(index))
}

pub fn is_numeric_column(dataset: &TabularDataset, index: usize) -> bool {
    classify_column(dataset, index).is_numeric()
}

/// Indices of all numeric columns, in header order.
pub fn numeric_column_indices(dataset: &TabularDataset) -> Vec<usize> {
    (0..dataset.column_count())
        .filter(|&index| is_numeric_column(dataset, index))
        .collect()
}

pub fn profile_column(dataset: &TabularDataset, index: usize) -> ColumnProfile {
    let values: Vec<CellValue> = dataset.column_values(index).into_iter().cloned().collect();
    let column_type = classify_values(&values);
    let empty_count = dataset.row_count() - values.len();

    tracing::debug!(
        "Column {} classified as {:?} ({} values, {} empty)",
        index,
        column_type,
        values.len(),
        empty_count
    );

    ColumnProfile {
        name: dataset.headers().get(index).cloned().unwrap_or_default(),
        index,
        column_type,
        values,
        empty_count,
    }
}

pub fn profile_columns(dataset: &TabularDataset) -> Vec<ColumnProfile> {
    (0..dataset.column_count())
        .into_par_iter()
        .map(|index| profile_column(dataset, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Number(*v)).collect()
    }

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values.iter().map(|v| CellValue::Text(v.to_string())).collect()
    }

    #[test]
    fn test_numeric_column() {
        assert_eq!(
            classify_values(&numbers(&[1.0, 2.0, 3.0, 4.0, 5.0])),
            ColumnType::Numeric
        );
    }

    #[test]
    fn test_date_column() {
        assert_eq!(
            classify_values(&texts(&["2024-01-01", "2024-02-01", "2024-03-01"])),
            ColumnType::Date
        );
    }

    #[test]
    fn test_categorical_column() {
        assert_eq!(
            classify_values(&texts(&["red", "blue", "red"])),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let mut values = numbers(&[1.0, 2.0, 3.0, 4.0]);
        values.push(CellValue::Text("x".into()));
        assert_eq!(classify_values(&values), ColumnType::Numeric);

        let mut below = numbers(&[1.0, 2.0, 3.0]);
        below.extend(texts(&["x", "y"]));
        assert_eq!(classify_values(&below), ColumnType::Categorical);
    }

    #[test]
    fn test_numeric_text_counts_as_numeric() {
        assert_eq!(
            classify_values(&texts(&["10", "20.5", " 30 "])),
            ColumnType::Numeric
        );
    }

    #[test]
    fn test_years_are_numeric_not_dates() {
        assert_eq!(
            classify_values(&texts(&["2020", "2021", "2022"])),
            ColumnType::Numeric
        );
        assert_eq!(
            classify_values(&numbers(&[2020.0, 2021.0, 2022.0])),
            ColumnType::Numeric
        );
    }

    #[test]
    fn test_empty_values_fall_back_to_categorical() {
        assert_eq!(classify_values(&Vec::<CellValue>::new()), ColumnType::Categorical);
        assert_eq!(
            classify_values(&[CellValue::Empty, CellValue::Text(String::new())]),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_booleans_are_categorical() {
        assert_eq!(
            classify_values(&[CellValue::Bool(true), CellValue::Bool(false)]),
            ColumnType::Categorical
        );
    }

    #[test]
    fn test_profile_columns_keeps_header_order() {
        let dataset = TabularDataset::new(
            vec!["Category".into(), "Amount".into(), "When".into()],
            vec![
                vec![
                    CellValue::Text("A".into()),
                    CellValue::Number(1.0),
                    CellValue::Text("2024-01-01".into()),
                ],
                vec![CellValue::Text("B".into()), CellValue::Empty, CellValue::Empty],
            ],
        );

        let profiles = profile_columns(&dataset);
        let names: Vec<&str> = profiles.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Category", "Amount", "When"]);
        assert_eq!(profiles[0].column_type, ColumnType::Categorical);
        assert_eq!(profiles[1].column_type, ColumnType::Numeric);
        assert_eq!(profiles[1].empty_count, 1);
        assert_eq!(profiles[2].column_type, ColumnType::Date);
    }
}
