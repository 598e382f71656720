use super::classifier::numeric_column_indices;
use super::types::TabularDataset;
use serde::{Deserialize, Serialize};

/// Minimum |r| for two numeric columns to count as correlated.
pub const CORRELATION_THRESHOLD: f64 = 0.7;
const MIN_SHARED_ROWS: usize = 3;

const RECOMMENDATIONS: [&str; 5] = [
    "Consider creating scatter plots to identify correlations between numeric variables.",
    "Use bar charts for categorical data comparison.",
    "Time series analysis may be applicable if date columns are present.",
    "Consider data cleaning for any missing or outlier values.",
    "Pie charts work well for showing proportional relationships.",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub summary: String,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub variance: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatistics {
    pub row_count: usize,
    pub column_count: usize,
    pub numeric_columns: Vec<ColumnStatistics>,
    /// Percentage of non-empty cells.
    pub completeness: f64,
    pub correlated_pairs: usize,
}

pub fn describe(dataset: &TabularDataset) -> DatasetStatistics {
    let numeric = numeric_column_indices(dataset);

    let numeric_columns = numeric
        .iter()
        .filter_map(|&index| column_statistics(dataset, index))
        .collect();

    let total_cells = dataset.row_count() * dataset.column_count();
    let filled_cells = dataset
        .rows()
        .iter()
        .flatten()
        .filter(|cell| !cell.is_empty())
        .count();
    let completeness = if total_cells == 0 {
        0.0
    } else {
        filled_cells as f64 * 100.0 / total_cells as f64
    };

    let mut correlated_pairs = 0;
    for (i, &a) in numeric.iter().enumerate() {
        for &b in &numeric[i + 1..] {
            if let Some(r) = pearson(dataset, a, b) {
                if r.abs() >= CORRELATION_THRESHOLD {
                    correlated_pairs += 1;
                }
            }
        }
    }

    DatasetStatistics {
        row_count: dataset.row_count(),
        column_count: dataset.column_count(),
        numeric_columns,
        completeness,
        correlated_pairs,
    }
}

/// Renders the descriptive statistics of a dataset as text. Never fails; an
/// empty dataset reports zero counts.
pub fn summarize(dataset: &TabularDataset) -> InsightRecord {
    let stats = describe(dataset);
    let rows = stats.row_count;
    let columns = stats.column_count;
    let numeric = stats.numeric_columns.len();

    tracing::info!(
        "Summarizing dataset: {} rows, {} columns, {} numeric",
        rows,
        columns,
        numeric
    );

    let summary = format!(
        "Dataset contains {} rows and {} columns. {} columns contain numeric data suitable for analysis.",
        rows, columns, numeric
    );

    let insights = vec![
        format!(
            "The dataset has {} data points across {} different variables.",
            rows, columns
        ),
        format!(
            "{} columns contain numeric data that can be used for statistical analysis.",
            numeric
        ),
        format!(
            "Data completeness appears to be {}% based on non-null values.",
            stats.completeness.floor() as u64
        ),
        format!(
            "Potential correlations detected between {} variable pairs.",
            stats.correlated_pairs
        ),
    ];

    InsightRecord {
        summary,
        insights,
        recommendations: RECOMMENDATIONS.iter().map(|r| r.to_string()).collect(),
    }
}

fn column_statistics(dataset: &TabularDataset, index: usize) -> Option<ColumnStatistics> {
    let values: Vec<f64> = dataset
        .rows()
        .iter()
        .filter_map(|row| row.get(index).and_then(|cell| cell.as_number()))
        .collect();

    if values.is_empty() {
        return None;
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Some(ColumnStatistics {
        name: dataset.headers()[index].clone(),
        count,
        mean,
        variance,
        min,
        max,
    })
}

/// Pearson correlation over rows where both cells are numeric.
fn pearson(dataset: &TabularDataset, a: usize, b: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = dataset
        .rows()
        .iter()
        .filter_map(|row| {
            let x = row.get(a)?.as_number()?;
            let y = row.get(b)?.as_number()?;
            Some((x, y))
        })
        .collect();

    if pairs.len() < MIN_SHARED_ROWS {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (cov, var_x, var_y) = pairs.iter().fold((0.0, 0.0, 0.0), |(c, vx, vy), (x, y)| {
        let dx = x - mean_x;
        let dy = y - mean_y;
        (c + dx * dy, vx + dx * dx, vy + dy * dy)
    });

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }

    Some(cov / (var_x * var_y).sqrt())
}
