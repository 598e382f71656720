use super::chart_builder::ChartType;
use super::classifier::profile_columns;
use super::types::{ColumnProfile, TabularDataset};
use serde::{Deserialize, Serialize};

pub const MAX_SUGGESTIONS: usize = 4;

const SCATTER_REASON: &str = "Scatter plot to show correlation between numeric variables";
const LINE_REASON: &str = "Line chart to show trends over time or sequence";
const BAR_REASON: &str = "Bar chart to compare values across categories";
const PIE_REASON: &str = "Pie chart to show proportional distribution";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestion {
    pub chart_type: ChartType,
    pub x_column: String,
    pub y_column: String,
    pub reason: String,
}

impl ChartSuggestion {
    fn new(chart_type: ChartType, x_column: &str, y_column: &str, reason: &str) -> Self {
        Self {
            chart_type,
            x_column: x_column.to_string(),
            y_column: y_column.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub fn suggest_charts(dataset: &TabularDataset) -> Vec<ChartSuggestion> {
    suggest_from_profiles(&profile_columns(dataset))
}

/// Fixed-priority suggestions: scatter, line, bar, pie.
///
/// Date and categorical columns both count as non-numeric here.
pub fn suggest_from_profiles(profiles: &[ColumnProfile]) -> Vec<ChartSuggestion> {
    let (numeric, other): (Vec<&ColumnProfile>, Vec<&ColumnProfile>) = profiles
        .iter()
        .partition(|profile| profile.column_type.is_numeric());

    let mut suggestions = Vec::with_capacity(MAX_SUGGESTIONS);

    if let [first, second, ..] = numeric.as_slice() {
        suggestions.push(ChartSuggestion::new(ChartType::Scatter, &first.name, &second.name, SCATTER_REASON));
        suggestions.push(ChartSuggestion::new(ChartType::Line, &first.name, &second.name, LINE_REASON));
    }

    if let (Some(category), Some(value)) = (other.first(), numeric.first()) {
        suggestions.push(ChartSuggestion::new(ChartType::Bar, &category.name, &value.name, BAR_REASON));
        suggestions.push(ChartSuggestion::new(ChartType::Pie, &category.name, &value.name, PIE_REASON));
    }

    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
