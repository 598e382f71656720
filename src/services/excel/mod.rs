pub mod chart_builder;
pub mod classifier;
pub mod ingestor;
pub mod insights;
pub mod suggestions;
pub mod types;
pub mod utils;

pub use chart_builder::{build_chart_spec, ChartSpec, ChartStyle, ChartType, RenderPayload};
pub use classifier::{classify_column, profile_columns};
pub use ingestor::read_first_sheet;
pub use insights::{summarize, InsightRecord};
pub use suggestions::{suggest_charts, ChartSuggestion};
pub use types::{CellValue, ColumnProfile, ColumnType, TabularDataset};
