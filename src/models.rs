use crate::services::excel::types::SAMPLE_SIZE;
use crate::services::excel::{
    CellValue, ChartSpec, ChartStyle, ChartType, ColumnProfile, ColumnType, InsightRecord,
};
use crate::services::store::{ChartRecord, FileRecord, InsightEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ColumnAnalysis {
    pub name: String,
    pub data_type: ColumnType,
    pub sample_values: SmallVec<[CellValue; SAMPLE_SIZE]>,
    pub empty_count: usize,
    pub unique_count: usize,
}

impl From<&ColumnProfile> for ColumnAnalysis {
    fn from(profile: &ColumnProfile) -> Self {
        let unique: HashSet<String> = profile.values.iter().map(|v| v.to_string()).collect();

        Self {
            name: profile.name.clone(),
            data_type: profile.column_type,
            sample_values: profile.values.iter().take(SAMPLE_SIZE).cloned().collect(),
            empty_count: profile.empty_count,
            unique_count: unique.len(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub id: Uuid,
    pub name: String,
    pub original_name: String,
    pub size: usize,
    pub headers: Vec<String>,
    pub row_count: usize,
    pub column_count: usize,
    pub uploaded_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<ColumnAnalysis>>,
}

impl From<&FileRecord> for FileSummary {
    fn from(record: &FileRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            original_name: record.original_name.clone(),
            size: record.size,
            headers: record.dataset.headers().to_vec(),
            row_count: record.dataset.row_count(),
            column_count: record.dataset.column_count(),
            uploaded_at: record.uploaded_at,
            columns: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FileDetail {
    #[serde(flatten)]
    pub summary: FileSummary,
    pub data: Vec<Vec<CellValue>>,
}

impl From<&FileRecord> for FileDetail {
    fn from(record: &FileRecord) -> Self {
        Self {
            summary: FileSummary::from(record),
            data: record.dataset.rows().to_vec(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartView {
    pub id: Uuid,
    pub file_id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub spec: ChartSpec,
    #[serde(rename = "is3D")]
    pub is_3d: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ChartRecord> for ChartView {
    fn from(record: ChartRecord) -> Self {
        Self {
            id: record.id,
            file_id: record.file_id,
            title: record.title,
            spec: record.spec,
            is_3d: record.is_3d,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChartPreview {
    #[serde(flatten)]
    pub spec: ChartSpec,
    pub options: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightView {
    pub id: Uuid,
    pub file_id: Uuid,
    #[serde(flatten)]
    pub record: InsightRecord,
    pub created_at: DateTime<Utc>,
}

impl From<InsightEntry> for InsightView {
    fn from(entry: InsightEntry) -> Self {
        Self {
            id: entry.id,
            file_id: entry.file_id,
            record: entry.record,
            created_at: entry.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPreviewRequest {
    pub file_id: Uuid,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub x_axis: String,
    pub y_axis: String,
    #[serde(default)]
    pub config: ChartStyle,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChartRequest {
    pub file_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub chart_type: ChartType,
    pub x_axis: String,
    pub y_axis: String,
    #[serde(default)]
    pub config: ChartStyle,
    #[serde(default, rename = "is3D")]
    pub is_3d: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInsightRequest {
    pub file_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
