use crate::error::AppError;
use crate::services::excel::{ChartSpec, InsightRecord, TabularDataset};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::excel::utils::display_name;

#[derive(Debug, Clone)]
pub struct FileRecord {
    pub id: Uuid,
    pub owner: String,
    pub name: String,
    pub original_name: String,
    pub size: usize,
    pub dataset: Arc<TabularDataset>,
    pub uploaded_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(owner: &str, original_name: &str, size: usize, dataset: TabularDataset) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: owner.to_string(),
            name: display_name(original_name),
            original_name: original_name.to_string(),
            size,
            dataset: Arc::new(dataset),
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartRecord {
    pub id: Uuid,
    pub file_id: Uuid,
    pub owner: String,
    pub title: String,
    pub spec: ChartSpec,
    pub is_3d: bool,
    pub created_at: DateTime<Utc>,
}

impl ChartRecord {
    pub fn new(owner: &str, file_id: Uuid, title: &str, spec: ChartSpec, is_3d: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            owner: owner.to_string(),
            title: title.to_string(),
            spec,
            is_3d,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InsightEntry {
    pub id: Uuid,
    pub file_id: Uuid,
    pub owner: String,
    pub record: InsightRecord,
    pub created_at: DateTime<Utc>,
}

impl InsightEntry {
    pub fn new(owner: &str, file_id: Uuid, record: InsightRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_id,
            owner: owner.to_string(),
            record,
            created_at: Utc::now(),
        }
    }
}

/// Persistence for uploaded datasets and the charts and insights derived
/// from them. Every lookup is scoped to an owner; records of other owners
/// are reported as not found. Charts and insights can only be saved while
/// their file exists.
pub trait RecordStore: Send + Sync {
    fn save_file(&self, record: FileRecord) -> Result<(), AppError>;
    fn list_files(&self, owner: &str) -> Result<Vec<FileRecord>, AppError>;
    fn get_file(&self, owner: &str, id: Uuid) -> Result<FileRecord, AppError>;
    /// Removes the file together with its charts and insights.
    fn delete_file(&self, owner: &str, id: Uuid) -> Result<(), AppError>;

    fn save_chart(&self, record: ChartRecord) -> Result<(), AppError>;
    fn list_charts(&self, owner: &str) -> Result<Vec<ChartRecord>, AppError>;
    fn get_chart(&self, owner: &str, id: Uuid) -> Result<ChartRecord, AppError>;
    fn delete_chart(&self, owner: &str, id: Uuid) -> Result<(), AppError>;

    fn save_insight(&self, entry: InsightEntry) -> Result<(), AppError>;
    fn list_insights(&self, owner: &str) -> Result<Vec<InsightEntry>, AppError>;
    fn delete_insight(&self, owner: &str, id: Uuid) -> Result<(), AppError>;
}

#[derive(Default)]
pub struct MemoryStore {
    files: RwLock<HashMap<Uuid, FileRecord>>,
    charts: RwLock<HashMap<Uuid, ChartRecord>>,
    insights: RwLock<HashMap<Uuid, InsightEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn remove_owned<T>(
    map: &RwLock<HashMap<Uuid, T>>,
    id: Uuid,
    owner_of: impl Fn(&T) -> &str,
    owner: &str,
) -> Option<T> {
    let mut map = map.write();
    let owned = map.get(&id).map_or(false, |record| owner_of(record) == owner);
    if owned {
        map.remove(&id)
    } else {
        None
    }
}

fn ensure_owned_file(
    files: &HashMap<Uuid, FileRecord>,
    id: Uuid,
    owner: &str,
) -> Result<(), AppError> {
    match files.get(&id) {
        Some(file) if file.owner == owner => Ok(()),
        _ => Err(AppError::NotFound("File not found".to_string())),
    }
}

impl RecordStore for MemoryStore {
    fn save_file(&self, record: FileRecord) -> Result<(), AppError> {
        tracing::debug!("Storing file {} for {}", record.id, record.owner);
        self.files.write().insert(record.id, record);
        Ok(())
    }

    fn list_files(&self, owner: &str) -> Result<Vec<FileRecord>, AppError> {
        let mut files: Vec<FileRecord> = self
            .files
            .read()
            .values()
            .filter(|f| f.owner == owner)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(files)
    }

    fn get_file(&self, owner: &str, id: Uuid) -> Result<FileRecord, AppError> {
        self.files
            .read()
            .get(&id)
            .filter(|f| f.owner == owner)
            .cloned()
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    fn delete_file(&self, owner: &str, id: Uuid) -> Result<(), AppError> {
        remove_owned(&self.files, id, |f| f.owner.as_str(), owner)
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let mut charts = self.charts.write();
        let before = charts.len();
        charts.retain(|_, c| c.file_id != id);
        let charts_removed = before - charts.len();
        drop(charts);

        let mut insights = self.insights.write();
        let before = insights.len();
        insights.retain(|_, i| i.file_id != id);
        let insights_removed = before - insights.len();

        tracing::info!(
            "Deleted file {} with {} charts and {} insights",
            id,
            charts_removed,
            insights_removed
        );
        Ok(())
    }

    fn save_chart(&self, record: ChartRecord) -> Result<(), AppError> {
        // Parent must still exist when the insert lands
        let files = self.files.read();
        ensure_owned_file(&files, record.file_id, &record.owner)?;
        self.charts.write().insert(record.id, record);
        Ok(())
    }

    fn list_charts(&self, owner: &str) -> Result<Vec<ChartRecord>, AppError> {
        let mut charts: Vec<ChartRecord> = self
            .charts
            .read()
            .values()
            .filter(|c| c.owner == owner)
            .cloned()
            .collect();
        charts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(charts)
    }

    fn get_chart(&self, owner: &str, id: Uuid) -> Result<ChartRecord, AppError> {
        self.charts
            .read()
            .get(&id)
            .filter(|c| c.owner == owner)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Chart not found".to_string()))
    }

    fn delete_chart(&self, owner: &str, id: Uuid) -> Result<(), AppError> {
        remove_owned(&self.charts, id, |c| c.owner.as_str(), owner)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Chart not found".to_string()))
    }

    fn save_insight(&self, entry: InsightEntry) -> Result<(), AppError> {
        let files = self.files.read();
        ensure_owned_file(&files, entry.file_id, &entry.owner)?;
        self.insights.write().insert(entry.id, entry);
        Ok(())
    }

    fn list_insights(&self, owner: &str) -> Result<Vec<InsightEntry>, AppError> {
        let mut insights: Vec<InsightEntry> = self
            .insights
            .read()
            .values()
            .filter(|i| i.owner == owner)
            .cloned()
            .collect();
        insights.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(insights)
    }

    fn delete_insight(&self, owner: &str, id: Uuid) -> Result<(), AppError> {
        remove_owned(&self.insights, id, |i| i.owner.as_str(), owner)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound("Insight not found".to_string()))
    }
}
