use crate::services::excel::{profile_columns, ColumnProfile, TabularDataset};
use moka::sync::Cache;
use std::sync::Arc;
use uuid::Uuid;

/// Column profiles per stored dataset. Datasets never change after upload,
/// so entries only leave on eviction or when the file is deleted.
#[derive(Clone)]
pub struct ProfileCache {
    inner: Cache<Uuid, Arc<Vec<ColumnProfile>>>,
}

impl ProfileCache {
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
        }
    }

    pub fn get_or_profile(&self, file_id: Uuid, dataset: &TabularDataset) -> Arc<Vec<ColumnProfile>> {
        self.inner.get_with(file_id, || {
            let start = std::time::Instant::now();
            let profiles = profile_columns(dataset);
            tracing::info!(
                "Profiled {} columns of {} in {:?}",
                profiles.len(),
                file_id,
                start.elapsed()
            );
            Arc::new(profiles)
        })
    }

    pub fn invalidate(&self, file_id: &Uuid) {
        self.inner.invalidate(file_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::CellValue;

    #[test]
    fn test_profiles_are_computed_once_per_file() {
        let cache = ProfileCache::new(8);
        let id = Uuid::new_v4();
        let dataset = TabularDataset::new(vec!["a".into()], vec![vec![CellValue::Number(1.0)]]);

        let first = cache.get_or_profile(id, &dataset);
        let second = cache.get_or_profile(id, &dataset);
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate(&id);
        let third = cache.get_or_profile(id, &dataset);
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
