//! In-memory dataset cache keyed by file path and invalidated on change.

use crate::loader::DatasetLoader;
use moka::sync::Cache;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tdash_common::{Dataset, Result, TDashError};
use tracing::{debug, info, instrument};

/// File identity used to decide whether a cached load is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStamp {
    fn read(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            TDashError::dataset_with_source(format!("Cannot stat dataset {}", path.display()), e)
        })?;
        Ok(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

#[derive(Debug, Clone)]
struct CachedDataset {
    stamp: SourceStamp,
    dataset: Arc<Dataset>,
}

/// Shares parsed datasets between tasks. A path is re-read only when its
/// modification time or size changes, or after an explicit invalidation.
pub struct DatasetCache {
    entries: Cache<PathBuf, CachedDataset>,
    loads: AtomicU64,
}

impl DatasetCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::new(max_capacity),
            loads: AtomicU64::new(0),
        }
    }

    /// The dataset at `path`, loaded on first use or when the file changed.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dataset>> {
        let key = std::fs::canonicalize(path).map_err(|e| {
            TDashError::dataset_with_source(format!("Dataset not found: {}", path.display()), e)
        })?;
        let stamp = SourceStamp::read(&key)?;

        if let Some(cached) = self.entries.get(&key) {
            if cached.stamp == stamp {
                debug!("Dataset cache hit");
                return Ok(cached.dataset);
            }
            info!("Dataset changed on disk, reloading");
        }

        let dataset = Arc::new(DatasetLoader::load(&key)?);
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            key,
            CachedDataset {
                stamp,
                dataset: Arc::clone(&dataset),
            },
        );
        Ok(dataset)
    }

    /// Forget the cached load of `path`.
    pub fn invalidate(&self, path: &Path) {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.entries.invalidate(&key);
        debug!(path = %key.display(), "Invalidated cached dataset");
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
        debug!("Cleared dataset cache");
    }

    /// Number of times a file was actually parsed.
    pub fn load_count(&self) -> u64 {
        self.loads.load(Ordering::Relaxed)
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_csv(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("tweets.csv");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_second_read_is_cached() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,likes\n1,2\n");
        let cache = DatasetCache::default();

        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.load_count(), 1);
    }

    #[test]
    fn test_modified_file_is_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id,likes\n1,2\n");
        let cache = DatasetCache::default();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);

        fs::write(&path, "id,likes\n1,2\n2,3\n").unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();

        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);
        assert_eq!(cache.load_count(), 2);
    }

    #[test]
    fn test_invalidate_and_clear_force_reload() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(&dir, "id\n1\n");
        let cache = DatasetCache::default();

        cache.get_or_load(&path).unwrap();
        cache.invalidate(&path);
        cache.get_or_load(&path).unwrap();
        cache.clear();
        cache.get_or_load(&path).unwrap();
        assert_eq!(cache.load_count(), 3);
    }

    #[test]
    fn test_missing_path_is_dataset_error() {
        let cache = DatasetCache::default();
        let result = cache.get_or_load(Path::new("/no/such/tweets.csv"));
        assert!(matches!(result, Err(TDashError::Dataset { .. })));
        assert_eq!(cache.load_count(), 0);
    }
}
