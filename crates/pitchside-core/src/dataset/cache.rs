// Memoized table loads keyed by source file path and modification time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use tracing::{debug, info};

use crate::dataset::enrich::build_dashboard_table;
use crate::dataset::loader::{load_season, DataSourceError, LoadOptions};
use crate::dataset::table::PlayerTable;

/// Identity of a source file at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self, DataSourceError> {
        let io_err = |e: std::io::Error| DataSourceError::Io {
            path: path.display().to_string(),
            source: e,
        };
        let canonical = std::fs::canonicalize(path).map_err(io_err)?;
        let modified = std::fs::metadata(&canonical)
            .map_err(io_err)?
            .modified()
            .ok();
        Ok(Self {
            path: canonical,
            modified,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Season(PathBuf),
    Dashboard { current: PathBuf, prior: PathBuf },
}

impl CacheKey {
    fn depends_on(&self, path: &Path) -> bool {
        match self {
            CacheKey::Season(p) => p == path,
            CacheKey::Dashboard { current, prior } => current == path || prior == path,
        }
    }
}

struct Entry {
    stamps: Vec<FileStamp>,
    table: Arc<PlayerTable>,
}

/// Cache of loaded tables. A lookup is a hit only when every source file
/// still has the modification time it had when the entry was built; any
/// change reloads. Cached tables are immutable and shared through `Arc`.
pub struct DatasetCache {
    options: LoadOptions,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl DatasetCache {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CacheKey, Entry>> {
        // Entries are only replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_load(
        &self,
        key: CacheKey,
        stamps: Vec<FileStamp>,
        load: impl FnOnce() -> Result<PlayerTable, DataSourceError>,
    ) -> Result<Arc<PlayerTable>, DataSourceError> {
        if let Some(entry) = self.entries().get(&key) {
            if entry.stamps == stamps {
                debug!(?key, "dataset cache hit");
                return Ok(Arc::clone(&entry.table));
            }
            info!(?key, "source changed on disk, reloading");
        }

        // The map is unlocked while loading; concurrent misses on the same
        // key may both load, and the last insert wins.
        let table = Arc::new(load()?);
        self.entries().insert(
            key,
            Entry {
                stamps,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// A single season table (loader output, no deltas).
    pub fn season(&self, path: &Path) -> Result<Arc<PlayerTable>, DataSourceError> {
        let stamp = FileStamp::of(path)?;
        let key = CacheKey::Season(stamp.path.clone());
        self.get_or_load(key, vec![stamp], || load_season(path, &self.options))
    }

    /// The enriched, de-duplicated table the dashboard reads from.
    pub fn dashboard(
        &self,
        current: &Path,
        prior: &Path,
    ) -> Result<Arc<PlayerTable>, DataSourceError> {
        let current_stamp = FileStamp::of(current)?;
        let prior_stamp = FileStamp::of(prior)?;
        let key = CacheKey::Dashboard {
            current: current_stamp.path.clone(),
            prior: prior_stamp.path.clone(),
        };
        self.get_or_load(key, vec![current_stamp, prior_stamp], || {
            build_dashboard_table(current, prior, &self.options)
        })
    }

    /// Drop every entry built from `path`. Returns how many were removed.
    pub fn invalidate(&self, path: &Path) -> usize {
        let target = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|key, _| !key.depends_on(&target));
        let removed = before - entries.len();
        debug!(path = %target.display(), removed, "dataset cache invalidated");
        removed
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
