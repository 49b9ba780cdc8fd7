// src/repositories/watchlist_repository.rs

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::domain::{validate_watchlist, EpisodeMark, SeriesId, Watchlist, WatchlistEntry};
use crate::error::{AppError, AppResult};

pub trait WatchlistRepository: Send + Sync {
    /// Read the whole watchlist document
    fn load(&self) -> AppResult<Watchlist>;

    /// Replace the whole watchlist document
    fn save(&self, watchlist: &Watchlist) -> AppResult<()>;

    /// Take the single-writer lock for a load → modify → save section.
    /// The lock is released when the guard is dropped.
    fn lock(&self) -> AppResult<StoreGuard>;
}

/// Exclusive writer lock on a watchlist store.
pub struct StoreGuard {
    file: Option<File>,
}

impl StoreGuard {
    /// Guard for stores that need no cross-process coordination
    pub fn unlocked() -> Self {
        Self { file: None }
    }
}

impl Drop for StoreGuard {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            if let Err(e) = fs2::FileExt::unlock(&file) {
                log::warn!("Failed to release watchlist lock: {}", e);
            }
        }
    }
}

// ============================================================================
// ON-DISK FORMAT
// ============================================================================

#[derive(Debug, Default, Serialize, Deserialize)]
struct WatchlistDocument {
    #[serde(default)]
    series: Vec<StoredEntry>,
}

/// Entry as found on disk: the current object form, or the
/// `[title, last_episode, external_id]` triple older files use.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Record(WatchlistEntry),
    Legacy(String, EpisodeMark, SeriesId),
}

impl From<StoredEntry> for WatchlistEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Record(entry) => entry,
            StoredEntry::Legacy(title, last_episode, external_id) => WatchlistEntry {
                title,
                last_episode,
                external_id,
            },
        }
    }
}

// ============================================================================
// JSON FILE STORE
// ============================================================================

/// Watchlist persisted as a single JSON document.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// readers see either the previous or the new document, never a torn one.
pub struct JsonWatchlistRepository {
    path: PathBuf,
}

impl JsonWatchlistRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "watchlist.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn ensure_parent_dir(&self) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

impl WatchlistRepository for JsonWatchlistRepository {
    fn load(&self) -> AppResult<Watchlist> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Watchlist::default()),
            Err(e) => return Err(AppError::Io(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Watchlist::default());
        }

        let document: WatchlistDocument = serde_json::from_str(&raw)?;
        let watchlist = Watchlist::new(document.series.into_iter().map(Into::into).collect());
        validate_watchlist(&watchlist)?;
        Ok(watchlist)
    }

    fn save(&self, watchlist: &Watchlist) -> AppResult<()> {
        validate_watchlist(watchlist)?;
        self.ensure_parent_dir()?;

        let document = WatchlistDocument {
            series: watchlist
                .entries()
                .iter()
                .cloned()
                .map(StoredEntry::Record)
                .collect(),
        };
        let body = serde_json::to_vec_pretty(&document)?;

        let tmp_path = self.sibling(".tmp");
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(&body)?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, &self.path).map_err(|e| {
            AppError::Persistence(format!(
                "could not replace {}: {}",
                self.path.display(),
                e
            ))
        })?;

        log::debug!("Saved {} watchlist entries to {}", watchlist.len(), self.path.display());
        Ok(())
    }

    fn lock(&self) -> AppResult<StoreGuard> {
        self.ensure_parent_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.sibling(".lock"))?;
        file.lock_exclusive()?;
        Ok(StoreGuard { file: Some(file) })
    }
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Process-local store, used by tests and dry runs.
#[derive(Default)]
pub struct InMemoryWatchlistRepository {
    state: Mutex<Watchlist>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryWatchlistRepository {
    pub fn new(watchlist: Watchlist) -> Self {
        Self {
            state: Mutex::new(watchlist),
            saves: AtomicUsize::new(0),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every following save fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Watchlist {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl WatchlistRepository for InMemoryWatchlistRepository {
    fn load(&self) -> AppResult<Watchlist> {
        Ok(self.snapshot())
    }

    fn save(&self, watchlist: &Watchlist) -> AppResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Persistence("save rejected".to_string()));
        }
        validate_watchlist(watchlist)?;
        *self
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = watchlist.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn lock(&self) -> AppResult<StoreGuard> {
        Ok(StoreGuard::unlocked())
    }
}
