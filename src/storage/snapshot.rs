//! Snapshot slots
//!
//! A snapshot slot is one named entry of durable storage that holds the
//! serialized observation state. The store reads it once at startup and
//! overwrites it after every committed transition.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::{StorageError, StorageResult};

/// Default name of the snapshot slot
pub const DEFAULT_STORAGE_KEY: &str = "mapState";

/// A single durable slot holding raw snapshot text
///
/// Implementations are synchronous: writes are small and happen while the
/// store holds its write lock, so they stay in dispatch order.
///
/// Every `ObservationStore::dispatch` calls `write` on the caller's thread,
/// including async handlers and the fetcher task. A slow `write` blocks that
/// caller and every other dispatcher until it returns.
pub trait SnapshotStorage: Send + Sync {
    /// Name of the slot (for logging)
    fn key(&self) -> &str;

    /// Read the raw snapshot, `None` if the slot is empty
    fn read(&self) -> StorageResult<Option<String>>;

    /// Overwrite the slot with a new snapshot
    ///
    /// Blocks the calling thread until the snapshot is durable.
    fn write(&self, contents: &str) -> StorageResult<()>;

    /// Remove the snapshot entirely
    fn clear(&self) -> StorageResult<()>;
}

/// Configuration for a file-backed snapshot slot
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    /// Directory holding the snapshot file
    pub data_dir: PathBuf,
    /// Slot name; the file is `<data_dir>/<key>.json`
    pub key: String,
}

impl SnapshotConfig {
    /// Create a config for the default slot inside `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Use a different slot name
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Full path of the snapshot file
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.key))
    }
}

/// Snapshot slot stored as a JSON file on disk
#[derive(Debug)]
pub struct FileSnapshotStorage {
    config: SnapshotConfig,
    path: PathBuf,
}

impl FileSnapshotStorage {
    pub fn new(config: SnapshotConfig) -> Self {
        let path = config.path();
        Self { config, path }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for FileSnapshotStorage {
    fn key(&self) -> &str {
        &self.config.key
    }

    fn read(&self) -> StorageResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        std::fs::create_dir_all(&self.config.data_dir)?;

        // Write-then-rename so a crash never leaves a half-written snapshot
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, contents)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

/// Snapshot slot kept in process memory
///
/// Used for tests and for running without a data directory.
#[derive(Debug, Default)]
pub struct MemorySnapshotStorage {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `contents`
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(contents.into())),
        }
    }
}

impl SnapshotStorage for MemorySnapshotStorage {
    fn key(&self) -> &str {
        "memory"
    }

    fn read(&self) -> StorageResult<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(slot.clone())
    }

    fn write(&self, contents: &str) -> StorageResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *slot = Some(contents.to_string());
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        *slot = None;
        Ok(())
    }
}
