//! Snapshot Storage
//!
//! Durable storage for the observation state snapshot:
//!
//! - **snapshot**: The `SnapshotStorage` slot trait with file and memory backends
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use firewatch::storage::{FileSnapshotStorage, SnapshotConfig, SnapshotStorage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = FileSnapshotStorage::new(SnapshotConfig::new("./data"));
//!     storage.write("{}")?;
//!     let saved = storage.read()?;
//!     println!("{:?}", saved);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod snapshot;

pub use error::{StorageError, StorageResult};
pub use snapshot::{
    FileSnapshotStorage, MemorySnapshotStorage, SnapshotConfig, SnapshotStorage,
    DEFAULT_STORAGE_KEY,
};
