#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryStore, KeyValueStore, SnapshotKey, SnapshotRepository, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
