use async_trait::async_trait;
use realms_core::merge::SavedRealm;
use realms_core::model::{Achievement, ProgressState};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::records::{AchievementRecord, RealmRecord};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error for key {key}: {message}")]
    Serialization { key: SnapshotKey, message: String },
}

/// The four keys a progress snapshot is spread across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Realms,
    Achievements,
    CurrentStreak,
    TotalTimeSpent,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 4] = [
        SnapshotKey::Realms,
        SnapshotKey::Achievements,
        SnapshotKey::CurrentStreak,
        SnapshotKey::TotalTimeSpent,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKey::Realms => "realms",
            SnapshotKey::Achievements => "achievements",
            SnapshotKey::CurrentStreak => "currentStreak",
            SnapshotKey::TotalTimeSpent => "totalTimeSpent",
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable string key-value store.
///
/// Reads of a key that was never written return `Ok(None)`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the write.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key` if present.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects the delete.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Typed access to the progress snapshot on top of a `KeyValueStore`.
///
/// Structured values are JSON documents; scalars are decimal text. Every
/// loader treats a missing key as `Ok(None)` and a present but undecodable
/// value as `StorageError::Serialization` for that key alone.
#[derive(Clone)]
pub struct SnapshotRepository {
    kv: Arc<dyn KeyValueStore>,
}

impl SnapshotRepository {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    pub async fn load_realms(&self) -> Result<Option<Vec<SavedRealm>>, StorageError> {
        let records: Option<Vec<RealmRecord>> = self.load_json(SnapshotKey::Realms).await?;
        Ok(records.map(|records| records.into_iter().map(RealmRecord::into_saved).collect()))
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    pub async fn load_achievements(&self) -> Result<Option<Vec<Achievement>>, StorageError> {
        let records: Option<Vec<AchievementRecord>> =
            self.load_json(SnapshotKey::Achievements).await?;
        Ok(records.map(|records| {
            records
                .into_iter()
                .map(AchievementRecord::into_achievement)
                .collect()
        }))
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    pub async fn load_current_streak(&self) -> Result<Option<i64>, StorageError> {
        self.load_integer(SnapshotKey::CurrentStreak).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failure.
    pub async fn load_total_time_spent(&self) -> Result<Option<i64>, StorageError> {
        self.load_integer(SnapshotKey::TotalTimeSpent).await
    }

    /// Write all four keys from `state`.
    ///
    /// Keys are written one after another; a failure part-way leaves earlier
    /// keys updated. The next successful save rewrites every key.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` raised by encoding or the backend.
    pub async fn save(&self, state: &ProgressState) -> Result<(), StorageError> {
        let realms: Vec<RealmRecord> = state.realms.iter().map(RealmRecord::from_realm).collect();
        let achievements: Vec<AchievementRecord> = state
            .achievements
            .iter()
            .map(AchievementRecord::from_achievement)
            .collect();

        self.save_json(SnapshotKey::Realms, &realms).await?;
        self.save_json(SnapshotKey::Achievements, &achievements).await?;
        self.kv
            .set(
                SnapshotKey::CurrentStreak.as_str(),
                &state.current_streak.to_string(),
            )
            .await?;
        self.kv
            .set(
                SnapshotKey::TotalTimeSpent.as_str(),
                &state.total_time_spent.to_string(),
            )
            .await?;
        Ok(())
    }

    /// Delete every snapshot key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend rejects a delete.
    pub async fn clear(&self) -> Result<(), StorageError> {
        for key in SnapshotKey::ALL {
            self.kv.remove(key.as_str()).await?;
        }
        Ok(())
    }

    async fn load_json<T: DeserializeOwned>(
        &self,
        key: SnapshotKey,
    ) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.kv.get(key.as_str()).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Serialization {
                key,
                message: err.to_string(),
            })
    }

    async fn load_integer(&self, key: SnapshotKey) -> Result<Option<i64>, StorageError> {
        let Some(raw) = self.kv.get(key.as_str()).await? else {
            return Ok(None);
        };
        raw.trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|err| StorageError::Serialization {
                key,
                message: err.to_string(),
            })
    }

    async fn save_json<T: Serialize>(&self, key: SnapshotKey, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value).map_err(|err| StorageError::Serialization {
            key,
            message: err.to_string(),
        })?;
        self.kv.set(key.as_str(), &encoded).await
    }
}

/// Aggregates the backing store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            kv: Arc::new(InMemoryStore::new()),
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> SnapshotRepository {
        SnapshotRepository::new(Arc::clone(&self.kv))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realms_core::Catalog;
    use realms_core::model::{LessonId, RealmId};

    fn repo() -> (InMemoryStore, SnapshotRepository) {
        let kv = InMemoryStore::new();
        let repo = SnapshotRepository::new(Arc::new(kv.clone()));
        (kv, repo)
    }

    #[tokio::test]
    async fn missing_keys_load_as_none() {
        let (_kv, repo) = repo();
        assert!(repo.load_realms().await.unwrap().is_none());
        assert!(repo.load_achievements().await.unwrap().is_none());
        assert!(repo.load_current_streak().await.unwrap().is_none());
        assert!(repo.load_total_time_spent().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_writes_all_four_keys() {
        let (kv, repo) = repo();
        let mut state = Catalog::builtin().unwrap().default_state();
        state.current_streak = 3;
        state.total_time_spent = 45;
        let math = state.realm(&RealmId::new("math")).unwrap();
        let math = math
            .with_lesson_completed(&LessonId::new("algebra-basics"))
            .unwrap()
            .with_recomputed_progress();
        state.replace_realm(math);

        repo.save(&state).await.unwrap();

        assert_eq!(kv.get("currentStreak").await.unwrap().as_deref(), Some("3"));
        assert_eq!(kv.get("totalTimeSpent").await.unwrap().as_deref(), Some("45"));
        let realms = repo.load_realms().await.unwrap().unwrap();
        let math = realms.iter().find(|r| r.id == RealmId::new("math")).unwrap();
        assert_eq!(math.header.progress, 20);
        assert!(math.lessons[0].completed);
        assert_eq!(repo.load_achievements().await.unwrap().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn undecodable_value_is_a_serialization_error_for_that_key() {
        let (kv, repo) = repo();
        kv.set("realms", "{not json").await.unwrap();
        kv.set("currentStreak", "seven").await.unwrap();
        kv.set("totalTimeSpent", " 12 ").await.unwrap();

        let err = repo.load_realms().await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Serialization {
                key: SnapshotKey::Realms,
                ..
            }
        ));
        assert!(repo.load_current_streak().await.is_err());
        assert_eq!(repo.load_total_time_spent().await.unwrap(), Some(12));
    }

    #[tokio::test]
    async fn clear_removes_every_key() {
        let (kv, repo) = repo();
        repo.save(&Catalog::builtin().unwrap().default_state())
            .await
            .unwrap();
        repo.clear().await.unwrap();
        for key in SnapshotKey::ALL {
            assert!(kv.get(key.as_str()).await.unwrap().is_none());
        }
    }
}
