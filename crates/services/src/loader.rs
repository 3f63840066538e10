use realms_core::Catalog;
use realms_core::merge::merge_realms;
use realms_core::model::ProgressState;
use storage::repository::{SnapshotKey, SnapshotRepository, StorageError};
use tracing::{info, warn};

/// Load the persisted snapshot and merge it onto `catalog`.
///
/// Each of the four snapshot keys is resolved on its own: a missing key, a
/// read failure, or an undecodable value falls back to the catalog default for
/// that key only, so one corrupt value never blocks recovery of the others.
pub async fn load_state(catalog: &Catalog, snapshots: &SnapshotRepository) -> ProgressState {
    let defaults = catalog.default_state();

    let realms = match or_default(SnapshotKey::Realms, snapshots.load_realms().await) {
        Some(saved) => merge_realms(catalog, &saved),
        None => defaults.realms,
    };
    let achievements = or_default(
        SnapshotKey::Achievements,
        snapshots.load_achievements().await,
    )
    .unwrap_or(defaults.achievements);
    let current_streak = or_default(
        SnapshotKey::CurrentStreak,
        snapshots.load_current_streak().await,
    )
    .unwrap_or(defaults.current_streak);
    let total_time_spent = or_default(
        SnapshotKey::TotalTimeSpent,
        snapshots.load_total_time_spent().await,
    )
    .unwrap_or(defaults.total_time_spent);

    let state = ProgressState {
        realms,
        achievements,
        current_streak,
        total_time_spent,
    };
    info!(
        realms = state.realms.len(),
        completed_lessons = state.completed_lessons(),
        "progress loaded"
    );
    state
}

fn or_default<T>(key: SnapshotKey, loaded: Result<Option<T>, StorageError>) -> Option<T> {
    match loaded {
        Ok(value) => value,
        Err(err) => {
            warn!(%key, error = %err, "saved value unusable; using catalog default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realms_core::model::{LessonId, RealmId};
    use std::sync::Arc;
    use storage::repository::{InMemoryStore, KeyValueStore};

    fn setup() -> (Catalog, InMemoryStore, SnapshotRepository) {
        let kv = InMemoryStore::new();
        let repo = SnapshotRepository::new(Arc::new(kv.clone()));
        (Catalog::builtin().unwrap(), kv, repo)
    }

    #[tokio::test]
    async fn empty_store_loads_catalog_defaults() {
        let (catalog, _kv, repo) = setup();
        assert_eq!(load_state(&catalog, &repo).await, catalog.default_state());
    }

    #[tokio::test]
    async fn corrupt_realms_keep_saved_achievements() {
        let (catalog, kv, repo) = setup();
        kv.set("realms", "definitely not json").await.unwrap();
        kv.set(
            "achievements",
            r##"[{"id":"quiz-master","title":"Quiz Master","description":"","icon":"trophy",
                "color":"#48BB78","unlocked":true}]"##,
        )
        .await
        .unwrap();
        kv.set("currentStreak", "4").await.unwrap();

        let state = load_state(&catalog, &repo).await;

        assert_eq!(state.realms, catalog.realms().to_vec());
        assert_eq!(state.achievements.len(), 1);
        assert!(state.achievements[0].unlocked());
        assert_eq!(state.current_streak, 4);
        assert_eq!(state.total_time_spent, 0);
    }

    #[tokio::test]
    async fn saved_realms_are_merged_onto_catalog() {
        let (catalog, _kv, repo) = setup();
        let mut state = catalog.default_state();
        let math = state
            .realm(&RealmId::new("math"))
            .unwrap()
            .with_lesson_completed(&LessonId::new("polynomials"))
            .unwrap()
            .with_recomputed_progress();
        state.replace_realm(math);
        repo.save(&state).await.unwrap();

        let loaded = load_state(&catalog, &repo).await;
        let math = loaded.realm(&RealmId::new("math")).unwrap();
        assert_eq!(math.progress(), 20);
        assert!(math.lesson(&LessonId::new("polynomials")).unwrap().completed());
        assert!(!math.lesson(&LessonId::new("algebra-basics")).unwrap().completed());
    }

    #[tokio::test]
    async fn non_numeric_scalars_fall_back_to_zero() {
        let (catalog, kv, repo) = setup();
        kv.set("currentStreak", "NaN").await.unwrap();
        kv.set("totalTimeSpent", "90").await.unwrap();
        let state = load_state(&catalog, &repo).await;
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.total_time_spent, 90);
    }
}
