use realms_core::Catalog;
use realms_core::model::{AchievementId, LessonId, QUIZ_MASTER, RealmId};
use realms_core::time::fixed_now;
use storage::repository::{KeyValueStore, SnapshotRepository, Storage, StorageError};
use storage::sqlite::SqliteRepository;
use std::sync::Arc;

#[tokio::test]
async fn sqlite_kv_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_kv_roundtrip?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.get("realms").await.unwrap().is_none());

    repo.set("currentStreak", "1").await.unwrap();
    repo.set("currentStreak", "2").await.unwrap();
    assert_eq!(repo.get("currentStreak").await.unwrap().as_deref(), Some("2"));

    repo.remove("currentStreak").await.unwrap();
    assert!(repo.get("currentStreak").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate_twice?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn sqlite_snapshot_survives_save_and_load() {
    let storage = Storage::sqlite("sqlite:file:memdb_snapshot?mode=memory&cache=shared")
        .await
        .expect("storage");
    let snapshots = storage.snapshots();

    let catalog = Catalog::builtin().unwrap();
    let mut state = catalog.default_state();
    let physics = state
        .realm(&RealmId::new("physics"))
        .unwrap()
        .with_lesson_completed(&LessonId::new("mechanics"))
        .unwrap()
        .with_recomputed_progress();
    state.replace_realm(physics);
    let unlocked = state
        .achievement(&AchievementId::new(QUIZ_MASTER))
        .unwrap()
        .unlock(fixed_now())
        .unwrap();
    state.replace_achievement(unlocked);
    state.total_time_spent = 30;

    snapshots.save(&state).await.expect("save");

    let realms = snapshots.load_realms().await.unwrap().unwrap();
    let physics = realms
        .iter()
        .find(|r| r.id == RealmId::new("physics"))
        .unwrap();
    assert_eq!(physics.header.progress, 50);

    let achievements = snapshots.load_achievements().await.unwrap().unwrap();
    let quiz_master = achievements
        .iter()
        .find(|a| a.id() == &AchievementId::new(QUIZ_MASTER))
        .unwrap();
    assert_eq!(quiz_master.unlocked_at(), Some(fixed_now()));
    assert_eq!(snapshots.load_total_time_spent().await.unwrap(), Some(30));
    assert_eq!(snapshots.load_current_streak().await.unwrap(), Some(0));
}

#[tokio::test]
async fn sqlite_corrupt_value_reports_serialization_error() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_corrupt?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo.set("achievements", "[{\"id\":").await.unwrap();

    let snapshots = SnapshotRepository::new(Arc::new(repo));
    let err = snapshots.load_achievements().await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization { .. }));
}
