use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use realms_core::Catalog;
use realms_core::Clock;
use realms_core::model::{
    Achievement, AchievementId, LessonId, ProgressState, QUIZ_MASTER, Realm, RealmId,
    TheoryBlockId,
};
use realms_core::progress::PERFECT_SCORE;
use storage::repository::SnapshotRepository;
use tracing::debug;

use crate::loader::load_state;
use crate::persistence::SnapshotWriter;

//
// ─── STORE ─────────────────────────────────────────────────────────────────────
//

/// In-memory progress state with write-behind persistence.
///
/// Every mutation is applied synchronously and then queued for writing;
/// callers never wait on storage. Unknown ids are silently ignored. A
/// mutation that changes nothing does not queue a write.
pub struct ProgressStore {
    catalog: Arc<Catalog>,
    clock: Clock,
    state: Mutex<ProgressState>,
    writer: SnapshotWriter,
}

impl ProgressStore {
    /// Load the saved snapshot, merge it onto the catalog and start the writer.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn load(catalog: Arc<Catalog>, snapshots: SnapshotRepository, clock: Clock) -> Self {
        let state = load_state(&catalog, &snapshots).await;
        Self::with_state(catalog, state, snapshots, clock)
    }

    /// Build a store around an already-loaded state.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a tokio runtime.
    #[must_use]
    pub fn with_state(
        catalog: Arc<Catalog>,
        state: ProgressState,
        snapshots: SnapshotRepository,
        clock: Clock,
    ) -> Self {
        Self {
            catalog,
            clock,
            state: Mutex::new(state),
            writer: SnapshotWriter::spawn(snapshots),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ProgressState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, state: &ProgressState) {
        self.writer.enqueue(state.clone());
    }

    /// Wait for every queued snapshot write to finish.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    // ─── Reads ─────────────────────────────────────────────────────────────────

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressState {
        self.lock().clone()
    }

    #[must_use]
    pub fn realms(&self) -> Vec<Realm> {
        self.lock().realms.clone()
    }

    #[must_use]
    pub fn realm(&self, id: &RealmId) -> Option<Realm> {
        self.lock().realm(id).cloned()
    }

    #[must_use]
    pub fn achievements(&self) -> Vec<Achievement> {
        self.lock().achievements.clone()
    }

    #[must_use]
    pub fn achievement(&self, id: &AchievementId) -> Option<Achievement> {
        self.lock().achievement(id).cloned()
    }

    #[must_use]
    pub fn current_streak(&self) -> i64 {
        self.lock().current_streak
    }

    /// Minutes spent studying.
    #[must_use]
    pub fn total_time_spent(&self) -> i64 {
        self.lock().total_time_spent
    }

    // ─── Mutations ─────────────────────────────────────────────────────────────

    /// Unlock an achievement, stamping the current time.
    ///
    /// Idempotent: an already-unlocked achievement keeps its original stamp.
    pub fn unlock_achievement(&self, id: &AchievementId) {
        let mut state = self.lock();
        if apply_unlock(&mut state, id, self.clock) {
            debug!(achievement = %id, "achievement unlocked");
            self.persist(&state);
        }
    }

    /// Overwrite a realm's progress verbatim. The value is not clamped.
    pub fn update_realm_progress(&self, realm_id: &RealmId, progress: i32) {
        let mut state = self.lock();
        if apply_progress(&mut state, realm_id, progress) {
            debug!(realm = %realm_id, progress, "realm progress set");
            self.persist(&state);
        }
    }

    /// Mark a lesson complete and recompute its realm's progress.
    pub fn complete_lesson(&self, realm_id: &RealmId, lesson_id: &LessonId) {
        let mut state = self.lock();
        self.complete_lesson_locked(&mut state, realm_id, lesson_id);
    }

    /// Record a quiz result given as a 0–100 percentage.
    ///
    /// A perfect score completes the lesson and unlocks `quiz-master`. Any
    /// score then recomputes realm progress from the state after those
    /// changes. Only an unknown realm makes this a no-op; an unknown lesson
    /// still earns the badge and the recompute.
    pub fn complete_quiz(&self, realm_id: &RealmId, lesson_id: &LessonId, score: i32) {
        let mut state = self.lock();
        if state.realm(realm_id).is_none() {
            return;
        }
        debug!(realm = %realm_id, lesson = %lesson_id, score, "quiz completed");

        if score == PERFECT_SCORE {
            self.complete_lesson_locked(&mut state, realm_id, lesson_id);
            if apply_unlock(&mut state, &AchievementId::new(QUIZ_MASTER), self.clock) {
                self.persist(&state);
            }
        }

        if apply_recompute(&mut state, realm_id) {
            self.persist(&state);
        }
    }

    /// Mark one theory block of a lesson as read.
    pub fn complete_theory_block(
        &self,
        realm_id: &RealmId,
        lesson_id: &LessonId,
        block_id: &TheoryBlockId,
    ) {
        let mut state = self.lock();
        let Some(lesson) = state.lesson(realm_id, lesson_id) else {
            return;
        };
        if lesson.theory_block(block_id).is_none_or(|b| b.completed()) {
            return;
        }
        let updated = lesson.with_block_completed(block_id);
        let Some(realm) = state.realm(realm_id).and_then(|r| r.with_lesson(updated)) else {
            return;
        };
        state.replace_realm(realm);
        debug!(realm = %realm_id, lesson = %lesson_id, block = %block_id, "theory block read");
        self.persist(&state);
    }

    /// Add study minutes. Negative values are accepted as-is; the total
    /// saturates at the `i64` bounds.
    pub fn add_time_spent(&self, minutes: i64) {
        let mut state = self.lock();
        state.total_time_spent = state.total_time_spent.saturating_add(minutes);
        debug!(minutes, total = state.total_time_spent, "time spent added");
        self.persist(&state);
    }

    /// Replace the whole state with catalog defaults.
    pub fn reset_progress(&self) {
        let mut state = self.lock();
        *state = self.catalog.default_state();
        debug!("progress reset to catalog defaults");
        self.persist(&state);
    }

    /// Replace one realm with its catalog-fresh shape, leaving everything else.
    pub fn reset_realm(&self, realm_id: &RealmId) {
        let Some(fresh) = self.catalog.realm(realm_id) else {
            return;
        };
        let mut state = self.lock();
        if state.replace_realm(fresh.reset()) {
            debug!(realm = %realm_id, "realm reset");
            self.persist(&state);
        }
    }

    fn complete_lesson_locked(
        &self,
        state: &mut ProgressState,
        realm_id: &RealmId,
        lesson_id: &LessonId,
    ) {
        let already_done = state
            .lesson(realm_id, lesson_id)
            .is_some_and(|l| l.completed());
        if !already_done {
            let Some(realm) = state
                .realm(realm_id)
                .and_then(|r| r.with_lesson_completed(lesson_id))
            else {
                return;
            };
            state.replace_realm(realm);
            debug!(realm = %realm_id, lesson = %lesson_id, "lesson completed");
            self.persist(state);
        }

        if apply_recompute(state, realm_id) {
            self.persist(state);
        }
    }
}

fn apply_unlock(state: &mut ProgressState, id: &AchievementId, clock: Clock) -> bool {
    match state.achievement(id).and_then(|a| a.unlock(clock.now())) {
        Some(unlocked) => state.replace_achievement(unlocked),
        None => false,
    }
}

fn apply_progress(state: &mut ProgressState, realm_id: &RealmId, progress: i32) -> bool {
    match state.realm(realm_id) {
        Some(realm) if realm.progress() == progress => false,
        Some(realm) => {
            let updated = realm.clone().with_progress(progress);
            state.replace_realm(updated)
        }
        None => false,
    }
}

fn apply_recompute(state: &mut ProgressState, realm_id: &RealmId) -> bool {
    match state.realm(realm_id).map(Realm::computed_progress) {
        Some(progress) => apply_progress(state, realm_id, progress),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use realms_core::time::{fixed_clock, fixed_now};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::repository::{InMemoryStore, KeyValueStore, StorageError};

    /// Counts backend writes.
    #[derive(Clone, Default)]
    struct CountingStore {
        inner: InMemoryStore,
        writes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl KeyValueStore for CountingStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    fn store() -> ProgressStore {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let state = catalog.default_state();
        let snapshots = SnapshotRepository::new(Arc::new(InMemoryStore::new()));
        ProgressStore::with_state(catalog, state, snapshots, fixed_clock())
    }

    fn math() -> RealmId {
        RealmId::new("math")
    }

    fn quiz_master(store: &ProgressStore) -> Achievement {
        store.achievement(&AchievementId::new(QUIZ_MASTER)).unwrap()
    }

    #[tokio::test]
    async fn complete_lesson_recomputes_progress() {
        let store = store();
        store.complete_lesson(&math(), &LessonId::new("algebra-basics"));
        let realm = store.realm(&math()).unwrap();
        assert_eq!(realm.progress(), 20);
        assert_eq!(realm.progress(), realm.computed_progress());
    }

    #[tokio::test]
    async fn complete_lesson_twice_does_not_inflate_progress() {
        let store = store();
        let lesson = LessonId::new("algebra-basics");
        store.complete_lesson(&math(), &lesson);
        store.complete_lesson(&math(), &lesson);
        assert_eq!(store.realm(&math()).unwrap().progress(), 20);
    }

    #[tokio::test]
    async fn complete_lesson_with_unknown_ids_is_noop() {
        let store = store();
        let before = store.snapshot();
        store.complete_lesson(&RealmId::new("alchemy"), &LessonId::new("algebra-basics"));
        store.complete_lesson(&math(), &LessonId::new("nope"));
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn perfect_quiz_completes_lesson_and_unlocks() {
        let store = store();
        let lesson = LessonId::new("quadratic-equations");
        store.complete_quiz(&math(), &lesson, 100);

        let realm = store.realm(&math()).unwrap();
        assert!(realm.lesson(&lesson).unwrap().completed());
        assert_eq!(realm.progress(), 20);
        assert!(quiz_master(&store).unlocked());
    }

    #[tokio::test]
    async fn imperfect_quiz_leaves_lesson_and_badge() {
        let store = store();
        let lesson = LessonId::new("quadratic-equations");
        store.complete_quiz(&math(), &lesson, 99);

        let realm = store.realm(&math()).unwrap();
        assert!(!realm.lesson(&lesson).unwrap().completed());
        assert_eq!(realm.progress(), 0);
        assert!(!quiz_master(&store).unlocked());
    }

    #[tokio::test]
    async fn imperfect_quiz_resyncs_overwritten_progress() {
        let store = store();
        store.update_realm_progress(&math(), 73);
        store.complete_quiz(&math(), &LessonId::new("polynomials"), 50);
        assert_eq!(store.realm(&math()).unwrap().progress(), 0);
    }

    #[tokio::test]
    async fn unlock_is_idempotent_and_keeps_first_stamp() {
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let snapshots = SnapshotRepository::new(Arc::new(InMemoryStore::new()));
        let first = ProgressStore::with_state(
            Arc::clone(&catalog),
            catalog.default_state(),
            snapshots.clone(),
            fixed_clock(),
        );
        let id = AchievementId::new("first-lesson");
        first.unlock_achievement(&id);
        let unlocked = first.snapshot();

        let later = ProgressStore::with_state(
            catalog,
            unlocked,
            snapshots,
            Clock::fixed(fixed_now() + chrono::Duration::days(1)),
        );
        later.unlock_achievement(&id);

        let achievement = later.achievement(&id).unwrap();
        assert!(achievement.unlocked());
        assert_eq!(achievement.unlocked_at(), Some(fixed_now()));
    }

    #[tokio::test]
    async fn unknown_achievement_is_ignored() {
        let store = store();
        store.unlock_achievement(&AchievementId::new("nope"));
        assert_eq!(store.snapshot().unlocked_achievements(), 0);
    }

    #[tokio::test]
    async fn update_realm_progress_is_not_clamped() {
        let store = store();
        store.update_realm_progress(&math(), 250);
        assert_eq!(store.realm(&math()).unwrap().progress(), 250);
        store.update_realm_progress(&math(), -5);
        assert_eq!(store.realm(&math()).unwrap().progress(), -5);
    }

    #[tokio::test]
    async fn add_time_spent_accepts_negative() {
        let store = store();
        store.add_time_spent(15);
        store.add_time_spent(-20);
        assert_eq!(store.total_time_spent(), -5);
    }

    #[tokio::test]
    async fn reset_realm_touches_only_that_realm() {
        let store = store();
        let physics = RealmId::new("physics");
        store.complete_lesson(&math(), &LessonId::new("algebra-basics"));
        store.complete_lesson(&physics, &LessonId::new("mechanics"));
        store.unlock_achievement(&AchievementId::new(QUIZ_MASTER));
        let physics_before = store.realm(&physics).unwrap();

        store.reset_realm(&math());

        let math_realm = store.realm(&math()).unwrap();
        assert_eq!(math_realm.progress(), 0);
        assert!(math_realm.lessons().iter().all(|l| !l.completed()));
        assert_eq!(store.realm(&physics).unwrap(), physics_before);
        assert!(quiz_master(&store).unlocked());
    }

    #[tokio::test]
    async fn reset_progress_restores_catalog_defaults() {
        let store = store();
        store.complete_quiz(&math(), &LessonId::new("algebra-basics"), 100);
        store.add_time_spent(15);
        store.reset_progress();
        assert_eq!(store.snapshot(), store.catalog().default_state());
    }

    #[tokio::test]
    async fn theory_block_completion_is_recorded() {
        let store = store();
        let lesson = LessonId::new("algebra-basics");
        store.complete_theory_block(&math(), &lesson, &TheoryBlockId::new("tb2"));
        let realm = store.realm(&math()).unwrap();
        let lesson = realm.lesson(&lesson).unwrap();
        let flags: Vec<bool> = lesson.theory_blocks().iter().map(|b| b.completed()).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[tokio::test]
    async fn perfect_quiz_for_unknown_lesson_still_unlocks_and_recomputes() {
        let store = store();
        store.update_realm_progress(&math(), 73);
        store.complete_quiz(&math(), &LessonId::new("no-such-lesson"), 100);

        assert!(quiz_master(&store).unlocked());
        assert_eq!(store.realm(&math()).unwrap().progress(), 0);
    }

    #[tokio::test]
    async fn quiz_for_unknown_realm_is_noop() {
        let store = store();
        let before = store.snapshot();
        store.complete_quiz(&RealmId::new("alchemy"), &LessonId::new("algebra-basics"), 100);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn add_time_spent_saturates_at_bounds() {
        let store = store();
        store.add_time_spent(i64::MAX);
        store.add_time_spent(1);
        assert_eq!(store.total_time_spent(), i64::MAX);

        store.reset_progress();
        store.add_time_spent(i64::MIN);
        store.add_time_spent(-1);
        assert_eq!(store.total_time_spent(), i64::MIN);
    }

    #[tokio::test]
    async fn repeated_completion_queues_no_write() {
        let kv = CountingStore::default();
        let catalog = Arc::new(Catalog::builtin().unwrap());
        let store = ProgressStore::with_state(
            Arc::clone(&catalog),
            catalog.default_state(),
            SnapshotRepository::new(Arc::new(kv.clone())),
            fixed_clock(),
        );
        let lesson = LessonId::new("algebra-basics");

        store.complete_lesson(&math(), &lesson);
        store.flush().await;
        let writes = kv.writes.load(Ordering::SeqCst);
        assert!(writes > 0);

        store.complete_lesson(&math(), &lesson);
        store.update_realm_progress(&math(), 20);
        store.flush().await;
        assert_eq!(kv.writes.load(Ordering::SeqCst), writes);
    }
}
