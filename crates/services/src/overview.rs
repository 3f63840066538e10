use realms_core::model::{ProgressState, Realm, RealmId};
use serde::Serialize;

use crate::progress_store::ProgressStore;

/// The realm the learner has advanced furthest in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusRealm {
    pub id: RealmId,
    pub name: String,
    pub progress: i32,
    pub next_lesson: Option<String>,
}

/// Dashboard summary of the learner's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub focus: Option<FocusRealm>,
    pub hours: i64,
    pub minutes: i64,
    pub realm_count: usize,
    pub completed_lessons: usize,
    pub unlocked_achievements: usize,
    pub current_streak: i64,
}

impl Overview {
    #[must_use]
    pub fn from_store(store: &ProgressStore) -> Self {
        Self::from_state(&store.snapshot())
    }

    /// Negative study time is shown as zero.
    #[must_use]
    pub fn from_state(state: &ProgressState) -> Self {
        let minutes = state.total_time_spent.max(0);
        Self {
            focus: focus_realm(&state.realms).map(|realm| FocusRealm {
                id: realm.id().clone(),
                name: realm.name().to_owned(),
                progress: realm.progress(),
                next_lesson: realm.next_lesson().map(|l| l.title().to_owned()),
            }),
            hours: minutes / 60,
            minutes: minutes % 60,
            realm_count: state.realms.len(),
            completed_lessons: state.completed_lessons(),
            unlocked_achievements: state.unlocked_achievements(),
            current_streak: state.current_streak,
        }
    }
}

// Highest progress; the earliest realm wins a tie.
fn focus_realm(realms: &[Realm]) -> Option<&Realm> {
    realms.iter().fold(None, |best: Option<&Realm>, realm| match best {
        Some(best) if best.progress() >= realm.progress() => Some(best),
        _ => Some(realm),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use realms_core::Catalog;
    use realms_core::model::LessonId;

    fn state() -> ProgressState {
        Catalog::builtin().unwrap().default_state()
    }

    #[test]
    fn fresh_state_focuses_first_realm() {
        let overview = Overview::from_state(&state());
        let focus = overview.focus.unwrap();
        assert_eq!(focus.id, RealmId::new("math"));
        assert_eq!(focus.progress, 0);
        assert_eq!(focus.next_lesson.as_deref(), Some("Algebra Basics"));
        assert_eq!(overview.realm_count, 3);
        assert_eq!(overview.completed_lessons, 0);
    }

    #[test]
    fn most_advanced_realm_is_chosen() {
        let mut state = state();
        let physics = state
            .realm(&RealmId::new("physics"))
            .unwrap()
            .with_lesson_completed(&LessonId::new("mechanics"))
            .unwrap()
            .with_recomputed_progress();
        state.replace_realm(physics);

        let overview = Overview::from_state(&state);
        let focus = overview.focus.unwrap();
        assert_eq!(focus.id, RealmId::new("physics"));
        assert_eq!(focus.progress, 50);
        assert_eq!(focus.next_lesson.as_deref(), Some("Thermodynamics"));
        assert_eq!(overview.completed_lessons, 1);
    }

    #[test]
    fn time_is_split_into_hours_and_minutes() {
        let mut state = state();
        state.total_time_spent = 135;
        let overview = Overview::from_state(&state);
        assert_eq!((overview.hours, overview.minutes), (2, 15));

        state.total_time_spent = -20;
        let overview = Overview::from_state(&state);
        assert_eq!((overview.hours, overview.minutes), (0, 0));
    }

    #[test]
    fn empty_state_has_no_focus() {
        let overview = Overview::from_state(&ProgressState::default());
        assert!(overview.focus.is_none());
        assert_eq!(overview.realm_count, 0);
    }
}
