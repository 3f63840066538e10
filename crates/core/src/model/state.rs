use crate::model::achievement::Achievement;
use crate::model::ids::{AchievementId, LessonId, RealmId};
use crate::model::lesson::Lesson;
use crate::model::realm::Realm;

/// Full progress state: what the store holds and what a snapshot mirrors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    pub realms: Vec<Realm>,
    pub achievements: Vec<Achievement>,
    pub current_streak: i64,
    /// Minutes.
    pub total_time_spent: i64,
}

impl ProgressState {
    #[must_use]
    pub fn realm(&self, id: &RealmId) -> Option<&Realm> {
        self.realms.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn lesson(&self, realm_id: &RealmId, lesson_id: &LessonId) -> Option<&Lesson> {
        self.realm(realm_id)?.lesson(lesson_id)
    }

    #[must_use]
    pub fn achievement(&self, id: &AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id() == id)
    }

    /// Replace a realm in place by id. Returns false if no realm matched.
    pub fn replace_realm(&mut self, realm: Realm) -> bool {
        match self.realms.iter_mut().find(|r| r.id() == realm.id()) {
            Some(slot) => {
                *slot = realm;
                true
            }
            None => false,
        }
    }

    /// Replace an achievement in place by id. Returns false if no achievement matched.
    pub fn replace_achievement(&mut self, achievement: Achievement) -> bool {
        match self
            .achievements
            .iter_mut()
            .find(|a| a.id() == achievement.id())
        {
            Some(slot) => {
                *slot = achievement;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.realms.iter().map(Realm::completed_lessons).sum()
    }

    #[must_use]
    pub fn unlocked_achievements(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked()).count()
    }
}
