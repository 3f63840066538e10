use chrono::{DateTime, Utc};

use crate::model::ids::AchievementId;

/// Achievement unlocked by a perfect quiz score.
pub const QUIZ_MASTER: &str = "quiz-master";

/// A badge from the fixed achievement set.
///
/// Unlocking is monotonic: once `unlocked` is true it stays true, and the first
/// `unlocked_at` stamp is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Achievement {
    id: AchievementId,
    title: String,
    description: String,
    icon: String,
    color: String,
    unlocked_at: Option<DateTime<Utc>>,
    unlocked: bool,
}

impl Achievement {
    #[must_use]
    pub fn new(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            unlocked: false,
            unlocked_at: None,
        }
    }

    /// Rebuild an achievement from persisted state.
    ///
    /// A persisted `unlocked_at` without `unlocked` is kept as-is; older
    /// snapshots may carry an unlocked flag with no timestamp.
    #[must_use]
    pub fn from_persisted(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
        unlocked: bool,
        unlocked_at: Option<DateTime<Utc>>,
    ) -> Self {
        let mut achievement = Self::new(id, title, description, icon, color);
        achievement.unlocked = unlocked;
        achievement.unlocked_at = unlocked_at;
        achievement
    }

    /// Returns the unlocked form, or `None` if it was already unlocked.
    #[must_use]
    pub fn unlock(&self, at: DateTime<Utc>) -> Option<Self> {
        if self.unlocked {
            return None;
        }
        let mut next = self.clone();
        next.unlocked = true;
        next.unlocked_at = Some(at);
        Some(next)
    }

    #[must_use]
    pub fn id(&self) -> &AchievementId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    #[must_use]
    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    #[must_use]
    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        self.unlocked_at
    }
}
