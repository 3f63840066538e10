//! The shipped content catalog.
//!
//! The catalog is the source of truth for structure (which realms, lessons and
//! theory blocks exist) and the base that saved progress is merged onto.

use std::collections::HashSet;

use thiserror::Error;

use crate::model::{
    Achievement, AchievementId, LessonId, ProgressState, QuizQuestionError, Realm, RealmId,
};

mod builtin;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate realm id: {0}")]
    DuplicateRealm(RealmId),

    #[error("duplicate lesson id {lesson} in realm {realm}")]
    DuplicateLesson { realm: RealmId, lesson: LessonId },

    #[error("duplicate theory block id {block} in lesson {lesson}")]
    DuplicateTheoryBlock { lesson: LessonId, block: String },

    #[error("duplicate achievement id: {0}")]
    DuplicateAchievement(AchievementId),

    #[error("invalid question in lesson {lesson}: {source}")]
    Question {
        lesson: LessonId,
        #[source]
        source: QuizQuestionError,
    },
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Fixed set of realms and achievements, validated once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    realms: Vec<Realm>,
    achievements: Vec<Achievement>,
}

impl Catalog {
    /// Build a catalog, checking id uniqueness at every level.
    ///
    /// Realms and achievements are stored in their catalog-fresh shape
    /// regardless of any completion state on the inputs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on the first duplicate id found.
    pub fn new(realms: Vec<Realm>, achievements: Vec<Achievement>) -> Result<Self, CatalogError> {
        let mut realm_ids = HashSet::new();
        for realm in &realms {
            if !realm_ids.insert(realm.id().clone()) {
                return Err(CatalogError::DuplicateRealm(realm.id().clone()));
            }

            let mut lesson_ids = HashSet::new();
            for lesson in realm.lessons() {
                if !lesson_ids.insert(lesson.id().clone()) {
                    return Err(CatalogError::DuplicateLesson {
                        realm: realm.id().clone(),
                        lesson: lesson.id().clone(),
                    });
                }

                let mut block_ids = HashSet::new();
                for block in lesson.theory_blocks() {
                    if !block_ids.insert(block.id().clone()) {
                        return Err(CatalogError::DuplicateTheoryBlock {
                            lesson: lesson.id().clone(),
                            block: block.id().to_string(),
                        });
                    }
                }
            }
        }

        let mut achievement_ids = HashSet::new();
        for achievement in &achievements {
            if !achievement_ids.insert(achievement.id().clone()) {
                return Err(CatalogError::DuplicateAchievement(achievement.id().clone()));
            }
        }

        Ok(Self {
            realms: realms.iter().map(Realm::reset).collect(),
            achievements: achievements
                .into_iter()
                .map(|a| {
                    Achievement::new(
                        a.id().clone(),
                        a.title(),
                        a.description(),
                        a.icon(),
                        a.color(),
                    )
                })
                .collect(),
        })
    }

    /// The catalog that ships with the application.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled content is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(builtin::realms()?, builtin::achievements())
    }

    #[must_use]
    pub fn realms(&self) -> &[Realm] {
        &self.realms
    }

    #[must_use]
    pub fn realm(&self, id: &RealmId) -> Option<&Realm> {
        self.realms.iter().find(|r| r.id() == id)
    }

    #[must_use]
    pub fn achievements(&self) -> &[Achievement] {
        &self.achievements
    }

    /// Default store state: every realm fresh, nothing unlocked, zero streak and time.
    #[must_use]
    pub fn default_state(&self) -> ProgressState {
        ProgressState {
            realms: self.realms.clone(),
            achievements: self.achievements.clone(),
            current_streak: 0,
            total_time_spent: 0,
        }
    }
}
