//! Merge-on-load: reconcile saved progress against the current catalog.
//!
//! Structure always comes from the catalog. Saved data contributes only what
//! the user produced: realm display fields and progress, and the `completed`
//! flags of lessons and theory blocks that still exist under the same id.

use crate::catalog::Catalog;
use crate::model::{Lesson, LessonId, Realm, RealmHeader, RealmId, TheoryBlockId};

/// Progress-bearing projection of a persisted realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRealm {
    pub id: RealmId,
    pub header: RealmHeader,
    pub lessons: Vec<SavedLesson>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLesson {
    pub id: LessonId,
    pub completed: bool,
    pub theory_blocks: Vec<SavedTheoryBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTheoryBlock {
    pub id: TheoryBlockId,
    pub completed: bool,
}

impl SavedRealm {
    #[must_use]
    pub fn from_realm(realm: &Realm) -> Self {
        Self {
            id: realm.id().clone(),
            header: realm.header(),
            lessons: realm.lessons().iter().map(SavedLesson::from_lesson).collect(),
        }
    }
}

impl SavedLesson {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().clone(),
            completed: lesson.completed(),
            theory_blocks: lesson
                .theory_blocks()
                .iter()
                .map(|b| SavedTheoryBlock {
                    id: b.id().clone(),
                    completed: b.completed(),
                })
                .collect(),
        }
    }
}

/// Merge saved realms onto the catalog.
///
/// The result has exactly the catalog's realms, in catalog order, each with
/// exactly the catalog's lessons and theory blocks. Saved realms or lessons the
/// catalog no longer defines are dropped.
#[must_use]
pub fn merge_realms(catalog: &Catalog, saved: &[SavedRealm]) -> Vec<Realm> {
    catalog
        .realms()
        .iter()
        .map(|fresh| match saved.iter().find(|s| &s.id == fresh.id()) {
            Some(saved_realm) => merge_realm(fresh, saved_realm),
            None => fresh.clone(),
        })
        .collect()
}

fn merge_realm(fresh: &Realm, saved: &SavedRealm) -> Realm {
    let lessons = fresh
        .lessons()
        .iter()
        .map(|lesson| match saved.lessons.iter().find(|s| &s.id == lesson.id()) {
            Some(saved_lesson) => merge_lesson(lesson, saved_lesson),
            None => lesson.clone(),
        })
        .collect();

    fresh
        .clone()
        .with_lessons(lessons)
        .with_header_of(&saved.header)
}

fn merge_lesson(fresh: &Lesson, saved: &SavedLesson) -> Lesson {
    let mut merged = fresh.clone().with_completed(saved.completed);
    for block in &saved.theory_blocks {
        if block.completed {
            merged = merged.with_block_completed(&block.id);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TheoryBlock;

    fn catalog() -> Catalog {
        let math = Realm::new(RealmId::new("math"), "Mathematics", "", "calculator", "#6B46C1")
            .with_lessons(vec![
                Lesson::new(LessonId::new("algebra"), "Algebra", "", 1).with_theory_blocks(vec![
                    TheoryBlock::text(TheoryBlockId::new("tb1"), "One", ""),
                    TheoryBlock::text(TheoryBlockId::new("tb2"), "Two", ""),
                ]),
                Lesson::new(LessonId::new("geometry"), "Geometry", "", 2),
            ]);
        let physics = Realm::new(RealmId::new("physics"), "Physics", "", "flash", "#4299E1")
            .with_lessons(vec![Lesson::new(LessonId::new("mechanics"), "Mechanics", "", 1)]);
        Catalog::new(vec![math, physics], Vec::new()).unwrap()
    }

    fn saved_math(lessons: Vec<SavedLesson>, progress: i32) -> SavedRealm {
        SavedRealm {
            id: RealmId::new("math"),
            header: RealmHeader {
                name: "Maths (old name)".into(),
                description: String::new(),
                icon: "calculator".into(),
                color: "#6B46C1".into(),
                progress,
            },
            lessons,
        }
    }

    fn saved_lesson(id: &str, completed: bool) -> SavedLesson {
        SavedLesson {
            id: LessonId::new(id),
            completed,
            theory_blocks: Vec::new(),
        }
    }

    #[test]
    fn no_saved_realms_yields_catalog() {
        let catalog = catalog();
        assert_eq!(merge_realms(&catalog, &[]), catalog.realms().to_vec());
    }

    #[test]
    fn saved_completion_and_header_survive() {
        let catalog = catalog();
        let merged = merge_realms(&catalog, &[saved_math(vec![saved_lesson("algebra", true)], 50)]);
        let math = &merged[0];
        assert_eq!(math.progress(), 50);
        assert_eq!(math.name(), "Maths (old name)");
        assert!(math.lesson(&LessonId::new("algebra")).unwrap().completed());
    }

    #[test]
    fn lesson_missing_from_save_appears_incomplete() {
        let catalog = catalog();
        let merged = merge_realms(&catalog, &[saved_math(vec![saved_lesson("algebra", true)], 50)]);
        let geometry = merged[0].lesson(&LessonId::new("geometry")).unwrap();
        assert!(!geometry.completed());
    }

    #[test]
    fn lesson_removed_from_catalog_is_dropped() {
        let catalog = catalog();
        let merged = merge_realms(
            &catalog,
            &[saved_math(
                vec![saved_lesson("algebra", true), saved_lesson("retired", true)],
                67,
            )],
        );
        let ids: Vec<&str> = merged[0].lessons().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["algebra", "geometry"]);
    }

    #[test]
    fn saved_realm_unknown_to_catalog_is_dropped() {
        let catalog = catalog();
        let mut stray = saved_math(Vec::new(), 10);
        stray.id = RealmId::new("alchemy");
        let merged = merge_realms(&catalog, &[stray]);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|r| r.id() != &RealmId::new("alchemy")));
    }

    #[test]
    fn theory_block_flags_carry_over_by_id() {
        let catalog = catalog();
        let lesson = SavedLesson {
            id: LessonId::new("algebra"),
            completed: false,
            theory_blocks: vec![
                SavedTheoryBlock {
                    id: TheoryBlockId::new("tb2"),
                    completed: true,
                },
                SavedTheoryBlock {
                    id: TheoryBlockId::new("gone"),
                    completed: true,
                },
            ],
        };
        let merged = merge_realms(&catalog, &[saved_math(vec![lesson], 0)]);
        let algebra = merged[0].lesson(&LessonId::new("algebra")).unwrap();
        let flags: Vec<bool> = algebra.theory_blocks().iter().map(|b| b.completed()).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn merge_keeps_catalog_realm_order() {
        let catalog = catalog();
        let mut physics = saved_math(Vec::new(), 0);
        physics.id = RealmId::new("physics");
        let merged = merge_realms(&catalog, &[physics, saved_math(Vec::new(), 0)]);
        assert_eq!(merged[0].id(), &RealmId::new("math"));
        assert_eq!(merged[1].id(), &RealmId::new("physics"));
    }
}
