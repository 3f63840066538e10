use crate::model::ids::{LessonId, RealmId};
use crate::model::lesson::Lesson;
use crate::progress::realm_progress;

/// A top-level subject area with ordered lessons.
///
/// `progress` is normally derived from the lesson completion ratio, but it is
/// stored rather than computed so a persisted value survives a catalog merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Realm {
    id: RealmId,
    name: String,
    description: String,
    icon: String,
    color: String,
    progress: i32,
    lessons: Vec<Lesson>,
}

impl Realm {
    #[must_use]
    pub fn new(
        id: RealmId,
        name: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            icon: icon.into(),
            color: color.into(),
            progress: 0,
            lessons: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_lessons(mut self, lessons: Vec<Lesson>) -> Self {
        self.lessons = lessons;
        self
    }

    /// Overwrites `progress` verbatim; the value is neither clamped nor checked.
    #[must_use]
    pub fn with_progress(mut self, progress: i32) -> Self {
        self.progress = progress;
        self
    }

    /// Replaces the display fields with those of `other`, keeping id and lessons.
    #[must_use]
    pub fn with_header_of(mut self, other: &RealmHeader) -> Self {
        self.name.clone_from(&other.name);
        self.description.clone_from(&other.description);
        self.icon.clone_from(&other.icon);
        self.color.clone_from(&other.color);
        self.progress = other.progress;
        self
    }

    /// Returns a copy with the named lesson marked complete.
    ///
    /// `None` when the lesson does not belong to this realm.
    #[must_use]
    pub fn with_lesson_completed(&self, lesson_id: &LessonId) -> Option<Self> {
        let index = self.lessons.iter().position(|l| l.id() == lesson_id)?;
        let mut next = self.clone();
        next.lessons[index] = next.lessons[index].clone().with_completed(true);
        Some(next)
    }

    /// Returns a copy with a single lesson replaced by id.
    #[must_use]
    pub fn with_lesson(&self, lesson: Lesson) -> Option<Self> {
        let index = self.lessons.iter().position(|l| l.id() == lesson.id())?;
        let mut next = self.clone();
        next.lessons[index] = lesson;
        Some(next)
    }

    /// Returns a copy whose `progress` is recomputed from lesson completion.
    #[must_use]
    pub fn with_recomputed_progress(&self) -> Self {
        self.clone().with_progress(self.computed_progress())
    }

    /// Catalog-fresh copy: progress 0, every lesson and block incomplete.
    #[must_use]
    pub fn reset(&self) -> Self {
        let mut next = self.clone().with_progress(0);
        next.lessons = self.lessons.iter().map(Lesson::reset).collect();
        next
    }

    #[must_use]
    pub fn id(&self) -> &RealmId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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
    pub fn progress(&self) -> i32 {
        self.progress
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&Lesson> {
        self.lessons.iter().find(|l| l.id() == id)
    }

    /// Lessons in presentation order; equal `order` values keep catalog order.
    #[must_use]
    pub fn ordered_lessons(&self) -> Vec<&Lesson> {
        let mut lessons: Vec<&Lesson> = self.lessons.iter().collect();
        lessons.sort_by_key(|l| l.order());
        lessons
    }

    /// First incomplete lesson in presentation order.
    #[must_use]
    pub fn next_lesson(&self) -> Option<&Lesson> {
        self.ordered_lessons().into_iter().find(|l| !l.completed())
    }

    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed()).count()
    }

    /// `round(100 × completed / total)` for the current lesson states.
    #[must_use]
    pub fn computed_progress(&self) -> i32 {
        realm_progress(self.completed_lessons(), self.lessons.len())
    }

    #[must_use]
    pub fn header(&self) -> RealmHeader {
        RealmHeader {
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.clone(),
            color: self.color.clone(),
            progress: self.progress,
        }
    }
}

/// The top-level, non-structural fields of a realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RealmHeader {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color: String,
    pub progress: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn realm(lessons: usize) -> Realm {
        let lessons = (1..=lessons)
            .map(|i| Lesson::new(LessonId::new(format!("l{i}")), format!("Lesson {i}"), "", i as u32))
            .collect();
        Realm::new(RealmId::new("r"), "Realm", "", "star", "#000000").with_lessons(lessons)
    }

    #[test]
    fn completing_lesson_then_recomputing_updates_progress() {
        let realm = realm(5)
            .with_lesson_completed(&LessonId::new("l1"))
            .unwrap()
            .with_recomputed_progress();
        assert_eq!(realm.progress(), 20);
        assert_eq!(realm.completed_lessons(), 1);
    }

    #[test]
    fn completing_unknown_lesson_is_none() {
        assert!(realm(2).with_lesson_completed(&LessonId::new("nope")).is_none());
    }

    #[test]
    fn completing_twice_does_not_double_count() {
        let id = LessonId::new("l2");
        let realm = realm(4)
            .with_lesson_completed(&id)
            .unwrap()
            .with_lesson_completed(&id)
            .unwrap()
            .with_recomputed_progress();
        assert_eq!(realm.progress(), 25);
    }

    #[test]
    fn ordered_lessons_are_stable_on_ties() {
        let lessons = vec![
            Lesson::new(LessonId::new("b"), "B", "", 2),
            Lesson::new(LessonId::new("a1"), "A1", "", 1),
            Lesson::new(LessonId::new("a2"), "A2", "", 1),
        ];
        let realm = Realm::new(RealmId::new("r"), "R", "", "", "").with_lessons(lessons);
        let ids: Vec<&str> = realm.ordered_lessons().iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "b"]);
    }

    #[test]
    fn reset_clears_progress_and_completion() {
        let realm = realm(2)
            .with_lesson_completed(&LessonId::new("l1"))
            .unwrap()
            .with_progress(50)
            .reset();
        assert_eq!(realm.progress(), 0);
        assert_eq!(realm.completed_lessons(), 0);
    }

    #[test]
    fn next_lesson_skips_completed() {
        let realm = realm(3).with_lesson_completed(&LessonId::new("l1")).unwrap();
        assert_eq!(realm.next_lesson().unwrap().id(), &LessonId::new("l2"));
    }
}
