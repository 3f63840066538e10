//! Persisted shapes for snapshot values.
//!
//! These mirror the domain types so the store can serialize/deserialize
//! without leaking storage concerns into the domain layer. Field names are
//! camelCase to stay readable by earlier releases of the app. Quiz content is
//! deliberately absent: questions always come from the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use realms_core::merge::{SavedLesson, SavedRealm, SavedTheoryBlock};
use realms_core::model::{
    Achievement, AchievementId, BlockKind, DEFAULT_REQUIRED_SCORE, Lesson, LessonId, Realm,
    RealmHeader, RealmId, TheoryBlock, TheoryBlockId,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealmRecord {
    pub id: RealmId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub progress: i32,
    #[serde(default)]
    pub lessons: Vec<LessonRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    pub id: LessonId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub theory_blocks: Vec<TheoryBlockRecord>,
    #[serde(default = "default_required_score")]
    pub required_score: u32,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TheoryBlockRecord {
    pub id: TheoryBlockId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type", default = "default_block_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRecord {
    pub id: AchievementId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

fn default_required_score() -> u32 {
    DEFAULT_REQUIRED_SCORE
}

fn default_block_kind() -> String {
    BlockKind::Text.as_str().to_owned()
}

impl RealmRecord {
    #[must_use]
    pub fn from_realm(realm: &Realm) -> Self {
        Self {
            id: realm.id().clone(),
            name: realm.name().to_owned(),
            description: realm.description().to_owned(),
            icon: realm.icon().to_owned(),
            color: realm.color().to_owned(),
            progress: realm.progress(),
            lessons: realm.lessons().iter().map(LessonRecord::from_lesson).collect(),
        }
    }

    /// Reduce the record to the parts that survive a catalog merge.
    #[must_use]
    pub fn into_saved(self) -> SavedRealm {
        SavedRealm {
            id: self.id,
            header: RealmHeader {
                name: self.name,
                description: self.description,
                icon: self.icon,
                color: self.color,
                progress: self.progress,
            },
            lessons: self
                .lessons
                .into_iter()
                .map(LessonRecord::into_saved)
                .collect(),
        }
    }
}

impl LessonRecord {
    #[must_use]
    pub fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().clone(),
            title: lesson.title().to_owned(),
            description: lesson.description().to_owned(),
            completed: lesson.completed(),
            theory_blocks: lesson
                .theory_blocks()
                .iter()
                .map(TheoryBlockRecord::from_block)
                .collect(),
            required_score: lesson.required_score(),
            order: lesson.order(),
        }
    }

    fn into_saved(self) -> SavedLesson {
        SavedLesson {
            id: self.id,
            completed: self.completed,
            theory_blocks: self
                .theory_blocks
                .into_iter()
                .map(|b| SavedTheoryBlock {
                    id: b.id,
                    completed: b.completed,
                })
                .collect(),
        }
    }
}

impl TheoryBlockRecord {
    #[must_use]
    pub fn from_block(block: &TheoryBlock) -> Self {
        Self {
            id: block.id().clone(),
            title: block.title().to_owned(),
            content: block.content().to_owned(),
            kind: block.kind().as_str().to_owned(),
            video_url: block.video_url().map(str::to_owned),
            completed: block.completed(),
        }
    }
}

impl AchievementRecord {
    #[must_use]
    pub fn from_achievement(achievement: &Achievement) -> Self {
        Self {
            id: achievement.id().clone(),
            title: achievement.title().to_owned(),
            description: achievement.description().to_owned(),
            icon: achievement.icon().to_owned(),
            color: achievement.color().to_owned(),
            unlocked: achievement.unlocked(),
            unlocked_at: achievement.unlocked_at(),
        }
    }

    #[must_use]
    pub fn into_achievement(self) -> Achievement {
        Achievement::from_persisted(
            self.id,
            self.title,
            self.description,
            self.icon,
            self.color,
            self.unlocked,
            self.unlocked_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realms_core::time::fixed_now;

    #[test]
    fn realm_record_uses_camel_case_keys() {
        let realm = Realm::new(RealmId::new("math"), "Mathematics", "", "calculator", "#6B46C1")
            .with_lessons(vec![
                Lesson::new(LessonId::new("algebra-basics"), "Algebra", "", 1).with_theory_blocks(
                    vec![TheoryBlock::text(TheoryBlockId::new("tb1"), "Vars", "x")],
                ),
            ]);
        let json = serde_json::to_string(&RealmRecord::from_realm(&realm)).unwrap();
        assert!(json.contains("\"theoryBlocks\""));
        assert!(json.contains("\"requiredScore\":80"));
        assert!(json.contains("\"type\":\"text\""));
        assert!(!json.contains("videoUrl"));
        assert!(!json.contains("quiz"));
    }

    #[test]
    fn reads_legacy_lesson_without_theory_blocks() {
        // Older saves carried inline `content` and `quiz` and no block list.
        let raw = r##"[{"id":"math","name":"Mathematics","description":"d","icon":"calculator",
            "color":"#6B46C1","progress":20,"lessons":[{"id":"polynomials","title":"Polynomials",
            "description":"d","content":"text","completed":true,"quiz":[{"id":"q1"}]}]}]"##;
        let records: Vec<RealmRecord> = serde_json::from_str(raw).unwrap();
        let saved = records.into_iter().next().unwrap().into_saved();
        assert_eq!(saved.header.progress, 20);
        assert!(saved.lessons[0].completed);
        assert!(saved.lessons[0].theory_blocks.is_empty());
    }

    #[test]
    fn achievement_record_keeps_unlock_time() {
        let achievement = Achievement::new(AchievementId::new("quiz-master"), "Quiz Master", "", "trophy", "")
            .unlock(fixed_now())
            .unwrap();
        let json = serde_json::to_string(&AchievementRecord::from_achievement(&achievement)).unwrap();
        assert!(json.contains("\"unlockedAt\""));
        let back: AchievementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_achievement(), achievement);
    }

    #[test]
    fn reads_javascript_style_timestamps() {
        let raw = r##"{"id":"first-lesson","title":"First Steps","description":"","icon":"star",
            "color":"#F6AD55","unlocked":true,"unlockedAt":"2024-03-01T10:15:00.000Z"}"##;
        let record: AchievementRecord = serde_json::from_str(raw).unwrap();
        assert!(record.unlocked_at.is_some());
    }
}
