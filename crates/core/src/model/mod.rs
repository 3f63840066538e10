mod achievement;
mod ids;
mod lesson;
mod quiz;
mod realm;
mod state;

pub use ids::{AchievementId, LessonId, ParseIdError, QuestionId, RealmId, TheoryBlockId};

pub use achievement::{Achievement, QUIZ_MASTER};
pub use lesson::{BlockKind, DEFAULT_REQUIRED_SCORE, Lesson, TheoryBlock};
pub use quiz::{QuizQuestion, QuizQuestionError};
pub use realm::{Realm, RealmHeader};
pub use state::ProgressState;
