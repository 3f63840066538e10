use realms_core::model::{Lesson, LessonId, QuizQuestion, RealmId};
use realms_core::progress::quiz_score;
use tracing::debug;

use crate::error::QuizSessionError;
use crate::progress_store::ProgressStore;

/// Study minutes credited for finishing a lesson's quiz.
pub const LESSON_MINUTES: i64 = 15;

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// What the learner sees after picking an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: usize,
    pub correct_answer: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// Outcome of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Next,
    Finished { score: i32, correct: usize, total: usize },
}

/// Aggregated view of quiz progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Steps through a lesson's quiz one question at a time.
///
/// Each question must be answered before `advance` moves on. The last
/// `advance` finishes the quiz with a percentage score rounded half up.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    current: usize,
    selected: Option<usize>,
    correct: usize,
    finished: bool,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `QuizSessionError::NoQuestions` for an empty question list.
    pub fn new(questions: Vec<QuizQuestion>) -> Result<Self, QuizSessionError> {
        if questions.is_empty() {
            return Err(QuizSessionError::NoQuestions);
        }
        Ok(Self {
            questions,
            current: 0,
            selected: None,
            correct: 0,
            finished: false,
        })
    }

    /// # Errors
    ///
    /// Returns `QuizSessionError::NoQuestions` if the lesson has no quiz.
    pub fn for_lesson(lesson: &Lesson) -> Result<Self, QuizSessionError> {
        Self::new(lesson.quiz().to_vec())
    }

    /// The question being shown, or `None` once finished.
    #[must_use]
    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.finished {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let answered = if self.finished {
            self.total()
        } else {
            self.current + usize::from(self.selected.is_some())
        };
        QuizProgress {
            total: self.total(),
            answered,
            remaining: self.total() - answered,
            is_complete: self.finished,
        }
    }

    /// Pick an option for the current question.
    ///
    /// # Errors
    ///
    /// Returns `Finished`, `AlreadyAnswered` or `OptionOutOfRange`.
    pub fn answer(&mut self, index: usize) -> Result<AnswerFeedback, QuizSessionError> {
        let question = self.current().ok_or(QuizSessionError::Finished)?;
        if self.selected.is_some() {
            return Err(QuizSessionError::AlreadyAnswered);
        }
        let options = question.options().len();
        if index >= options {
            return Err(QuizSessionError::OptionOutOfRange { index, options });
        }

        let feedback = AnswerFeedback {
            selected: index,
            correct_answer: question.correct_answer(),
            is_correct: question.is_correct(index),
            explanation: question.explanation().to_owned(),
        };
        if feedback.is_correct {
            self.correct += 1;
        }
        self.selected = Some(index);
        Ok(feedback)
    }

    /// Move to the next question, or finish after the last one.
    ///
    /// # Errors
    ///
    /// Returns `Finished` or `NotAnswered`.
    pub fn advance(&mut self) -> Result<QuizStep, QuizSessionError> {
        if self.finished {
            return Err(QuizSessionError::Finished);
        }
        if self.selected.is_none() {
            return Err(QuizSessionError::NotAnswered);
        }

        self.selected = None;
        if self.current + 1 < self.questions.len() {
            self.current += 1;
            return Ok(QuizStep::Next);
        }

        self.finished = true;
        let score = self.score()?;
        Ok(QuizStep::Finished {
            score,
            correct: self.correct,
            total: self.total(),
        })
    }

    /// Final percentage score.
    ///
    /// # Errors
    ///
    /// Returns `NotFinished` until the last question has been advanced past.
    pub fn score(&self) -> Result<i32, QuizSessionError> {
        if !self.finished {
            return Err(QuizSessionError::NotFinished);
        }
        quiz_score(self.correct, self.total()).ok_or(QuizSessionError::NoQuestions)
    }

    /// Whether the final score reaches `required_score`.
    ///
    /// # Errors
    ///
    /// Returns `NotFinished` until the quiz is over.
    pub fn passed(&self, required_score: u32) -> Result<bool, QuizSessionError> {
        let score = self.score()?;
        Ok(i64::from(score) >= i64::from(required_score))
    }

    /// Start over with the same questions.
    pub fn reset(&mut self) {
        self.current = 0;
        self.selected = None;
        self.correct = 0;
        self.finished = false;
    }

    /// Report the finished quiz to the store and credit the lesson's study time.
    ///
    /// # Errors
    ///
    /// Returns `NotFinished` if the quiz is still running; the store is left
    /// untouched in that case.
    pub fn finish_into(
        &self,
        store: &ProgressStore,
        realm_id: &RealmId,
        lesson_id: &LessonId,
    ) -> Result<i32, QuizSessionError> {
        let score = self.score()?;
        debug!(realm = %realm_id, lesson = %lesson_id, score, "reporting quiz result");
        store.complete_quiz(realm_id, lesson_id, score);
        store.add_time_spent(LESSON_MINUTES);
        Ok(score)
    }
}
