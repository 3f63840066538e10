use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizQuestionError {
    #[error("question text cannot be empty")]
    EmptyQuestion,

    #[error("a question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("correct answer index {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
///
/// Questions only ever come from the catalog; they are never persisted, so a
/// content edit under the same lesson id always shows through after a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    id: QuestionId,
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    explanation: String,
}

impl QuizQuestion {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuizQuestionError` if the text is blank, fewer than two options
    /// are given, or `correct_answer` does not index into `options`.
    pub fn new(
        id: QuestionId,
        question: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuizQuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuizQuestionError::EmptyQuestion);
        }
        if options.len() < 2 {
            return Err(QuizQuestionError::TooFewOptions(options.len()));
        }
        if correct_answer >= options.len() {
            return Err(QuizQuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            id,
            question,
            options,
            correct_answer,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }
}
