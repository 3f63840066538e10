//! Shared error types for the services crate.

use thiserror::Error;

use realms_core::CatalogError;
use realms_core::model::{LessonId, RealmId, TheoryBlockId};
use storage::sqlite::SqliteInitError;

/// Errors from `StoreHandle` access.
///
/// These are programming errors (using the store outside its lifetime), not
/// runtime conditions; store mutations themselves never fail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    #[error("progress store accessed before initialization")]
    NotInitialized,
    #[error("progress store is already initialized")]
    AlreadyInitialized,
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("this quiz has no questions")]
    NoQuestions,
    #[error("option {index} is out of range for {options} options")]
    OptionOutOfRange { index: usize, options: usize },
    #[error("the current question was already answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("quiz already finished")]
    Finished,
    #[error("quiz is not finished yet")]
    NotFinished,
}

/// Errors emitted by `LessonFlow`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonFlowError {
    #[error("unknown realm: {0}")]
    UnknownRealm(RealmId),
    #[error("unknown lesson {lesson} in realm {realm}")]
    UnknownLesson { realm: RealmId, lesson: LessonId },
    #[error("unknown theory block: {0}")]
    UnknownBlock(TheoryBlockId),
    #[error("theory blocks are not finished yet")]
    TheoryIncomplete,
    #[error("no theory block is open")]
    NoOpenBlock,
    #[error(transparent)]
    Quiz(#[from] QuizSessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
