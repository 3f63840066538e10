use realms_core::model::{Lesson, LessonId, RealmId, TheoryBlock, TheoryBlockId};
use tracing::debug;

use crate::error::LessonFlowError;
use crate::progress_store::ProgressStore;
use crate::quiz_session::QuizSession;

/// Walks a lesson's theory blocks in catalog order, then hands off to the quiz.
///
/// The flow keeps a local copy of the lesson so the open block stays stable
/// while the store is updated underneath it.
#[derive(Debug, Clone)]
pub struct LessonFlow {
    realm_id: RealmId,
    lesson: Lesson,
    open: Option<usize>,
}

impl LessonFlow {
    /// Open a lesson at its first unread theory block.
    ///
    /// # Errors
    ///
    /// Returns `UnknownRealm` or `UnknownLesson` if the ids are not in the store.
    pub fn start(
        store: &ProgressStore,
        realm_id: &RealmId,
        lesson_id: &LessonId,
    ) -> Result<Self, LessonFlowError> {
        let realm = store
            .realm(realm_id)
            .ok_or_else(|| LessonFlowError::UnknownRealm(realm_id.clone()))?;
        let lesson = realm
            .lesson(lesson_id)
            .cloned()
            .ok_or_else(|| LessonFlowError::UnknownLesson {
                realm: realm_id.clone(),
                lesson: lesson_id.clone(),
            })?;
        let open = lesson.theory_blocks().iter().position(|b| !b.completed());

        Ok(Self {
            realm_id: realm_id.clone(),
            lesson,
            open,
        })
    }

    #[must_use]
    pub fn realm_id(&self) -> &RealmId {
        &self.realm_id
    }

    #[must_use]
    pub fn lesson(&self) -> &Lesson {
        &self.lesson
    }

    #[must_use]
    pub fn current_block(&self) -> Option<&TheoryBlock> {
        self.open.and_then(|i| self.lesson.theory_blocks().get(i))
    }

    /// Jump to a specific block, read or not.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBlock` if the lesson has no such block.
    pub fn open_block(&mut self, block_id: &TheoryBlockId) -> Result<&TheoryBlock, LessonFlowError> {
        let index = self
            .lesson
            .theory_blocks()
            .iter()
            .position(|b| b.id() == block_id)
            .ok_or_else(|| LessonFlowError::UnknownBlock(block_id.clone()))?;
        self.open = Some(index);
        Ok(&self.lesson.theory_blocks()[index])
    }

    /// Mark the open block as read and move to the block after it.
    ///
    /// Returns the newly opened block, or `None` after the last one.
    ///
    /// # Errors
    ///
    /// Returns `NoOpenBlock` when there is nothing open.
    pub fn complete_current(
        &mut self,
        store: &ProgressStore,
    ) -> Result<Option<&TheoryBlock>, LessonFlowError> {
        let index = self.open.ok_or(LessonFlowError::NoOpenBlock)?;
        let block_id = self.lesson.theory_blocks()[index].id().clone();

        store.complete_theory_block(&self.realm_id, self.lesson.id(), &block_id);
        self.lesson = self.lesson.with_block_completed(&block_id);
        debug!(lesson = %self.lesson.id(), block = %block_id, "theory block finished");

        let next = index + 1;
        self.open = (next < self.lesson.theory_blocks().len()).then_some(next);
        Ok(self.current_block())
    }

    /// True once every block is read, or immediately for a lesson without theory.
    #[must_use]
    pub fn can_start_quiz(&self) -> bool {
        self.lesson.theory_complete()
    }

    /// # Errors
    ///
    /// Returns `TheoryIncomplete` while blocks are unread, or the quiz's own
    /// error if the lesson has no questions.
    pub fn start_quiz(&self) -> Result<QuizSession, LessonFlowError> {
        if !self.can_start_quiz() {
            return Err(LessonFlowError::TheoryIncomplete);
        }
        Ok(QuizSession::for_lesson(&self.lesson)?)
    }
}
