use crate::model::ids::{LessonId, TheoryBlockId};
use crate::model::quiz::QuizQuestion;

/// Default pass mark for lessons that do not specify one.
pub const DEFAULT_REQUIRED_SCORE: u32 = 80;

//
// ─── THEORY BLOCKS ─────────────────────────────────────────────────────────────
//

/// Presentation kind of a theory block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlockKind {
    #[default]
    Text,
    Video,
    Interactive,
}

impl BlockKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Video => "video",
            BlockKind::Interactive => "interactive",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(BlockKind::Text),
            "video" => Some(BlockKind::Video),
            "interactive" => Some(BlockKind::Interactive),
            _ => None,
        }
    }
}

/// One page of instructional content within a lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TheoryBlock {
    id: TheoryBlockId,
    title: String,
    content: String,
    kind: BlockKind,
    video_url: Option<String>,
    completed: bool,
}

impl TheoryBlock {
    /// Creates an incomplete text block.
    #[must_use]
    pub fn text(id: TheoryBlockId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            kind: BlockKind::Text,
            video_url: None,
            completed: false,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: BlockKind, video_url: Option<String>) -> Self {
        self.kind = kind;
        self.video_url = video_url;
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn id(&self) -> &TheoryBlockId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A unit of study: theory blocks followed by a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    description: String,
    completed: bool,
    theory_blocks: Vec<TheoryBlock>,
    quiz: Vec<QuizQuestion>,
    required_score: u32,
    order: u32,
}

impl Lesson {
    /// Creates an incomplete lesson with no content yet.
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        description: impl Into<String>,
        order: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed: false,
            theory_blocks: Vec::new(),
            quiz: Vec::new(),
            required_score: DEFAULT_REQUIRED_SCORE,
            order,
        }
    }

    #[must_use]
    pub fn with_theory_blocks(mut self, blocks: Vec<TheoryBlock>) -> Self {
        self.theory_blocks = blocks;
        self
    }

    #[must_use]
    pub fn with_quiz(mut self, quiz: Vec<QuizQuestion>) -> Self {
        self.quiz = quiz;
        self
    }

    #[must_use]
    pub fn with_required_score(mut self, required_score: u32) -> Self {
        self.required_score = required_score;
        self
    }

    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns a copy where the named block is marked complete.
    ///
    /// Unknown block ids leave the lesson unchanged.
    #[must_use]
    pub fn with_block_completed(&self, block_id: &TheoryBlockId) -> Self {
        let mut next = self.clone();
        for block in &mut next.theory_blocks {
            if block.id() == block_id {
                block.completed = true;
            }
        }
        next
    }

    /// Returns the catalog-fresh shape: lesson and every block incomplete.
    #[must_use]
    pub fn reset(&self) -> Self {
        let mut next = self.clone().with_completed(false);
        for block in &mut next.theory_blocks {
            block.completed = false;
        }
        next
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
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
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn theory_blocks(&self) -> &[TheoryBlock] {
        &self.theory_blocks
    }

    #[must_use]
    pub fn theory_block(&self, id: &TheoryBlockId) -> Option<&TheoryBlock> {
        self.theory_blocks.iter().find(|block| block.id() == id)
    }

    #[must_use]
    pub fn quiz(&self) -> &[QuizQuestion] {
        &self.quiz
    }

    #[must_use]
    pub fn required_score(&self) -> u32 {
        self.required_score
    }

    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// True once every theory block has been worked through.
    ///
    /// A lesson without theory blocks is trivially read.
    #[must_use]
    pub fn theory_complete(&self) -> bool {
        self.theory_blocks.iter().all(TheoryBlock::completed)
    }
}
