//! Identifier generation.
//!
//! Each entity kind draws from its own monotonically increasing counter.
//! Values are handed out with a single atomic `fetch_add`, so concurrent
//! creators never observe the same id, and an id is never handed out
//! twice even after the record it named is deleted.

use std::sync::atomic::{AtomicU64, Ordering};

use goask_core::{AnswerId, QuestionId, UserId};

/// A monotonically increasing counter starting at 1.
#[derive(Debug, Default)]
pub struct Sequence(AtomicU64);

impl Sequence {
    pub const fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Returns the next value.
    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// One sequence per entity kind.
#[derive(Debug, Default)]
pub struct IdGenerator {
    users: Sequence,
    questions: Sequence,
    answers: Sequence,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_user_id(&self) -> UserId {
        UserId::from_sequence(self.users.next())
    }

    pub fn next_question_id(&self) -> QuestionId {
        QuestionId::from_sequence(self.questions.next())
    }

    pub fn next_answer_id(&self) -> AnswerId {
        AnswerId::from_sequence(self.answers.next())
    }
}
