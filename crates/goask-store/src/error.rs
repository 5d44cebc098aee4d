//! Error types for the data-access layer.

use std::fmt;

use goask_core::{AnswerId, QuestionId, UserId, VoteType};
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A mutation a user may or may not be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    AcceptAnswer,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete => f.write_str("delete"),
            Self::AcceptAnswer => f.write_str("accept answers to"),
        }
    }
}

/// The record an [`Action`] was aimed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Question(QuestionId),
    Answer(AnswerId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question(id) => write!(f, "question:{id}"),
            Self::Answer(id) => write!(f, "answer:{id}"),
        }
    }
}

/// Coarse classification used by callers to pick a protocol response
/// (e.g. 404 / 403 / 409 / 500 over HTTP).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    Conflict,
    Internal,
}

/// Errors that can occur during store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// User not found.
    #[error("user:'{0}' not found")]
    UserNotFound(UserId),

    /// Question not found.
    #[error("question:{0} not found")]
    QuestionNotFound(QuestionId),

    /// Answer not found.
    #[error("answer:{0} not found")]
    AnswerNotFound(AnswerId),

    /// The actor does not own the record it tried to change.
    #[error("user:{actor} is not authorized to {action} {target}")]
    Unauthorized {
        actor: UserId,
        action: Action,
        target: Target,
    },

    /// The user already holds a vote of this type on the question.
    #[error("user:{user} has voted {vote_type} for question:{question}")]
    DuplicateVote {
        user: UserId,
        vote_type: VoteType,
        question: QuestionId,
    },

    /// A writer panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Derived state disagrees with the primary records.
    #[error("store invariant violated: {0}")]
    Inconsistent(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Classify this error for the caller.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UserNotFound(_) | Self::QuestionNotFound(_) | Self::AnswerNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::DuplicateVote { .. } => ErrorKind::Conflict,
            Self::LockPoisoned | Self::Inconsistent(_) | Self::ConfigError(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    pub(crate) fn unauthorized(actor: &UserId, action: Action, target: Target) -> Self {
        Self::Unauthorized {
            actor: actor.clone(),
            action,
            target,
        }
    }
}
