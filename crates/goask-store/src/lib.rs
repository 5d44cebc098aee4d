//! goask-store: data-access layer for the goask question-and-answer platform.
//!
//! This crate provides:
//! - The `UserDao`, `QuestionDao`, `AnswerDao` and `TagDao` traits
//! - `MemoryStore`, an in-process implementation of all four
//! - Referential integrity between users, questions and answers
//! - Cascading deletion of a question's answers, votes and tag memberships
//! - A vote ledger allowing one vote per user and question
//! - Per-author question and answer counts kept in step with every change
//!
//! # Usage
//!
//! ```rust
//! use goask_store::{MemoryStore, QuestionDao, UserDao};
//! use goask_store::goask_core::{NewQuestion, Tag};
//!
//! let store = MemoryStore::new();
//! let user = store.create_user("alice")?;
//! let question = store.create_question(NewQuestion::by(user.id.clone()), &[Tag::from("Rust")])?;
//!
//! assert_eq!(store.question_count(&user.id)?, 1);
//! store.delete_question(&user.id, &question.id)?;
//! assert_eq!(store.question_count(&user.id)?, 0);
//! # Ok::<(), goask_store::StoreError>(())
//! ```

pub mod counters;
pub mod dao;
mod dataset;
pub mod error;
pub mod sequence;
pub mod store;
pub mod tags;
pub mod votes;

pub use counters::AuthorStats;
pub use dao::{AnswerDao, Dao, QuestionDao, TagDao, UserDao};
pub use error::{Action, ErrorKind, StoreError, StoreResult, Target};
pub use store::{AcceptPolicy, MemoryStore, StoreConfig};

// Re-export goask-core for downstream crates
pub use goask_core;
