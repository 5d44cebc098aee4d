//! goask-core: entity types for the goask question-and-answer platform.
//!
//! This crate provides:
//! - String-backed identifier newtypes for users, questions and answers
//! - The stored records (`User`, `Question`, `Answer`, `Vote`)
//! - Creation and update inputs (`NewQuestion`, `QuestionUpdate`)
//! - Tag and question collections (`TagSet`, `QuestionSet`)
//!
//! Everything here is plain data. Enforcement of the relations between
//! these records lives in `goask-store`.

pub mod ids;
pub mod types;

pub use ids::{AnswerId, QuestionId, UserId};
pub use types::*;
