//! Shared helpers for goask-store integration tests.

#![allow(dead_code)]

use goask_store::goask_core::{NewQuestion, Question, User};
use goask_store::{Dao, MemoryStore};

/// Route store logs to the test harness so they show up for failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A fresh, empty store.
pub fn new_store() -> MemoryStore {
    init_tracing();
    MemoryStore::new()
}

/// Creates one user with three untagged questions.
pub fn one_user_three_questions<D: Dao>(dao: &D) -> (User, Vec<Question>) {
    let user = dao.create_user("Test User").unwrap();
    let questions = (0..3)
        .map(|_| {
            dao.create_question(NewQuestion::by(user.id.clone()), &[])
                .unwrap()
        })
        .collect();
    (user, questions)
}
