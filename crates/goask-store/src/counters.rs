//! Per-author aggregate counters.
//!
//! Counts are adjusted in the same critical section as the mutation that
//! changes them, cascades included. `Dataset::check` recomputes them by
//! scanning to prove they never drift.

use std::collections::HashMap;

use goask_core::UserId;
use serde::Serialize;

/// Live counts of what a user has authored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AuthorStats {
    pub questions: usize,
    pub answers: usize,
}

#[derive(Debug, Default)]
pub struct AuthorCounters {
    by_user: HashMap<UserId, AuthorStats>,
}

impl AuthorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, user: &UserId) -> AuthorStats {
        self.by_user.get(user).copied().unwrap_or_default()
    }

    pub fn question_added(&mut self, author: &UserId) {
        self.by_user.entry(author.clone()).or_default().questions += 1;
    }

    pub fn question_removed(&mut self, author: &UserId) {
        if let Some(stats) = self.by_user.get_mut(author) {
            stats.questions = stats.questions.saturating_sub(1);
        }
    }

    pub fn answers_added(&mut self, author: &UserId, n: usize) {
        self.by_user.entry(author.clone()).or_default().answers += n;
    }

    pub fn answers_removed(&mut self, author: &UserId, n: usize) {
        if let Some(stats) = self.by_user.get_mut(author) {
            stats.answers = stats.answers.saturating_sub(n);
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&UserId, &AuthorStats)> {
        self.by_user.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_has_zero_stats() {
        let counters = AuthorCounters::new();
        assert_eq!(counters.stats(&UserId::from("1")), AuthorStats::default());
    }

    #[test]
    fn add_and_remove() {
        let mut counters = AuthorCounters::new();
        let u = UserId::from("1");
        counters.question_added(&u);
        counters.question_added(&u);
        counters.answers_added(&u, 3);
        counters.question_removed(&u);
        counters.answers_removed(&u, 2);

        assert_eq!(
            counters.stats(&u),
            AuthorStats {
                questions: 1,
                answers: 1
            }
        );
    }
}
