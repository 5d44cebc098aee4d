//! The vote ledger.
//!
//! Holds at most one vote per (user, question). A new vote either creates
//! the entry, flips its direction, or is rejected as a duplicate when the
//! direction is unchanged. Entries only disappear together with their
//! question.

use std::collections::HashMap;

use goask_core::{QuestionId, UserId, Vote, VoteCount, VoteType};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct VoteLedger {
    votes: HashMap<QuestionId, HashMap<UserId, VoteType>>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `vote_type` from `user` on `question`.
    ///
    /// Callers validate that both exist beforehand; the ledger only
    /// enforces the per-pair state machine.
    pub fn cast(
        &mut self,
        user: &UserId,
        question: &QuestionId,
        vote_type: VoteType,
    ) -> StoreResult<Vote> {
        if self.vote_of(user, question) == Some(vote_type) {
            return Err(StoreError::DuplicateVote {
                user: user.clone(),
                vote_type,
                question: question.clone(),
            });
        }
        self.votes
            .entry(question.clone())
            .or_default()
            .insert(user.clone(), vote_type);

        Ok(Vote {
            user_id: user.clone(),
            question_id: question.clone(),
            vote_type,
        })
    }

    /// The live vote of `user` on `question`, if any.
    pub fn vote_of(&self, user: &UserId, question: &QuestionId) -> Option<VoteType> {
        self.votes.get(question)?.get(user).copied()
    }

    pub fn count(&self, question: &QuestionId) -> VoteCount {
        let mut count = VoteCount::default();
        if let Some(ballots) = self.votes.get(question) {
            for vote_type in ballots.values() {
                count.record(*vote_type);
            }
        }
        count
    }

    /// Drop every vote on `question`. Returns how many were removed.
    pub fn remove_question(&mut self, question: &QuestionId) -> usize {
        self.votes.remove(question).map_or(0, |ballots| ballots.len())
    }

    /// Question ids that hold at least one ledger entry.
    pub(crate) fn voted_questions(&self) -> impl Iterator<Item = &QuestionId> {
        self.votes.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_vote_then_flip() {
        let mut ledger = VoteLedger::new();
        let (u, q) = (UserId::from("1"), QuestionId::from("1"));

        let vote = ledger.cast(&u, &q, VoteType::Up).unwrap();
        assert_eq!(vote.vote_type, VoteType::Up);
        assert_eq!(ledger.count(&q), VoteCount { up: 1, down: 0 });

        ledger.cast(&u, &q, VoteType::Down).unwrap();
        assert_eq!(ledger.count(&q), VoteCount { up: 0, down: 1 });
        assert_eq!(ledger.vote_of(&u, &q), Some(VoteType::Down));
    }

    #[test]
    fn duplicate_is_rejected_and_leaves_state() {
        let mut ledger = VoteLedger::new();
        let (u, q) = (UserId::from("2"), QuestionId::from("7"));

        ledger.cast(&u, &q, VoteType::Down).unwrap();
        let err = ledger.cast(&u, &q, VoteType::Down).unwrap_err();
        assert_eq!(err.to_string(), "user:2 has voted DOWN for question:7");
        assert_eq!(ledger.count(&q), VoteCount { up: 0, down: 1 });
    }

    #[test]
    fn votes_are_per_user() {
        let mut ledger = VoteLedger::new();
        let q = QuestionId::from("1");
        ledger.cast(&UserId::from("1"), &q, VoteType::Up).unwrap();
        ledger.cast(&UserId::from("2"), &q, VoteType::Up).unwrap();
        ledger.cast(&UserId::from("3"), &q, VoteType::Down).unwrap();
        assert_eq!(ledger.count(&q), VoteCount { up: 2, down: 1 });
    }

    #[test]
    fn remove_question_clears_its_votes_only() {
        let mut ledger = VoteLedger::new();
        let u = UserId::from("1");
        let (q1, q2) = (QuestionId::from("1"), QuestionId::from("2"));
        ledger.cast(&u, &q1, VoteType::Up).unwrap();
        ledger.cast(&u, &q2, VoteType::Up).unwrap();

        assert_eq!(ledger.remove_question(&q1), 1);
        assert_eq!(ledger.count(&q1), VoteCount::default());
        assert_eq!(ledger.count(&q2), VoteCount { up: 1, down: 0 });
        assert_eq!(ledger.remove_question(&q1), 0);
    }
}
