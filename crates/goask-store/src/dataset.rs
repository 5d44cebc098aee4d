//! The records guarded by the store lock.
//!
//! `Dataset` owns every table plus the secondary structures derived from
//! them (answer-by-question index, tag index, vote ledger, author
//! counters). Its methods are the primitive mutations; the caller holds
//! the write guard and has already done all validation, so no method here
//! can fail halfway through.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use goask_core::{Answer, AnswerId, Question, QuestionId, TagSet, User, UserId};

use crate::counters::{AuthorCounters, AuthorStats};
use crate::error::{StoreError, StoreResult};
use crate::tags::TagIndex;
use crate::votes::VoteLedger;

/// Everything a question deletion took with it.
#[derive(Debug)]
pub(crate) struct RemovedQuestion {
    pub question: Question,
    pub answers: Vec<Answer>,
    pub votes: usize,
    pub tags: TagSet,
}

#[derive(Debug, Default)]
pub(crate) struct Dataset {
    pub users: BTreeMap<UserId, User>,
    pub questions: BTreeMap<QuestionId, Question>,
    pub answers: BTreeMap<AnswerId, Answer>,
    answers_by_question: HashMap<QuestionId, BTreeSet<AnswerId>>,
    pub tags: TagIndex,
    pub votes: VoteLedger,
    pub counters: AuthorCounters,
}

impl Dataset {
    // ==================== Lookups ====================

    pub fn user(&self, id: &UserId) -> StoreResult<&User> {
        self.users
            .get(id)
            .ok_or_else(|| StoreError::UserNotFound(id.clone()))
    }

    pub fn question(&self, id: &QuestionId) -> StoreResult<&Question> {
        self.questions
            .get(id)
            .ok_or_else(|| StoreError::QuestionNotFound(id.clone()))
    }

    pub fn answer(&self, id: &AnswerId) -> StoreResult<&Answer> {
        self.answers
            .get(id)
            .ok_or_else(|| StoreError::AnswerNotFound(id.clone()))
    }

    pub fn stats(&self, user: &UserId) -> StoreResult<AuthorStats> {
        self.user(user)?;
        Ok(self.counters.stats(user))
    }

    /// Answer ids of a question in creation order.
    pub fn answer_ids_of<'a>(
        &'a self,
        question: &QuestionId,
    ) -> impl Iterator<Item = &'a AnswerId> + 'a {
        self.answers_by_question.get(question).into_iter().flatten()
    }

    pub fn answers_of(&self, question: &QuestionId) -> Vec<Answer> {
        self.answer_ids_of(question)
            .filter_map(|id| self.answers.get(id))
            .cloned()
            .collect()
    }

    // ==================== Mutations ====================

    pub fn insert_user(&mut self, user: User) {
        self.users.insert(user.id.clone(), user);
    }

    pub fn insert_question(&mut self, question: Question, tags: TagSet) {
        self.counters.question_added(&question.author_id);
        self.tags.replace(&question.id, tags);
        self.questions.insert(question.id.clone(), question);
    }

    pub fn insert_answer(&mut self, answer: Answer) {
        self.counters.answers_added(&answer.author_id, 1);
        self.answers_by_question
            .entry(answer.question_id.clone())
            .or_default()
            .insert(answer.id.clone());
        self.answers.insert(answer.id.clone(), answer);
    }

    pub fn remove_answer(&mut self, id: &AnswerId) -> Option<Answer> {
        let answer = self.answers.remove(id)?;
        if let Some(ids) = self.answers_by_question.get_mut(&answer.question_id) {
            ids.remove(id);
            if ids.is_empty() {
                self.answers_by_question.remove(&answer.question_id);
            }
        }
        self.counters.answers_removed(&answer.author_id, 1);
        Some(answer)
    }

    /// Remove a question together with its answers, votes and tag
    /// memberships.
    pub fn remove_question(&mut self, id: &QuestionId) -> Option<RemovedQuestion> {
        let question = self.questions.remove(id)?;
        self.counters.question_removed(&question.author_id);

        let answer_ids = self.answers_by_question.remove(id).unwrap_or_default();
        let mut answers = Vec::with_capacity(answer_ids.len());
        for answer_id in answer_ids {
            if let Some(answer) = self.answers.remove(&answer_id) {
                self.counters.answers_removed(&answer.author_id, 1);
                answers.push(answer);
            }
        }

        let votes = self.votes.remove_question(id);
        let tags = self.tags.remove_question(id);

        Some(RemovedQuestion {
            question,
            answers,
            votes,
            tags,
        })
    }

    // ==================== Integrity ====================

    /// Recompute every derived structure from the primary tables and
    /// compare.
    pub fn check(&self) -> StoreResult<()> {
        self.check_references().map_err(StoreError::Inconsistent)?;
        self.tags.check().map_err(StoreError::Inconsistent)?;
        self.check_counters().map_err(StoreError::Inconsistent)
    }

    fn check_references(&self) -> Result<(), String> {
        for question in self.questions.values() {
            if !self.users.contains_key(&question.author_id) {
                return Err(format!(
                    "question:{} has unknown author {}",
                    question.id, question.author_id
                ));
            }
        }

        for answer in self.answers.values() {
            if !self.questions.contains_key(&answer.question_id) {
                return Err(format!(
                    "answer:{} outlived question:{}",
                    answer.id, answer.question_id
                ));
            }
            if !self.users.contains_key(&answer.author_id) {
                return Err(format!(
                    "answer:{} has unknown author {}",
                    answer.id, answer.author_id
                ));
            }
            let indexed = self
                .answers_by_question
                .get(&answer.question_id)
                .is_some_and(|ids| ids.contains(&answer.id));
            if !indexed {
                return Err(format!("answer:{} missing from its question index", answer.id));
            }
        }

        for (question, ids) in &self.answers_by_question {
            if ids.is_empty() {
                return Err(format!("question:{question} has an empty answer index"));
            }
            for id in ids {
                let matches = self
                    .answers
                    .get(id)
                    .is_some_and(|answer| &answer.question_id == question);
                if !matches {
                    return Err(format!("answer index of question:{question} lists {id}"));
                }
            }
        }

        if let Some(orphan) = self
            .tags
            .tagged_questions()
            .find(|id| !self.questions.contains_key(*id))
        {
            return Err(format!("tag index holds deleted question:{orphan}"));
        }

        if let Some(orphan) = self
            .votes
            .voted_questions()
            .find(|id| !self.questions.contains_key(*id))
        {
            return Err(format!("vote ledger holds deleted question:{orphan}"));
        }

        Ok(())
    }

    fn check_counters(&self) -> Result<(), String> {
        let mut scanned: HashMap<&UserId, AuthorStats> = HashMap::new();
        for question in self.questions.values() {
            scanned.entry(&question.author_id).or_default().questions += 1;
        }
        for answer in self.answers.values() {
            scanned.entry(&answer.author_id).or_default().answers += 1;
        }

        for (user, stats) in self.counters.iter() {
            let expected = scanned.get(user).copied().unwrap_or_default();
            if *stats != expected {
                return Err(format!(
                    "counters of user {user} are {stats:?}, live records give {expected:?}"
                ));
            }
        }
        for (user, expected) in &scanned {
            if self.counters.stats(user) != *expected {
                return Err(format!("user {user} has uncounted records"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goask_core::VoteType;

    fn seeded() -> Dataset {
        let mut data = Dataset::default();
        data.insert_user(User {
            id: UserId::from("1"),
            name: "user 1".to_string(),
        });
        data.insert_question(
            Question {
                id: QuestionId::from("1"),
                author_id: UserId::from("1"),
                title: String::new(),
                content: String::new(),
            },
            TagSet::from_tags(["Go"]),
        );
        data.insert_answer(Answer {
            id: AnswerId::from("1"),
            question_id: QuestionId::from("1"),
            author_id: UserId::from("1"),
            content: "answer 1".to_string(),
            accepted: false,
        });
        data
    }

    #[test]
    fn seeded_dataset_is_consistent() {
        let data = seeded();
        assert!(data.check().is_ok());
        assert_eq!(
            data.stats(&UserId::from("1")).unwrap(),
            AuthorStats {
                questions: 1,
                answers: 1
            }
        );
    }

    #[test]
    fn remove_question_cascades() {
        let mut data = seeded();
        let q = QuestionId::from("1");
        data.votes
            .cast(&UserId::from("1"), &q, VoteType::Up)
            .unwrap();

        let removed = data.remove_question(&q).unwrap();
        assert_eq!(removed.answers.len(), 1);
        assert_eq!(removed.votes, 1);
        assert_eq!(removed.tags, TagSet::from_tags(["Go"]));

        assert!(data.answers.is_empty());
        assert!(data.answers_of(&q).is_empty());
        assert_eq!(data.stats(&UserId::from("1")).unwrap(), AuthorStats::default());
        assert!(data.check().is_ok());
    }

    #[test]
    fn remove_answer_prunes_index() {
        let mut data = seeded();
        let removed = data.remove_answer(&AnswerId::from("1")).unwrap();
        assert_eq!(removed.content, "answer 1");
        assert_eq!(data.answer_ids_of(&QuestionId::from("1")).count(), 0);
        assert!(data.remove_answer(&AnswerId::from("1")).is_none());
        assert!(data.check().is_ok());
    }

    #[test]
    fn check_detects_counter_drift() {
        let mut data = seeded();
        data.counters.question_added(&UserId::from("1"));
        let err = data.check().unwrap_err();
        assert!(matches!(err, StoreError::Inconsistent(_)));
    }

    #[test]
    fn stats_of_unknown_user_fail() {
        let data = seeded();
        assert_eq!(
            data.stats(&UserId::from("9")).unwrap_err(),
            StoreError::UserNotFound(UserId::from("9"))
        );
    }
}
