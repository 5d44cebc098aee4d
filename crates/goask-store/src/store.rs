//! Main store implementation.
//!
//! `MemoryStore` keeps every table behind one `RwLock`. Each operation
//! takes the guard once, validates all referenced records, and only then
//! mutates, so a failing call changes nothing and a cascade is never
//! half-visible to a concurrent reader.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use goask_core::{
    Answer, AnswerId, NewQuestion, Question, QuestionId, QuestionSet, QuestionUpdate, Tag, TagSet,
    User, UserId, Vote, VoteCount, VoteType,
};
use serde::{Deserialize, Serialize};

use crate::counters::AuthorStats;
use crate::dao::{AnswerDao, QuestionDao, TagDao, UserDao};
use crate::dataset::Dataset;
use crate::error::{Action, StoreError, StoreResult, Target};
use crate::sequence::IdGenerator;

/// What happens to the other answers of a question when one is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceptPolicy {
    /// Any number of answers may be accepted at once.
    #[default]
    Multiple,
    /// Accepting an answer un-accepts its siblings.
    Exclusive,
}

impl std::str::FromStr for AcceptPolicy {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple" => Ok(Self::Multiple),
            "exclusive" => Ok(Self::Exclusive),
            other => Err(StoreError::ConfigError(format!(
                "unknown accept policy '{other}', expected 'multiple' or 'exclusive'"
            ))),
        }
    }
}

/// Configuration for the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Accepted-answer policy.
    pub accept_policy: AcceptPolicy,
}

impl StoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `GOASK_ACCEPT_POLICY` - Optional, `multiple` (default) or `exclusive`
    pub fn from_env() -> StoreResult<Self> {
        let accept_policy = match std::env::var("GOASK_ACCEPT_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => AcceptPolicy::default(),
        };

        Ok(Self { accept_policy })
    }
}

/// In-memory store for the goask platform.
///
/// Cloning is cheap; clones share the same records.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<Dataset>>,
    ids: Arc<IdGenerator>,
    config: StoreConfig,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with the default configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create an empty store with the given configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        tracing::info!("Creating in-memory store (accept policy: {:?})", config.accept_policy);

        Self {
            data: Arc::new(RwLock::new(Dataset::default())),
            ids: Arc::new(IdGenerator::new()),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Both aggregate counts of a user in one read.
    pub fn author_stats(&self, user_id: &UserId) -> StoreResult<AuthorStats> {
        self.read()?.stats(user_id)
    }

    /// Recompute all derived state and compare it with what is maintained
    /// incrementally. Returns `Inconsistent` on the first divergence.
    pub fn check_invariants(&self) -> StoreResult<()> {
        self.read()?.check()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Dataset>> {
        self.data.read().map_err(|_| {
            tracing::warn!("Store lock poisoned on read");
            StoreError::LockPoisoned
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Dataset>> {
        self.data.write().map_err(|_| {
            tracing::warn!("Store lock poisoned on write");
            StoreError::LockPoisoned
        })
    }
}

// ==================== User Operations ====================

impl UserDao for MemoryStore {
    fn create_user(&self, name: &str) -> StoreResult<User> {
        let mut data = self.write()?;

        let user = User {
            id: self.ids.next_user_id(),
            name: name.to_string(),
        };
        data.insert_user(user.clone());

        tracing::debug!("Created user {}", user.id);
        Ok(user)
    }

    fn user_by_id(&self, id: &UserId) -> StoreResult<User> {
        self.read()?.user(id).cloned()
    }

    fn users(&self) -> StoreResult<Vec<User>> {
        Ok(self.read()?.users.values().cloned().collect())
    }

    fn question_count(&self, id: &UserId) -> StoreResult<usize> {
        Ok(self.author_stats(id)?.questions)
    }

    fn answer_count(&self, id: &UserId) -> StoreResult<usize> {
        Ok(self.author_stats(id)?.answers)
    }

    fn questions_by_user(&self, id: &UserId) -> StoreResult<Vec<Question>> {
        let data = self.read()?;
        data.user(id)?;

        Ok(data
            .questions
            .values()
            .filter(|q| &q.author_id == id)
            .cloned()
            .collect())
    }
}

// ==================== Question Operations ====================

impl QuestionDao for MemoryStore {
    fn list_questions(&self, search: Option<&str>) -> StoreResult<Vec<Question>> {
        let data = self.read()?;
        let needle = search.map(str::to_lowercase);

        Ok(data
            .questions
            .values()
            .filter(|q| match &needle {
                Some(needle) => {
                    q.title.to_lowercase().contains(needle.as_str())
                        || q.content.to_lowercase().contains(needle.as_str())
                }
                None => true,
            })
            .cloned()
            .collect())
    }

    fn question_by_id(&self, id: &QuestionId) -> StoreResult<Question> {
        self.read()?.question(id).cloned()
    }

    fn create_question(&self, question: NewQuestion, tags: &[Tag]) -> StoreResult<Question> {
        let mut data = self.write()?;

        // Verify author exists
        data.user(&question.author_id)?;

        let question = Question {
            id: self.ids.next_question_id(),
            author_id: question.author_id,
            title: question.title,
            content: question.content,
        };
        let tags: TagSet = tags.iter().cloned().collect();
        let tag_count = tags.len();
        data.insert_question(question.clone(), tags);

        tracing::debug!(
            "Created question {} by user {} with {} tags",
            question.id,
            question.author_id,
            tag_count
        );
        Ok(question)
    }

    fn update_question(&self, update: QuestionUpdate) -> StoreResult<Question> {
        let mut data = self.write()?;

        let mut question = data.question(&update.id)?.clone();
        if let Some(title) = update.title {
            question.title = title;
        }
        if let Some(content) = update.content {
            question.content = content;
        }
        if let Some(tags) = update.tags {
            data.tags.replace(&question.id, tags.into_iter().collect());
        }
        data.questions.insert(question.id.clone(), question.clone());

        tracing::debug!("Updated question {}", question.id);
        Ok(question)
    }

    fn delete_question(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
    ) -> StoreResult<Question> {
        let mut data = self.write()?;

        data.user(user_id)?;
        let question = data.question(question_id)?;
        if &question.author_id != user_id {
            return Err(StoreError::unauthorized(
                user_id,
                Action::Delete,
                Target::Question(question_id.clone()),
            ));
        }

        let removed = data
            .remove_question(question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.clone()))?;

        tracing::debug!(
            "Deleted question {} with {} answers, {} votes, {} tags",
            question_id,
            removed.answers.len(),
            removed.votes,
            removed.tags.len()
        );
        Ok(removed.question)
    }

    fn answers(&self, question_id: &QuestionId) -> StoreResult<Vec<Answer>> {
        Ok(self.read()?.answers_of(question_id))
    }

    fn tags(&self, question_id: &QuestionId) -> StoreResult<TagSet> {
        let data = self.read()?;
        data.question(question_id)?;
        Ok(data.tags.tags_of(question_id))
    }

    fn vote_question(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
        vote_type: VoteType,
    ) -> StoreResult<Vote> {
        let mut data = self.write()?;

        data.user(user_id)?;
        data.question(question_id)?;
        let vote = data.votes.cast(user_id, question_id, vote_type)?;

        tracing::debug!("User {} voted {} on question {}", user_id, vote_type, question_id);
        Ok(vote)
    }

    fn vote_count(&self, question_id: &QuestionId) -> StoreResult<VoteCount> {
        let data = self.read()?;
        data.question(question_id)?;
        Ok(data.votes.count(question_id))
    }
}

// ==================== Answer Operations ====================

impl AnswerDao for MemoryStore {
    fn create_answer(
        &self,
        question_id: &QuestionId,
        content: &str,
        author_id: &UserId,
    ) -> StoreResult<Answer> {
        let mut data = self.write()?;

        data.question(question_id)?;
        data.user(author_id)?;

        let answer = Answer {
            id: self.ids.next_answer_id(),
            question_id: question_id.clone(),
            author_id: author_id.clone(),
            content: content.to_string(),
            accepted: false,
        };
        data.insert_answer(answer.clone());

        tracing::debug!(
            "Created answer {} to question {} by user {}",
            answer.id,
            question_id,
            author_id
        );
        Ok(answer)
    }

    fn answer_by_id(&self, id: &AnswerId) -> StoreResult<Answer> {
        self.read()?.answer(id).cloned()
    }

    fn accept_answer(&self, answer_id: &AnswerId, user_id: &UserId) -> StoreResult<Answer> {
        let mut data = self.write()?;

        let question_id = data.answer(answer_id)?.question_id.clone();
        let question = data.question(&question_id)?;
        if &question.author_id != user_id {
            return Err(StoreError::unauthorized(
                user_id,
                Action::AcceptAnswer,
                Target::Question(question_id),
            ));
        }

        if self.config.accept_policy == AcceptPolicy::Exclusive {
            let siblings: Vec<AnswerId> = data
                .answer_ids_of(&question_id)
                .filter(|id| *id != answer_id)
                .cloned()
                .collect();
            for sibling in siblings {
                if let Some(answer) = data.answers.get_mut(&sibling) {
                    answer.accepted = false;
                }
            }
        }

        let answer = data
            .answers
            .get_mut(answer_id)
            .ok_or_else(|| StoreError::AnswerNotFound(answer_id.clone()))?;
        answer.accepted = true;
        let accepted = answer.clone();

        tracing::debug!("User {} accepted answer {}", user_id, answer_id);
        Ok(accepted)
    }

    fn delete_answer(&self, answer_id: &AnswerId, user_id: &UserId) -> StoreResult<Answer> {
        let mut data = self.write()?;

        let answer = data.answer(answer_id)?;
        if &answer.author_id != user_id {
            return Err(StoreError::unauthorized(
                user_id,
                Action::Delete,
                Target::Answer(answer_id.clone()),
            ));
        }

        let removed = data
            .remove_answer(answer_id)
            .ok_or_else(|| StoreError::AnswerNotFound(answer_id.clone()))?;

        tracing::debug!("Deleted answer {} of question {}", answer_id, removed.question_id);
        Ok(removed)
    }
}

// ==================== Tag Operations ====================

impl TagDao for MemoryStore {
    fn questions(&self, tag: &Tag) -> StoreResult<QuestionSet> {
        let data = self.read()?;

        Ok(data
            .tags
            .question_ids(tag)
            .filter_map(|id| data.questions.get(id))
            .cloned()
            .collect())
    }

    fn all_tags(&self) -> StoreResult<TagSet> {
        Ok(self.read()?.tags.all_tags())
    }
}
