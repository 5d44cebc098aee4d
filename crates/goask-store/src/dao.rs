//! Data-access traits consumed by the API layer.
//!
//! The four traits mirror the capability groups a handler needs: users,
//! questions (including votes, which are scoped to a question), answers and
//! tags. Every call is synchronous and atomic with respect to the others;
//! an `Err` means nothing was changed.

use goask_core::{
    Answer, AnswerId, NewQuestion, Question, QuestionId, QuestionSet, QuestionUpdate, Tag, TagSet,
    User, UserId, Vote, VoteCount, VoteType,
};

use crate::error::StoreResult;

pub trait UserDao {
    /// Register a user. Names need not be unique.
    fn create_user(&self, name: &str) -> StoreResult<User>;

    fn user_by_id(&self, id: &UserId) -> StoreResult<User>;

    /// All users in creation order.
    fn users(&self) -> StoreResult<Vec<User>>;

    /// Number of live questions authored by `id`.
    fn question_count(&self, id: &UserId) -> StoreResult<usize>;

    /// Number of live answers authored by `id`, after any cascades.
    fn answer_count(&self, id: &UserId) -> StoreResult<usize>;

    /// The live questions authored by `id`, in creation order.
    fn questions_by_user(&self, id: &UserId) -> StoreResult<Vec<Question>>;
}

pub trait QuestionDao {
    /// Live questions in creation order. With `search`, only those whose
    /// title or content contains it, ignoring case.
    fn list_questions(&self, search: Option<&str>) -> StoreResult<Vec<Question>>;

    fn question_by_id(&self, id: &QuestionId) -> StoreResult<Question>;

    /// Store a question by an existing user, optionally tagged.
    ///
    /// The id is always assigned by the store. `title` and `content` are
    /// kept as given (empty when unset) so that `list_questions` can search
    /// them; no other input field is read.
    fn create_question(&self, question: NewQuestion, tags: &[Tag]) -> StoreResult<Question>;

    /// Apply `update`; a `Some` tag list replaces the tag set wholesale.
    fn update_question(&self, update: QuestionUpdate) -> StoreResult<Question>;

    /// Delete a question on behalf of its author, cascading to its answers,
    /// votes and tag memberships. Returns the question as it was.
    fn delete_question(&self, user_id: &UserId, question_id: &QuestionId)
    -> StoreResult<Question>;

    /// Answers of a question in creation order. Empty for a question that
    /// does not exist (any longer).
    fn answers(&self, question_id: &QuestionId) -> StoreResult<Vec<Answer>>;

    fn tags(&self, question_id: &QuestionId) -> StoreResult<TagSet>;

    /// Cast or flip a vote. Repeating the current vote is an error.
    fn vote_question(
        &self,
        user_id: &UserId,
        question_id: &QuestionId,
        vote_type: VoteType,
    ) -> StoreResult<Vote>;

    fn vote_count(&self, question_id: &QuestionId) -> StoreResult<VoteCount>;
}

pub trait AnswerDao {
    fn create_answer(
        &self,
        question_id: &QuestionId,
        content: &str,
        author_id: &UserId,
    ) -> StoreResult<Answer>;

    fn answer_by_id(&self, id: &AnswerId) -> StoreResult<Answer>;

    /// Mark an answer accepted. Only the author of the answered question
    /// may do this.
    fn accept_answer(&self, answer_id: &AnswerId, user_id: &UserId) -> StoreResult<Answer>;

    /// Delete an answer on behalf of its author. Returns the answer as it
    /// was.
    fn delete_answer(&self, answer_id: &AnswerId, user_id: &UserId) -> StoreResult<Answer>;
}

pub trait TagDao {
    /// Live questions carrying `tag`; empty for a tag nobody uses.
    fn questions(&self, tag: &Tag) -> StoreResult<QuestionSet>;

    /// Every tag on at least one live question.
    fn all_tags(&self) -> StoreResult<TagSet>;
}

/// The full data-access surface.
pub trait Dao: UserDao + QuestionDao + AnswerDao + TagDao + Send + Sync {}

impl<T> Dao for T where T: UserDao + QuestionDao + AnswerDao + TagDao + Send + Sync {}
