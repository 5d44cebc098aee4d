//! Core data types for the goask platform.
//!
//! Records mirror what the store keeps for each entity kind:
//!
//! - A user is an author of questions and answers
//! - A question belongs to its author and carries a replaceable tag set
//! - An answer belongs to one question and one author, and may be accepted
//!   by the question's author
//! - A vote is the single up/down opinion of one user on one question
//!
//! Tags are kept by the store's tag index rather than inside `Question`, so
//! a question snapshot does not change when only its tags change.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::ids::{AnswerId, QuestionId, UserId};

// ============================================================================
// Tags
// ============================================================================

/// A tag label such as `"Go"` or `"Python"`. Case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Tag {
    /// Creates a tag from anything string-like.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The set of tags on one question. Duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Creates an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds a tag set from labels.
    pub fn from_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        tags.into_iter().collect()
    }

    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn remove(&mut self, tag: &Tag) -> bool {
        self.0.remove(tag)
    }

    #[must_use]
    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Tags present in `self` but not in `other`.
    pub fn difference<'a>(&'a self, other: &'a TagSet) -> impl Iterator<Item = &'a Tag> {
        self.0.difference(&other.0)
    }
}

impl<T: Into<Tag>> FromIterator<T> for TagSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl IntoIterator for TagSet {
    type Item = Tag;
    type IntoIter = std::collections::btree_set::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::collections::btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Users
// ============================================================================

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    /// Display name. Not unique.
    pub name: String,
}

// ============================================================================
// Questions
// ============================================================================

/// A stored question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub author_id: UserId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Input for creating a question. The store assigns the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub author_id: UserId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl NewQuestion {
    /// A question with no title or content, authored by `author_id`.
    #[must_use]
    pub fn by(author_id: impl Into<UserId>) -> Self {
        Self {
            author_id: author_id.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Changes to apply to an existing question.
///
/// `None` fields are left untouched. `Some(tags)` replaces the whole tag
/// set; it is never merged with the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionUpdate {
    pub id: QuestionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl QuestionUpdate {
    /// An update that changes nothing yet.
    #[must_use]
    pub fn new(id: impl Into<QuestionId>) -> Self {
        Self {
            id: id.into(),
            title: None,
            content: None,
            tags: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replace the tag set with `tags`.
    #[must_use]
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

/// A set of questions keyed by id, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet(BTreeMap<QuestionId, Question>);

impl QuestionSet {
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Adds a question, replacing any previous entry with the same id.
    pub fn insert(&mut self, question: Question) {
        self.0.insert(question.id.clone(), question);
    }

    #[must_use]
    pub fn contains(&self, id: &QuestionId) -> bool {
        self.0.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&Question> {
        self.0.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.0.values()
    }
}

impl FromIterator<Question> for QuestionSet {
    fn from_iter<I: IntoIterator<Item = Question>>(iter: I) -> Self {
        let mut set = Self::new();
        for question in iter {
            set.insert(question);
        }
        set
    }
}

impl IntoIterator for QuestionSet {
    type Item = Question;
    type IntoIter = std::collections::btree_map::IntoValues<QuestionId, Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}

// ============================================================================
// Answers
// ============================================================================

/// A stored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub question_id: QuestionId,
    pub author_id: UserId,
    pub content: String,
    /// Set by the question's author. Starts out `false`.
    #[serde(default)]
    pub accepted: bool,
}

// ============================================================================
// Votes
// ============================================================================

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VoteType {
    Up,
    Down,
}

impl fmt::Display for VoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => f.write_str("UP"),
            Self::Down => f.write_str("DOWN"),
        }
    }
}

/// The live vote of one user on one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub vote_type: VoteType,
}

/// Tally of live votes on a question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCount {
    pub up: usize,
    pub down: usize,
}

impl VoteCount {
    /// Counts one vote of the given type.
    pub fn record(&mut self, vote_type: VoteType) {
        match vote_type {
            VoteType::Up => self.up += 1,
            VoteType::Down => self.down += 1,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_set_collapses_duplicates() {
        let tags = TagSet::from_tags(["Go", "Python", "Go"]);
        assert_eq!(tags.len(), 2);
        assert!(tags.contains(&Tag::from("Go")));
        assert!(tags.contains(&Tag::from("Python")));
    }

    #[test]
    fn tag_set_equality_ignores_insertion_order() {
        assert_eq!(
            TagSet::from_tags(["Python", "Go"]),
            TagSet::from_tags(["Go", "Python"])
        );
    }

    #[test]
    fn tag_set_difference() {
        let old = TagSet::from_tags(["Go", "Python"]);
        let new = TagSet::from_tags(["Python", "Rust"]);
        let stale: Vec<&Tag> = old.difference(&new).collect();
        assert_eq!(stale, [&Tag::from("Go")]);
    }

    #[test]
    fn tag_set_serializes_as_array() {
        let tags = TagSet::from_tags(["b", "a"]);
        let json = serde_json::to_string(&tags).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }

    #[test]
    fn vote_type_display_and_serde() {
        assert_eq!(VoteType::Up.to_string(), "UP");
        assert_eq!(VoteType::Down.to_string(), "DOWN");
        assert_eq!(serde_json::to_string(&VoteType::Down).unwrap(), "\"DOWN\"");
        let parsed: VoteType = serde_json::from_str("\"UP\"").unwrap();
        assert_eq!(parsed, VoteType::Up);
    }

    #[test]
    fn vote_count_records_each_direction() {
        let mut count = VoteCount::default();
        count.record(VoteType::Up);
        count.record(VoteType::Up);
        count.record(VoteType::Down);
        assert_eq!(count, VoteCount { up: 2, down: 1 });
    }

    #[test]
    fn question_set_is_keyed_by_id() {
        let q1 = Question {
            id: QuestionId::from("1"),
            author_id: UserId::from("1"),
            title: String::new(),
            content: String::new(),
        };
        let mut renamed = q1.clone();
        renamed.title = "renamed".to_string();

        let set: QuestionSet = [q1, renamed].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&QuestionId::from("1")).unwrap().title, "renamed");
    }

    #[test]
    fn new_question_builder() {
        let q = NewQuestion::by("3").title("Lifetimes?").content("Why 'a");
        assert_eq!(q.author_id, UserId::from("3"));
        assert_eq!(q.title, "Lifetimes?");
        assert_eq!(q.content, "Why 'a");
    }

    #[test]
    fn question_update_defaults_leave_fields_untouched() {
        let update: QuestionUpdate = serde_json::from_str(r#"{"id":"4"}"#).unwrap();
        assert_eq!(update, QuestionUpdate::new("4"));
        assert!(update.tags.is_none());

        let update = QuestionUpdate::new("4").with_tags(["Go"]);
        assert_eq!(update.tags, Some(vec![Tag::from("Go")]));
    }

    #[test]
    fn answer_accepted_defaults_to_false() {
        let answer: Answer = serde_json::from_str(
            r#"{"id":"1","question_id":"1","author_id":"1","content":"answer 1"}"#,
        )
        .unwrap();
        assert!(!answer.accepted);
    }
}
