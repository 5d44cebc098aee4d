//! Bidirectional question/tag index.
//!
//! The forward map (question -> tags) is the source of truth; the reverse
//! map (tag -> questions) is maintained alongside it on every change so
//! that `questions(tag)` never has to scan. Tags whose last question goes
//! away are pruned, so the reverse map holds no empty entries.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use goask_core::{QuestionId, Tag, TagSet};

#[derive(Debug, Default)]
pub struct TagIndex {
    by_question: HashMap<QuestionId, TagSet>,
    by_tag: BTreeMap<Tag, BTreeSet<QuestionId>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tags of a question, empty if it has none.
    pub fn tags_of(&self, question: &QuestionId) -> TagSet {
        self.by_question.get(question).cloned().unwrap_or_default()
    }

    /// Ids of the questions carrying `tag`, in id order.
    pub fn question_ids<'a>(&'a self, tag: &Tag) -> impl Iterator<Item = &'a QuestionId> + 'a {
        self.by_tag.get(tag).into_iter().flatten()
    }

    /// Every tag that is on at least one question.
    pub fn all_tags(&self) -> TagSet {
        self.by_tag.keys().cloned().collect()
    }

    /// Replace the tag set of `question` with `tags`.
    pub fn replace(&mut self, question: &QuestionId, tags: TagSet) {
        let old = self.by_question.remove(question).unwrap_or_default();

        for stale in old.difference(&tags) {
            self.unlink(stale, question);
        }
        for added in tags.difference(&old) {
            self.by_tag
                .entry(added.clone())
                .or_default()
                .insert(question.clone());
        }

        if !tags.is_empty() {
            self.by_question.insert(question.clone(), tags);
        }
    }

    /// Drop every membership of `question`. Returns the tags it had.
    pub fn remove_question(&mut self, question: &QuestionId) -> TagSet {
        let old = self.by_question.remove(question).unwrap_or_default();
        for tag in &old {
            self.unlink(tag, question);
        }
        old
    }

    fn unlink(&mut self, tag: &Tag, question: &QuestionId) {
        if let Some(ids) = self.by_tag.get_mut(tag) {
            ids.remove(question);
            if ids.is_empty() {
                self.by_tag.remove(tag);
            }
        }
    }

    /// Verify that the reverse map is the exact inverse of the forward map.
    pub fn check(&self) -> Result<(), String> {
        for (question, tags) in &self.by_question {
            if tags.is_empty() {
                return Err(format!("question:{question} has an empty tag entry"));
            }
            for tag in tags {
                let linked = self.by_tag.get(tag).is_some_and(|ids| ids.contains(question));
                if !linked {
                    return Err(format!("tag {tag} is missing question:{question}"));
                }
            }
        }
        for (tag, ids) in &self.by_tag {
            if ids.is_empty() {
                return Err(format!("tag {tag} has no questions but was not pruned"));
            }
            for question in ids {
                let tagged = self
                    .by_question
                    .get(question)
                    .is_some_and(|tags| tags.contains(tag));
                if !tagged {
                    return Err(format!("tag {tag} lists question:{question} which lacks it"));
                }
            }
        }
        Ok(())
    }

    /// Question ids present in the forward map.
    pub(crate) fn tagged_questions(&self) -> impl Iterator<Item = &QuestionId> {
        self.by_question.keys()
    }
}
