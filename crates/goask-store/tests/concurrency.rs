//! Concurrent callers sharing one store.

mod common;

use std::collections::HashSet;

use goask_store::goask_core::{NewQuestion, QuestionId, Tag, VoteType};
use goask_store::{AnswerDao, QuestionDao, TagDao, UserDao};

use common::new_store;

#[test]
fn concurrent_creation_yields_unique_ids() {
    let store = new_store();
    let author = store.create_user("author").unwrap();

    let ids: Vec<QuestionId> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let author = author.id.clone();
                s.spawn(move || {
                    (0..50)
                        .map(|_| {
                            store
                                .create_question(NewQuestion::by(author.clone()), &[])
                                .unwrap()
                                .id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: HashSet<&QuestionId> = ids.iter().collect();
    assert_eq!(unique.len(), 400);
    assert_eq!(store.question_count(&author.id).unwrap(), 400);
    store.check_invariants().unwrap();
}

#[test]
fn cascades_are_never_partially_visible() {
    let store = new_store();
    let author = store.create_user("author").unwrap();
    let answerer = store.create_user("answerer").unwrap();

    let questions: Vec<_> = (0..40)
        .map(|_| {
            let q = store
                .create_question(NewQuestion::by(author.id.clone()), &[Tag::from("Rust")])
                .unwrap();
            for i in 0..3 {
                store
                    .create_answer(&q.id, &format!("answer {i}"), &answerer.id)
                    .unwrap();
            }
            store
                .vote_question(&answerer.id, &q.id, VoteType::Up)
                .unwrap();
            q
        })
        .collect();

    std::thread::scope(|s| {
        let writer = {
            let store = store.clone();
            let author = author.id.clone();
            let questions = questions.clone();
            s.spawn(move || {
                for q in &questions {
                    store.delete_question(&author, &q.id).unwrap();
                }
            })
        };

        for _ in 0..4 {
            let store = store.clone();
            let answerer = answerer.id.clone();
            s.spawn(move || {
                for _ in 0..200 {
                    // Each question carries exactly three answers by this
                    // user, so a half-finished cascade would show up as a
                    // count that is not a multiple of three.
                    let answers = store.answer_count(&answerer).unwrap();
                    assert_eq!(answers % 3, 0);

                    let tagged = store.questions(&Tag::from("Rust")).unwrap();
                    for q in tagged.iter() {
                        if let Ok(found) = store.answers(&q.id) {
                            assert!(found.is_empty() || found.len() == 3);
                        }
                    }
                    store.check_invariants().unwrap();
                }
            });
        }

        writer.join().unwrap();
    });

    assert!(store.questions(&Tag::from("Rust")).unwrap().is_empty());
    assert_eq!(store.answer_count(&answerer.id).unwrap(), 0);
    assert_eq!(store.question_count(&author.id).unwrap(), 0);
    store.check_invariants().unwrap();
}

#[test]
fn concurrent_votes_keep_one_per_user() {
    let store = new_store();
    let author = store.create_user("author").unwrap();
    let voter = store.create_user("voter").unwrap();
    let q = store
        .create_question(NewQuestion::by(author.id.clone()), &[])
        .unwrap();

    let successes: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let voter = voter.id.clone();
                let q = q.id.clone();
                s.spawn(move || {
                    store
                        .vote_question(&voter, &q, VoteType::Up)
                        .map_or(0, |_| 1)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(successes, 1);
    let count = store.vote_count(&q.id).unwrap();
    assert_eq!((count.up, count.down), (1, 0));
}
