// Idempotency, race and sampling properties of the keyed collections.

use std::collections::HashMap;
use std::sync::{Arc, Barrier};
use std::time::Duration;

use reelbot_core::types::{ArtifactRecord, UserRecord};
use reelbot_store::{ArtifactRepo, InsertOutcome, KeyedCollection, Store, UserRepo};
use serde_json::json;

fn open_store(dir: &tempfile::TempDir) -> Store {
    Store::open(dir.path().join("reel.db"), Duration::from_secs(5)).unwrap()
}

fn artifact(content_id: &str, artifact_ref: &str) -> ArtifactRecord {
    ArtifactRecord {
        content_id: content_id.to_string(),
        artifact_ref: artifact_ref.to_string(),
        raw_payload: json!({"video": [{"file_unique_id": content_id, "file_id": artifact_ref}]}),
    }
}

#[tokio::test]
async fn repeated_registration_leaves_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let users = UserRepo::new(open_store(&dir));
    let record = UserRecord {
        sender_id: 42,
        first_seen_payload: json!({"from": {"id": 42}, "text": "/start"}),
    };

    assert_eq!(users.register(record.clone()).await.unwrap(), InsertOutcome::Inserted);
    for _ in 0..5 {
        assert_eq!(
            users.register(record.clone()).await.unwrap(),
            InsertOutcome::AlreadyExists
        );
    }
    assert_eq!(users.count().await.unwrap(), 1);
    assert_eq!(users.find(42).await.unwrap(), Some(record));
}

#[test]
fn racing_threads_insert_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    let racers = 8;
    let barrier = Arc::new(Barrier::new(racers));

    let handles: Vec<_> = (0..racers)
        .map(|i| {
            let artifacts = KeyedCollection::<ArtifactRecord>::new(store.clone());
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                artifacts
                    .insert_if_absent(&artifact("U-race", &format!("F{i}")))
                    .unwrap()
            })
        })
        .collect();

    let outcomes: Vec<InsertOutcome> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let inserted = outcomes
        .iter()
        .filter(|o| **o == InsertOutcome::Inserted)
        .count();
    assert_eq!(inserted, 1, "outcomes: {outcomes:?}");

    let artifacts = KeyedCollection::<ArtifactRecord>::new(store);
    assert_eq!(artifacts.count().unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_tasks_insert_exactly_once() {
    let dir = tempfile::tempdir().unwrap();
    let repo = ArtifactRepo::new(open_store(&dir));

    let tasks: Vec<_> = (0..2)
        .map(|i| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.ingest(artifact("U1", &format!("F{i}"))).await })
        })
        .collect();

    let mut inserted = 0;
    for task in tasks {
        if task.await.unwrap().unwrap() == InsertOutcome::Inserted {
            inserted += 1;
        }
    }
    assert_eq!(inserted, 1);
    assert_eq!(repo.count().await.unwrap(), 1);
    assert!(repo.find("U1").await.unwrap().is_some());
}

#[tokio::test]
async fn sample_empty_then_member() {
    let dir = tempfile::tempdir().unwrap();
    let repo = ArtifactRepo::new(open_store(&dir));
    assert_eq!(repo.sample().await.unwrap(), None);

    let stored = artifact("U1", "F1");
    repo.ingest(stored.clone()).await.unwrap();
    assert_eq!(repo.sample().await.unwrap(), Some(stored));
}

#[test]
fn sample_is_roughly_uniform() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = KeyedCollection::<ArtifactRecord>::new(open_store(&dir));
    let n = 4;
    for i in 0..n {
        artifacts
            .insert_if_absent(&artifact(&format!("U{i}"), &format!("F{i}")))
            .unwrap();
    }

    let draws = 4000;
    let mut hits: HashMap<String, usize> = HashMap::new();
    for _ in 0..draws {
        let rec = artifacts.sample_one().unwrap().expect("non-empty collection");
        *hits.entry(rec.content_id).or_default() += 1;
    }

    assert_eq!(hits.len(), n, "every record should be drawn: {hits:?}");
    let expected = draws / n;
    for (id, count) in &hits {
        // expected 1000, sd ~27; 200 is more than 7 sd.
        assert!(
            count.abs_diff(expected) < 200,
            "{id} drawn {count} times, expected about {expected}"
        );
    }
}
