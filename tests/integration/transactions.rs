//! Transaction Tests
//!
//! Ordered application, per-step events and partial failure.

use crate::common::*;

#[test]
fn commit_applies_in_order_and_emits_per_step() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, "*", None);

    let mut txn = client.transaction();
    txn.create(NewDocument::new("a", "post"))
        .create(NewDocument::new("b", "post"))
        .patch("a", fields(json!({"n": 1})))
        .delete("b");
    let results = txn.commit().unwrap();

    assert_eq!(results.len(), 4);
    assert!(txn.is_empty());
    assert_eq!(
        log.kinds(),
        vec![
            (EventKind::Create, "a".to_string()),
            (EventKind::Create, "b".to_string()),
            (EventKind::Update, "a".to_string()),
            (EventKind::Delete, "b".to_string()),
        ]
    );
    assert_eq!(results[2].document.as_ref().unwrap().get("n"), Some(&json!(1)));
    assert!(results[3].document.is_none());
    assert_eq!(ids(client.fetch("*", None)), ["a"]);
}

#[test]
fn listeners_observe_partial_effects() {
    let client = std::sync::Arc::new(TestClient::new());
    let visible = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));

    let weak = std::sync::Arc::downgrade(&client);
    let sink = visible.clone();
    let _sub = client.listen("*", None).subscribe(move |_event| {
        if let Some(client) = weak.upgrade() {
            sink.lock().push(ids(client.fetch("*", None)));
        }
    });

    let mut txn = client.transaction();
    txn.create(NewDocument::new("a", "post"))
        .create(NewDocument::new("b", "post"));
    txn.commit().unwrap();

    assert_eq!(
        *visible.lock(),
        vec![vec!["a".to_string()], vec!["a".to_string(), "b".to_string()]]
    );
}

#[test]
fn failure_keeps_applied_prefix_and_pending_sequence() {
    let client = TestClient::new();
    client.create(NewDocument::new("dup", "post")).unwrap();
    let log = EventLog::new();
    let _sub = log.attach(&client, "*", None);

    let mut txn = client.transaction();
    txn.create(NewDocument::new("a", "post"))
        .create(NewDocument::new("dup", "post"))
        .create(NewDocument::new("c", "post"));
    let err = txn.commit().unwrap_err();

    assert!(err.is_duplicate_id());
    assert!(client.get_document("a").is_some());
    assert!(client.get_document("c").is_none());
    assert_eq!(log.kinds(), vec![(EventKind::Create, "a".to_string())]);
    // Nothing is drained from the batch on failure
    assert_eq!(txn.len(), 3);
}

#[test]
fn patch_of_missing_document_aborts() {
    let client = TestClient::new();
    let mut txn = client.transaction();
    txn.patch("ghost", fields(json!({"x": 1})))
        .create(NewDocument::new("after", "post"));

    let err = txn.commit().unwrap_err();

    assert!(err.is_not_found());
    assert!(client.get_document("after").is_none());
}

#[test]
fn delete_of_missing_document_still_emits() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, "*", None);

    let mut txn = client.transaction();
    txn.delete("ghost");
    let results = txn.commit().unwrap();

    assert_eq!(results[0].id, "ghost");
    assert_eq!(results[0].operation, EventKind::Delete);
    assert_eq!(log.kinds(), vec![(EventKind::Delete, "ghost".to_string())]);
}

#[test]
fn every_committed_mutation_emits_one_event() {
    let client = TestClient::new();
    client.create(NewDocument::new("x", "post")).unwrap();
    let log = EventLog::new();
    let _sub = log.attach(&client, "*", None);

    let mut txn = client.transaction();
    txn.create(NewDocument::new("a", "post"))
        .patch("x", fields(json!({"n": 1})))
        .patch("x", fields(json!({"type": "author"})))
        .delete("ghost")
        .delete("a");
    let results = txn.commit().unwrap();

    assert_eq!(results.len(), 5);
    assert_eq!(
        log.kinds(),
        vec![
            (EventKind::Create, "a".to_string()),
            (EventKind::Update, "x".to_string()),
            (EventKind::Update, "x".to_string()),
            (EventKind::Delete, "ghost".to_string()),
            (EventKind::Delete, "a".to_string()),
        ]
    );
    assert_eq!(client.get_document("x").unwrap().doc_type, "post");
}

#[test]
fn committed_transaction_is_drained() {
    let client = TestClient::new();
    let mut txn = client.transaction();
    txn.create(NewDocument::new("a", "post"));
    txn.commit().unwrap();

    assert!(txn.commit().unwrap().is_empty());
    assert_eq!(ids(client.fetch("*", None)), ["a"]);
}
