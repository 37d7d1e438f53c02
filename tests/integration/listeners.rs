//! Listener Tests
//!
//! Query-filtered subscriptions and unsubscription.

use crate::common::*;

#[test]
fn type_filter_receives_matching_creates_and_all_deletes() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, r#"*[_type == "post"]"#, None);

    client.create(NewDocument::new("p1", "post")).unwrap();
    client.create(NewDocument::new("a1", "author")).unwrap();
    client
        .patch("a1", fields(json!({"name": "Ada"})))
        .commit()
        .unwrap();
    client.delete("a1");

    assert_eq!(
        log.kinds(),
        vec![
            (EventKind::Create, "p1".to_string()),
            (EventKind::Delete, "a1".to_string()),
        ]
    );
}

#[test]
fn events_carry_the_stored_document() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, "doc1", None);

    client
        .create(NewDocument::new("doc1", "post").with_field("title", "Hello"))
        .unwrap();
    client.delete("doc1");

    let events = log.events();
    assert_eq!(events.len(), 2);
    let doc = events[0].document.as_ref().unwrap();
    assert_eq!(doc.get_str("title"), Some("Hello"));
    assert!(events[1].document.is_none());
}

#[test]
fn unsubscribe_stops_delivery() {
    let client = TestClient::new();
    let log = EventLog::new();
    let sub = log.attach(&client, "*", None);

    client.create(NewDocument::new("a", "post")).unwrap();
    sub.unsubscribe();
    sub.unsubscribe();
    client.create(NewDocument::new("b", "post")).unwrap();

    assert_eq!(log.kinds(), vec![(EventKind::Create, "a".to_string())]);
    assert!(!sub.is_active());
}

#[test]
fn parameterized_listener() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, "*[_type == $kind]", Some(params("kind", json!("author"))));

    client.create(NewDocument::new("p1", "post")).unwrap();
    client.create(NewDocument::new("a1", "author")).unwrap();

    assert_eq!(log.kinds(), vec![(EventKind::Create, "a1".to_string())]);
}

#[test]
fn unsupported_listener_receives_nothing() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, "count(*)", None);

    client.create(NewDocument::new("p1", "post")).unwrap();
    client.delete("p1");

    assert!(log.is_empty());
}

#[test]
fn panicking_listener_does_not_block_others() {
    let client = TestClient::new();
    let _bad = client
        .listen("*", None)
        .subscribe(|_| panic!("listener failure"));
    let log = EventLog::new();
    let _good = log.attach(&client, "*", None);

    let doc = client.create(NewDocument::new("p1", "post")).unwrap();

    assert_eq!(doc.id, "p1");
    assert_eq!(log.len(), 1);
}

#[test]
fn listener_may_unsubscribe_another_during_dispatch() {
    let client = TestClient::new();
    let later = EventLog::new();
    let victim = std::sync::Arc::new(parking_lot::Mutex::new(None::<Subscription>));

    let slot = victim.clone();
    let _first = client.listen("*", None).subscribe(move |_| {
        if let Some(sub) = slot.lock().take() {
            sub.unsubscribe();
        }
    });
    *victim.lock() = Some(later.attach(&client, "*", None));

    client.create(NewDocument::new("p1", "post")).unwrap();

    assert!(later.is_empty());
}
