//! Document Lifecycle Tests
//!
//! Create, fetch, patch and delete through the client.

use crate::common::*;

#[test]
fn crud_lifecycle() {
    let client = TestClient::new();

    // Create
    let created = client
        .create(NewDocument::new("doc1", "test").with_field("title", "Initial"))
        .unwrap();
    assert_eq!(created.created_at, created.updated_at);

    // Read
    let doc = client.get_document("doc1").unwrap();
    assert_eq!(doc.get_str("title"), Some("Initial"));

    // Update
    client
        .patch("doc1", fields(json!({"title": "Updated", "extra": true})))
        .commit()
        .unwrap();
    let doc = client.get_document("doc1").unwrap();
    assert_eq!(doc.get_str("title"), Some("Updated"));
    assert_eq!(doc.get("extra"), Some(&json!(true)));
    assert!(doc.updated_at > created.updated_at);
    assert_eq!(doc.created_at, created.created_at);

    // Delete
    client.delete("doc1");
    assert_eq!(client.fetch("doc1", None), QueryOutput::Single(None));
}

#[test]
fn explicit_timestamps_are_kept() {
    let client = TestClient::new();
    let created = Timestamp::from_millis(1_600_000_000_000);
    let doc = client
        .create(NewDocument::new("old", "post").created_at(created))
        .unwrap();

    assert_eq!(doc.created_at, created);
    assert_eq!(doc.updated_at, created);
}

#[test]
fn reserved_fields_in_patch_are_ignored() {
    let (client, clock) = TestClient::with_manual_clock(Timestamp::from_millis(10));
    let original = client.create(NewDocument::new("doc1", "post")).unwrap();

    clock.advance(1_000);
    client
        .patch(
            "doc1",
            fields(json!({
                "id": "other",
                "type": "author",
                "createdAt": "2001-01-01T00:00:00Z",
                "title": "kept",
            })),
        )
        .commit()
        .unwrap();

    let doc = client.get_document("doc1").unwrap();
    assert_eq!(doc.id, "doc1");
    assert_eq!(doc.doc_type, "post");
    assert_eq!(doc.created_at, original.created_at);
    assert_eq!(doc.get_str("title"), Some("kept"));
    assert!(client.get_document("other").is_none());
}

#[test]
fn wire_shape() {
    let (client, _clock) = TestClient::with_manual_clock(Timestamp::from_millis(1_000));
    let doc = client
        .create(NewDocument::new("doc1", "post").with_field("title", "Hello"))
        .unwrap();

    assert_eq!(
        doc.to_json(),
        json!({
            "id": "doc1",
            "type": "post",
            "createdAt": "1970-01-01T00:00:01.000000Z",
            "updatedAt": "1970-01-01T00:00:01.000000Z",
            "title": "Hello",
        })
    );
}

#[test]
fn fetch_by_type_literal_and_param() {
    let client = TestClient::new();
    for (id, doc_type) in [("p1", "post"), ("a1", "author"), ("p2", "post")] {
        client.create(NewDocument::new(id, doc_type)).unwrap();
    }

    assert_eq!(ids(client.fetch(r#"*[_type == "post"]"#, None)), ["p1", "p2"]);
    assert_eq!(ids(client.fetch("*[_type == 'author']", None)), ["a1"]);
    assert_eq!(
        ids(client.fetch("*[_type == $t]", Some(&params("t", json!("post"))))),
        ["p1", "p2"]
    );
    assert_eq!(ids(client.fetch("*", None)), ["p1", "a1", "p2"]);
}

#[test]
fn fetch_never_fails() {
    let client = TestClient::new();
    client.create(NewDocument::new("p1", "post")).unwrap();

    assert!(ids(client.fetch("*[_type == $t]", None)).is_empty());
    assert!(ids(client.fetch("*[_type == $t]", Some(&params("x", json!("post"))))).is_empty());
    assert!(ids(client.fetch("*[title == \"x\"] | order(title)", None)).is_empty());
}

#[test]
fn reset_clears_everything() {
    let client = TestClient::new();
    client.create(NewDocument::new("p1", "post")).unwrap();
    client.create(NewDocument::new("p2", "post")).unwrap();

    client.reset();

    assert!(ids(client.fetch("*", None)).is_empty());
    client.create(NewDocument::new("p1", "post")).unwrap();
}
