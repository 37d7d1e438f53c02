//! Asset Upload Tests
//!
//! Blob storage plus metadata document registration.

use crate::common::*;
use docstore::AssetMetadata;

#[test]
fn upload_text_bytes() {
    let client = TestClient::new();
    let payload = AssetPayload::bytes(b"twenty bytes of text".to_vec());

    let meta = client
        .assets()
        .upload(
            AssetKind::File,
            payload,
            UploadOptions::new().filename("a.txt").mime_type("text/plain"),
        )
        .unwrap();

    assert_eq!(meta.size, 20);
    assert_eq!(meta.mime_type, "text/plain");
    assert_eq!(meta.original_filename, "a.txt");

    let path = client.assets().resolve_url(&meta.url).unwrap();
    assert!(path.starts_with(client.dir.path()));
    assert_eq!(std::fs::read(path).unwrap(), b"twenty bytes of text");
}

#[test]
fn upload_registers_document_and_emits() {
    let client = TestClient::new();
    let log = EventLog::new();
    let _sub = log.attach(&client, r#"*[_type == "asset.image"]"#, None);

    let meta = client
        .assets()
        .upload(
            AssetKind::Image,
            AssetPayload::blob("logo.png", vec![0x89, b'P', b'N', b'G']),
            UploadOptions::new().title("Logo"),
        )
        .unwrap();

    assert_eq!(meta.mime_type, "image/png");
    assert_eq!(meta.title.as_deref(), Some("Logo"));
    assert_eq!(log.kinds(), vec![(EventKind::Create, meta.id.clone())]);

    let doc = match client.fetch(&meta.id, None) {
        QueryOutput::Single(Some(doc)) => doc,
        other => panic!("expected asset document, got {:?}", other),
    };
    assert_eq!(AssetMetadata::from_document(&doc).unwrap(), meta);
}

#[test]
fn upload_from_path_copies_file() {
    let client = TestClient::new();
    let source = client.dir.path().join("report.pdf");
    std::fs::write(&source, vec![7u8; 64]).unwrap();

    let meta = client
        .assets()
        .upload(AssetKind::File, AssetPayload::path(&source), UploadOptions::new())
        .unwrap();

    assert_eq!(meta.size, 64);
    assert_eq!(meta.original_filename, "report.pdf");
    assert_eq!(meta.mime_type, "application/pdf");
    assert!(source.exists());
    assert!(client.assets().resolve_url(&meta.url).unwrap().exists());
}

#[test]
fn upload_with_existing_id_fails_and_cleans_up() {
    let client = TestClient::new();
    client.create(NewDocument::new("taken", "post")).unwrap();

    let err = client
        .assets()
        .upload(
            AssetKind::File,
            AssetPayload::bytes(b"x".to_vec()),
            UploadOptions::new().filename("x.txt").asset_id("taken"),
        )
        .unwrap_err();

    assert!(matches!(err, Error::MetadataPersist { .. }));
    assert!(!client.assets().directory().join("taken.txt").exists());
}

#[test]
fn upload_rejects_bad_payloads() {
    let client = TestClient::new();
    let assets = client.assets();

    let missing = assets.upload(
        AssetKind::File,
        AssetPayload::path(client.dir.path().join("nope.txt")),
        UploadOptions::new(),
    );
    assert!(matches!(missing, Err(Error::UnsupportedPayload { .. })));

    let unnamed = assets.upload(
        AssetKind::File,
        AssetPayload::bytes(b"abc".to_vec()),
        UploadOptions::new(),
    );
    assert!(matches!(unnamed, Err(Error::MetadataUnavailable { .. })));
}

#[test]
fn reusing_an_asset_id_keeps_the_original_blob() {
    let client = TestClient::new();
    let first = client
        .assets()
        .upload(
            AssetKind::File,
            AssetPayload::bytes(b"ORIGINAL".to_vec()),
            UploadOptions::new().filename("a.txt").asset_id("fixed"),
        )
        .unwrap();

    let err = client
        .assets()
        .upload(
            AssetKind::File,
            AssetPayload::bytes(b"SECOND".to_vec()),
            UploadOptions::new().filename("a.txt").asset_id("fixed"),
        )
        .unwrap_err();

    assert!(matches!(err, Error::MetadataPersist { .. }));
    assert!(client.get_document("fixed").is_some());
    let path = client.assets().resolve_url(&first.url).unwrap();
    assert_eq!(std::fs::read(path).unwrap(), b"ORIGINAL");
}

#[test]
fn asset_id_cannot_escape_the_assets_directory() {
    let client = TestClient::new();

    let err = client
        .assets()
        .upload(
            AssetKind::File,
            AssetPayload::bytes(b"x".to_vec()),
            UploadOptions::new().filename("a.txt").asset_id("../escaped"),
        )
        .unwrap_err();

    assert!(matches!(err, Error::MetadataUnavailable { .. }));
    assert!(!client.dir.path().join("escaped.txt").exists());
    assert!(client.get_document("../escaped").is_none());
}
