//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]
#![allow(unused_imports)]

use parking_lot::Mutex;
use std::sync::Arc;
use tempfile::TempDir;

pub use docstore::{
    AssetKind, AssetPayload, Client, ClientConfig, Error, EventKind, Fields, LocalFs,
    ManualClock, MutationEvent, NewDocument, QueryOutput, QueryParams, Subscription, Timestamp,
    UploadOptions,
};
pub use serde_json::json;

// ============================================================================
// TestClient - client with a private assets directory
// ============================================================================

/// Client wrapper owning its assets directory
pub struct TestClient {
    pub client: Client,
    pub dir: TempDir,
}

impl TestClient {
    /// Client with the system clock, as callers would build it
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = ClientConfig::default().with_assets_directory(dir.path().join("assets"));
        let client = Client::new(config).expect("Failed to create client");
        TestClient { client, dir }
    }

    /// Client driven by a manual clock
    pub fn with_manual_clock(start: Timestamp) -> (Self, Arc<ManualClock>) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let clock = Arc::new(ManualClock::new(start));
        let config = ClientConfig::default().with_assets_directory(dir.path().join("assets"));
        let client = Client::with_collaborators(config, clock.clone(), Arc::new(LocalFs))
            .expect("Failed to create client");
        (TestClient { client, dir }, clock)
    }
}

impl std::ops::Deref for TestClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

// ============================================================================
// Event recording
// ============================================================================

/// Events seen by a subscription, in delivery order
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<MutationEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `query` on `client`, recording into this log
    pub fn attach(&self, client: &Client, query: &str, params: Option<QueryParams>) -> Subscription {
        let events = self.events.clone();
        client
            .listen(query, params)
            .subscribe(move |event| events.lock().push(event.clone()))
    }

    pub fn kinds(&self) -> Vec<(EventKind, String)> {
        self.events
            .lock()
            .iter()
            .map(|e| (e.kind, e.document_id.clone()))
            .collect()
    }

    pub fn events(&self) -> Vec<MutationEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Build a field map from a JSON object literal
pub fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

/// Bind a single query parameter
pub fn params(name: &str, value: serde_json::Value) -> QueryParams {
    QueryParams::from([(name.to_string(), value)])
}

/// Ids of a fetch result, in result order
pub fn ids(output: QueryOutput) -> Vec<String> {
    output.into_documents().into_iter().map(|d| d.id).collect()
}
