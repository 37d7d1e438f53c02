//! # docstore client
//!
//! The public API of docstore: an in-process document store with batched
//! mutations, live change notifications and asset ingestion.
//!
//! This is the only crate users need to import. It provides:
//! - [`Client`] - fetch / create / patch / delete / transaction / listen
//! - [`AssetStore`] - blob upload with metadata documents
//! - [`ClientConfig`] - construction config
//!
//! ## Quick Start
//!
//! ```text
//! use docstore_client::{Client, ClientConfig, NewDocument};
//!
//! let client = Client::new(ClientConfig::default())?;
//!
//! let sub = client
//!     .listen(r#"*[_type == "post"]"#, None)
//!     .subscribe(|event| println!("{} {}", event.kind, event.document_id));
//!
//! client.create(NewDocument::new("post-1", "post").with_field("title", "Hello"))?;
//!
//! let mut txn = client.transaction();
//! txn.create(NewDocument::new("post-2", "post")).delete("post-1");
//! txn.commit()?;
//!
//! sub.unsubscribe();
//! ```
//!
//! ## Query Shapes
//!
//! | Query | Result |
//! |-------|--------|
//! | `post-1` | single document or none |
//! | `*[_type == "post"]` | all posts |
//! | `*[_type == $t]` | all documents of the type bound to `t` |
//! | `*` | every document |

#![warn(missing_docs)]

pub mod assets;
mod client;
pub mod config;
mod listen;
pub mod logging;

pub use assets::{
    generate_asset_id, AssetFs, AssetKind, AssetMetadata, AssetPayload, AssetStore, LocalFs,
    UploadOptions,
};
pub use client::Client;
pub use config::{ClientConfig, LogLevel};
pub use listen::Listener;
pub use logging::init_logging;

// Re-export core and engine types so users don't need those crates directly
pub use docstore_core::{
    Clock, Document, Error, EventKind, Fields, ManualClock, Mutation, MutationEvent,
    MutationResult, NewDocument, Result, SystemClock, Timestamp,
};
pub use docstore_engine::{
    ListenerId, Query, QueryOutput, QueryParams, Subscription, Transaction,
};

/// Result of [`Client::fetch`]
pub type FetchResult = QueryOutput;
