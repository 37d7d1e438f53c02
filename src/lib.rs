//! docstore - In-process document store emulator
//!
//! docstore keeps typed JSON documents in memory and offers the surface of a
//! hosted document service: query-shaped fetches, batched mutations, live
//! change notifications and local asset ingestion.
//!
//! # Quick Start
//!
//! ```ignore
//! use docstore::{Client, ClientConfig, NewDocument};
//!
//! let client = Client::new(ClientConfig::default())?;
//!
//! client.create(NewDocument::new("doc1", "post").with_field("title", "Hello"))?;
//!
//! let doc = client.fetch("doc1", None);
//! ```
//!
//! # Architecture
//!
//! All operations go through the [`Client`]. Storage, querying and event
//! delivery live in internal crates and are re-exported only where callers
//! see their types.

// Re-export the public API from docstore-client
pub use docstore_client::*;
