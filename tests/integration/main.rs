//! Integration Tests
//!
//! End-to-end tests through the public client API, organized by surface:
//! - Documents: create / fetch / patch / delete
//! - Transactions: batching and partial failure
//! - Listeners: filtering and unsubscription
//! - Assets: blob upload and metadata documents

#[path = "../common/mod.rs"]
mod common;

mod assets;
mod documents;
mod listeners;
mod transactions;
