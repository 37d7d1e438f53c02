//! Document engine for docstore
//!
//! This crate holds the in-process machinery behind the client:
//! - DocumentStore: keyed, insertion-ordered document collection
//! - EventNotifier: single-channel publish/subscribe for mutation events
//! - Transaction: ordered, non-atomic batch of mutations with per-step events
//! - Query: parser and evaluator for the fixed set of query shapes
//!
//! The store never emits events itself. Whoever mutates it (a transaction or
//! the client) is responsible for notifying listeners.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod notifier;
pub mod query;
pub mod store;
pub mod transaction;

pub use notifier::{Callback, EventNotifier, ListenerId, Subscription};
pub use query::{execute, Query, QueryOutput, QueryParams, ResolvedQuery};
pub use store::DocumentStore;
pub use transaction::Transaction;
