//! Core types for docstore
//!
//! This crate defines the foundational types used throughout the system:
//! - Document / NewDocument: stored documents and create requests
//! - Timestamp / Clock: microsecond timestamps and their source
//! - MutationEvent / EventKind: change notifications
//! - Mutation / MutationResult: units of change and their outcomes
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod event;
pub mod mutation;
pub mod timestamp;

pub use document::{
    is_reserved_field, strip_reserved, Document, Fields, NewDocument, CREATED_AT_FIELD, ID_FIELD,
    RESERVED_FIELDS, TYPE_FIELD, UPDATED_AT_FIELD,
};
pub use error::{Error, Result};
pub use event::{EventKind, MutationEvent};
pub use mutation::{Mutation, MutationResult};
pub use timestamp::{Clock, ManualClock, SystemClock, Timestamp, TimestampParseError};
