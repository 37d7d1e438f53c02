//! Query interpreter for the fixed set of supported query shapes
//!
//! This is deliberately not a query language. Exactly these shapes parse,
//! checked in this order:
//!
//! | Input | Shape |
//! |-------|-------|
//! | `doc1` (bare identifier) | [`Query::ById`] |
//! | `*[_type == "post"]` or `*[_type == 'post']` | [`Query::ByType`] |
//! | `*[_type == $t]` | [`Query::ByTypeParam`] |
//! | `*` | [`Query::All`] |
//! | anything else | [`Query::Unsupported`] |
//!
//! Unsupported or unresolvable queries never fail; they evaluate to an empty
//! result and log a warning.

use crate::store::DocumentStore;
use docstore_core::{Document, EventKind, MutationEvent};
use std::collections::HashMap;
use tracing::warn;

/// Named query parameters
pub type QueryParams = HashMap<String, serde_json::Value>;

/// A parsed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Exact id lookup
    ById(String),
    /// Documents of a literal type
    ByType(String),
    /// Documents of the type bound to a parameter
    ByTypeParam(String),
    /// Every document
    All,
    /// Unrecognised input, kept verbatim for diagnostics
    Unsupported(String),
}

/// A query with its parameters resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedQuery {
    /// Exact id lookup
    ById(String),
    /// Documents of a type
    ByType(String),
    /// Every document
    All,
    /// Matches nothing
    Nothing,
}

/// Result of evaluating a query against a store
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    /// By-id lookups yield at most one document
    Single(Option<Document>),
    /// Every other shape yields a collection
    Many(Vec<Document>),
}

impl QueryOutput {
    /// Flatten into a list of documents
    pub fn into_documents(self) -> Vec<Document> {
        match self {
            QueryOutput::Single(doc) => doc.into_iter().collect(),
            QueryOutput::Many(docs) => docs,
        }
    }
}

impl Query {
    /// Parse a query string. Never fails.
    pub fn parse(input: &str) -> Query {
        let trimmed = input.trim();
        if is_bare_identifier(trimmed) {
            return Query::ById(trimmed.to_string());
        }
        if trimmed == "*" {
            return Query::All;
        }
        match parse_type_filter(trimmed) {
            Some(TypeOperand::Literal(name)) => Query::ByType(name),
            Some(TypeOperand::Param(name)) => Query::ByTypeParam(name),
            None => Query::Unsupported(input.to_string()),
        }
    }

    /// Bind parameters. Unresolvable shapes resolve to [`ResolvedQuery::Nothing`]
    /// with a logged warning.
    pub fn resolve(&self, params: Option<&QueryParams>) -> ResolvedQuery {
        match self {
            Query::ById(id) => ResolvedQuery::ById(id.clone()),
            Query::ByType(name) => ResolvedQuery::ByType(name.clone()),
            Query::All => ResolvedQuery::All,
            Query::ByTypeParam(param) => {
                match params.and_then(|p| p.get(param)).and_then(|v| v.as_str()) {
                    Some(name) => ResolvedQuery::ByType(name.to_string()),
                    None => {
                        warn!(
                            target: "docstore::query",
                            param = %param,
                            "Query parameter missing or not a string; returning no results"
                        );
                        ResolvedQuery::Nothing
                    }
                }
            }
            Query::Unsupported(raw) => {
                warn!(target: "docstore::query", query = %raw, "Unsupported query shape; returning no results");
                ResolvedQuery::Nothing
            }
        }
    }
}

impl ResolvedQuery {
    /// Whether a stored document satisfies this query
    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            ResolvedQuery::ById(id) => doc.id == *id,
            ResolvedQuery::ByType(name) => doc.doc_type == *name,
            ResolvedQuery::All => true,
            ResolvedQuery::Nothing => false,
        }
    }

    /// Whether a listener on this query should see `event`
    ///
    /// Delete events carry no body, so a type filter cannot check them: every
    /// delete passes a type-filtered listener.
    pub fn matches_event(&self, event: &MutationEvent) -> bool {
        match self {
            ResolvedQuery::ById(id) => event.document_id == *id,
            ResolvedQuery::ByType(name) => match (&event.kind, &event.document) {
                (EventKind::Delete, _) => true,
                (_, Some(doc)) => doc.doc_type == *name,
                (_, None) => false,
            },
            ResolvedQuery::All => true,
            ResolvedQuery::Nothing => false,
        }
    }

    /// Run against a store
    pub fn evaluate(&self, store: &DocumentStore) -> QueryOutput {
        match self {
            ResolvedQuery::ById(id) => QueryOutput::Single(store.get(id)),
            ResolvedQuery::Nothing => QueryOutput::Many(Vec::new()),
            other => QueryOutput::Many(store.query(|doc| other.matches(doc))),
        }
    }
}

/// Parse, resolve and evaluate in one step
pub fn execute(store: &DocumentStore, query: &str, params: Option<&QueryParams>) -> QueryOutput {
    Query::parse(query).resolve(params).evaluate(store)
}

// =============================================================================
// Parsing
// =============================================================================

fn is_bare_identifier(s: &str) -> bool {
    !s.is_empty()
        && s != "*"
        && !s.contains('[')
        && s.chars().all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))
}

enum TypeOperand {
    Literal(String),
    Param(String),
}

/// Parse `*[_type == "name"]`, `*[_type == 'name']` or `*[_type == $param]`
fn parse_type_filter(s: &str) -> Option<TypeOperand> {
    let rest = s.strip_prefix('*')?.trim_start();
    let inner = rest.strip_prefix('[')?.strip_suffix(']')?.trim();
    let operand = inner.strip_prefix("_type")?.trim_start();
    let operand = operand.strip_prefix("==")?.trim();

    if let Some(param) = operand.strip_prefix('$') {
        return is_param_name(param).then(|| TypeOperand::Param(param.to_string()));
    }

    let quote = operand.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = operand[1..].strip_suffix(quote)?;
    if body.is_empty() || body.contains(quote) {
        return None;
    }
    Some(TypeOperand::Literal(body.to_string()))
}

fn is_param_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}
