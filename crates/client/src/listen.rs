//! Query-filtered change subscriptions

use docstore_core::MutationEvent;
use docstore_engine::{EventNotifier, Query, QueryParams, Subscription};

/// A query to watch, not yet subscribed
///
/// Each [`Listener::subscribe`] call registers an independent callback.
/// Type-filtered listeners receive every delete event, whatever the deleted
/// document's type, because delete events carry no document body.
#[derive(Debug, Clone)]
pub struct Listener {
    notifier: EventNotifier,
    query: Query,
    params: Option<QueryParams>,
}

impl Listener {
    pub(crate) fn new(notifier: EventNotifier, query: &str, params: Option<QueryParams>) -> Self {
        Self {
            notifier,
            query: Query::parse(query),
            params,
        }
    }

    /// The parsed query
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Register `callback` for matching events until unsubscribed
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&MutationEvent) + Send + Sync + 'static,
    {
        let filter = self.query.resolve(self.params.as_ref());
        self.notifier.subscribe(move |event| {
            if filter.matches_event(event) {
                callback(event);
            }
        })
    }
}
