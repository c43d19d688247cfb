use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, Mutex};

use crate::http::request::Request;
use crate::http::writer::ResponseWriter;

/// A registered request handler.
///
/// Handlers build their response through the writer; the dispatch engine
/// sends it when the handler returns `Ok`. An `Err` is the recoverable
/// failure path: the accumulated body is discarded and a 500 page carrying
/// the error text goes out instead.
pub type RequestHandler =
    Arc<dyn Fn(&Request, &mut ResponseWriter) -> anyhow::Result<()> + Send + Sync>;

/// Strips one trailing '/' for storage and comparison.
pub fn strip_trailing_slash(resource: &str) -> &str {
    resource.strip_suffix('/').unwrap_or(resource)
}

/// Mutable mapping from resource prefix to handler, with longest-prefix
/// lookup.
///
/// Keys are stored without their trailing slash; the empty key is legal
/// and matches every resource as a last-resort catch-all. The registry may
/// be mutated by admin calls while dispatch is running; the lock is held
/// only for the map operation and the handler is cloned out before it is
/// released, so handlers never run under the lock.
pub struct ResourceRegistry {
    resources: Mutex<BTreeMap<String, RequestHandler>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self {
            resources: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn add(&self, resource: &str, handler: RequestHandler) {
        let clean = strip_trailing_slash(resource).to_string();
        self.lock().insert(clean.clone(), handler);
        tracing::info!(resource = %clean, "added request handler");
    }

    pub fn remove(&self, resource: &str) {
        let clean = strip_trailing_slash(resource);
        self.lock().remove(clean);
        tracing::info!(resource = %clean, "removed request handler");
    }

    /// Longest-prefix match with path-segment boundaries.
    ///
    /// Walks the sorted key set downwards from the greatest key not above
    /// the query. A key matches when it is empty, equals the resource, or
    /// is followed by '/' in the resource; the first acceptance is the
    /// longest such prefix.
    pub fn find(&self, resource: &str) -> Option<RequestHandler> {
        let resource = strip_trailing_slash(resource);
        let map = self.lock();
        for (key, handler) in map
            .range::<str, _>((Bound::Unbounded, Bound::Included(resource)))
            .rev()
        {
            if key.is_empty()
                || (resource.starts_with(key.as_str())
                    && (resource.len() == key.len()
                        || resource.as_bytes()[key.len()] == b'/'))
            {
                return Some(handler.clone());
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, RequestHandler>> {
        self.resources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
