use std::collections::HashMap;
use std::sync::Mutex;

use crate::server::registry::strip_trailing_slash;

/// Mutable mapping from resource to resource.
///
/// The table only answers single lookups; chain resolution (and its depth
/// bound) belongs to the dispatch engine. Entries may form cycles or long
/// chains.
pub struct RedirectTable {
    redirects: Mutex<HashMap<String, String>>,
}

impl RedirectTable {
    pub fn new() -> Self {
        Self {
            redirects: Mutex::new(HashMap::new()),
        }
    }

    pub fn add(&self, requested: &str, target: &str) {
        let clean_requested = strip_trailing_slash(requested).to_string();
        let clean_target = strip_trailing_slash(target).to_string();
        tracing::info!(
            from = %clean_requested,
            to = %clean_target,
            "added redirection"
        );
        self.lock().insert(clean_requested, clean_target);
    }

    pub fn lookup(&self, resource: &str) -> Option<String> {
        self.lock().get(strip_trailing_slash(resource)).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.redirects
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RedirectTable {
    fn default() -> Self {
        Self::new()
    }
}
