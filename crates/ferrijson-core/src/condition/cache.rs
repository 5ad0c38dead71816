//! Memoized condition parsing.
//!
//! A [`ConditionCache`] maps a raw condition string to its parse result,
//! including failed parses. Entries are never evicted, so memory grows with
//! the number of distinct condition strings seen during the cache's
//! lifetime.
//!
//! One instance lives for the whole process and is shared by every store
//! that is not given its own ([`ConditionCache::shared`]).

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use tracing::trace;

use super::{Condition, parse_condition};

static SHARED: LazyLock<Arc<ConditionCache>> = LazyLock::new(|| Arc::new(ConditionCache::new()));

/// Raw condition string → parsed condition (or `None` when unparseable).
#[derive(Debug, Default)]
pub struct ConditionCache {
    entries: Mutex<HashMap<String, Option<Arc<Condition>>>>,
}

impl ConditionCache {
    /// Create an empty, private cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first use.
    pub fn shared() -> Arc<ConditionCache> {
        Arc::clone(&SHARED)
    }

    /// Parse `raw`, returning the cached result when one exists.
    ///
    /// Repeated calls with the same string return the same `Arc`.
    pub fn parse(&self, raw: &str) -> Option<Arc<Condition>> {
        let mut entries = self.entries.lock();
        if let Some(hit) = entries.get(raw) {
            return hit.clone();
        }

        let parsed = parse_condition(raw).map(Arc::new);
        trace!(condition = raw, parsed = parsed.is_some(), "condition cache miss");
        entries.insert(raw.to_string(), parsed.clone());
        parsed
    }

    /// Whether `raw` has been parsed through this cache.
    pub fn contains(&self, raw: &str) -> bool {
        self.entries.lock().contains_key(raw)
    }

    /// Number of cached entries, including cached parse failures.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
