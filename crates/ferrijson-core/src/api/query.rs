//! Chainable query builder over a mutable record set.
//!
//! A [`QueryBuilder`] borrows its backing records for its whole lifetime and
//! keeps a working set of indices into them. Each `filter` call narrows the
//! working set; it never grows. `update` and `delete` mutate the backing
//! records in place and then ask the record set to synchronize (a [`Store`]
//! persists to disk, a plain `Vec<Value>` does nothing).
//!
//! [`Store`]: super::Store

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::condition::{Condition, ConditionCache, Predicate};
use crate::error::Result;

use super::update::apply_patch;

/// A mutable, ordered collection of records a query builder can work on.
pub trait RecordSet {
    fn records(&self) -> &[Value];

    fn records_mut(&mut self) -> &mut Vec<Value>;

    /// Called after every mutating terminal operation.
    fn sync(&mut self) -> Result<()>;
}

/// A detached record set: mutations stay in memory.
impl RecordSet for Vec<Value> {
    fn records(&self) -> &[Value] {
        self
    }

    fn records_mut(&mut self) -> &mut Vec<Value> {
        self
    }

    fn sync(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Builder for filtering, reading, updating and deleting records.
pub struct QueryBuilder<'a, R: RecordSet> {
    backing: &'a mut R,
    cache: Arc<ConditionCache>,
    /// Indices into `backing`, ascending.
    working: Vec<usize>,
    applied: Vec<Arc<Condition>>,
}

impl<'a, R: RecordSet> QueryBuilder<'a, R> {
    /// Start an unfiltered query that parses through the process-wide cache.
    pub fn new(backing: &'a mut R) -> Self {
        Self::with_cache(backing, ConditionCache::shared())
    }

    /// Start an unfiltered query that parses through `cache`.
    pub fn with_cache(backing: &'a mut R, cache: Arc<ConditionCache>) -> Self {
        let working = (0..backing.records().len()).collect();
        Self {
            backing,
            cache,
            working,
            applied: Vec::new(),
        }
    }

    /// Narrow the working set to records matching `predicate`.
    ///
    /// An unparseable condition string leaves the working set unchanged and
    /// is not recorded.
    pub fn filter<'p>(mut self, predicate: impl Into<Predicate<'p>>) -> Self {
        let records = self.backing.records();
        match predicate.into() {
            Predicate::Condition(raw) => {
                let Some(condition) = self.cache.parse(raw) else {
                    debug!(condition = raw, "unparseable condition ignored");
                    return self;
                };
                self.working.retain(|&i| condition.matches(&records[i]));
                self.applied.push(condition);
            }
            Predicate::Func(f) => {
                self.working.retain(|&i| f(&records[i]));
            }
        }
        self
    }

    /// Narrow the working set with a closure over the raw record.
    pub fn filter_fn(self, f: impl Fn(&Value) -> bool) -> Self {
        self.filter(Predicate::func(f))
    }

    /// Conditions applied so far, in order.
    pub fn applied_conditions(&self) -> &[Arc<Condition>] {
        &self.applied
    }

    /// All records in the working set, in backing order.
    pub fn get(&self) -> Vec<&Value> {
        let records = self.backing.records();
        self.working.iter().map(|&i| &records[i]).collect()
    }

    /// The first record in the working set.
    pub fn first(&self) -> Option<&Value> {
        self.working.first().map(|&i| &self.backing.records()[i])
    }

    pub fn count(&self) -> usize {
        self.working.len()
    }

    /// Apply `patch` to every record in the working set, then synchronize.
    ///
    /// Returns the number of records patched. The in-memory change is kept
    /// even when synchronization fails.
    pub fn update(&mut self, patch: &Value) -> Result<usize> {
        let records = self.backing.records_mut();
        for &i in &self.working {
            apply_patch(&mut records[i], patch);
        }
        debug!(records = self.working.len(), "updated working set");
        self.backing.sync()?;
        Ok(self.working.len())
    }

    /// Remove every record in the working set from the backing records,
    /// empty the working set, then synchronize.
    ///
    /// Returns the number of records removed.
    pub fn delete(&mut self) -> Result<usize> {
        let removed = self.working.len();
        let doomed: HashSet<usize> = self.working.drain(..).collect();

        // Descending removal keeps not-yet-visited indices stable.
        let records = self.backing.records_mut();
        for i in (0..records.len()).rev() {
            if doomed.contains(&i) {
                records.remove(i);
            }
        }

        debug!(records = removed, "deleted working set");
        self.backing.sync()?;
        Ok(removed)
    }
}
