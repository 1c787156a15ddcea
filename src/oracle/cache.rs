use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::error::OracleError;
use crate::models::Distance;

type LegResult = Result<Distance, OracleError>;

/// Single-flight memo: the first caller for a key runs the computation, concurrent
/// callers for the same key wait on the same cell and share its value
pub(crate) struct SingleFlight<K, V> {
    cells: Mutex<HashMap<K, Arc<OnceLock<V>>>>,
    computed: AtomicUsize,
}

impl<K: Eq + Hash, V: Clone> SingleFlight<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
            computed: AtomicUsize::new(0),
        }
    }

    pub(crate) fn get_or_compute<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        let cell = {
            // the map only ever holds complete cells, a poisoned lock is still usable
            let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(cells.entry(key).or_default())
        };

        cell.get_or_init(|| {
            self.computed.fetch_add(1, Ordering::Relaxed);
            compute()
        })
        .clone()
    }

    /// Drops a remembered value so the next caller computes it again
    pub(crate) fn forget(&self, key: &K) {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    pub(crate) fn computed(&self) -> usize {
        self.computed.load(Ordering::Relaxed)
    }

    pub(crate) fn len(&self) -> usize {
        self.cells
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// Memo of leg costs keyed on the ordered `(origin, destination)` pair
///
/// The first caller to need a leg runs the query; concurrent callers for the same
/// leg share its result, failures included. A cache is meant to live for one
/// optimization request only.
pub struct LegCache<L> {
    legs: SingleFlight<(L, L), LegResult>,
}

impl<L: Clone + Eq + Hash> LegCache<L> {
    pub fn new() -> Self {
        Self {
            legs: SingleFlight::new(),
        }
    }

    /// Returns the cached cost of the leg, running `query` if nobody has yet
    pub fn get_or_query<F>(&self, origin: &L, destination: &L, query: F) -> LegResult
    where
        F: FnOnce() -> LegResult,
    {
        self.legs
            .get_or_compute((origin.clone(), destination.clone()), query)
    }

    /// Number of oracle queries issued through this cache
    pub fn queries(&self) -> usize {
        self.legs.computed()
    }

    /// Number of distinct legs requested so far
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<L: Clone + Eq + Hash> Default for LegCache<L> {
    fn default() -> Self {
        Self::new()
    }
}
