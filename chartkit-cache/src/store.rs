//! The chart binding store.
//!
//! Thread-safe, permanent storage mapping fully-qualified store keys
//! (`"{cache_key_prefix}.{chart_name}"`) to chart bindings. Used by the
//! registrar at boot and by the shared chart controller on every request.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use chartkit_core::Chart;

/// The value stored per chart name.
///
/// Pairs the registered type identifier with the constructed instance, so a
/// request can be resolved back to its implementing chart without any
/// dynamic lookup by name.
#[derive(Clone)]
pub struct ChartBinding {
    /// Full type identifier of the chart (`std::any::type_name` form).
    pub chart_type: String,
    /// The chart instance constructed at registration time.
    pub chart: Arc<dyn Chart>,
}

impl ChartBinding {
    /// Creates a binding from a type identifier and an instance.
    pub fn new(chart_type: impl Into<String>, chart: Arc<dyn Chart>) -> Self {
        Self {
            chart_type: chart_type.into(),
            chart,
        }
    }
}

impl std::fmt::Debug for ChartBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartBinding")
            .field("chart_type", &self.chart_type)
            .finish()
    }
}

/// Store statistics.
#[derive(Clone, Debug, Default)]
pub struct StoreStats {
    /// Entries written by `remember_forever`.
    pub writes: u64,
    /// `remember_forever` calls that found an existing entry and kept it.
    pub replays: u64,
    /// Successful lookups.
    pub hits: u64,
    /// Failed lookups.
    pub misses: u64,
}

/// Permanent chart binding store.
///
/// Entries have no TTL: once remembered, a binding stays until it is
/// explicitly forgotten or the store is cleared. `remember_forever` never
/// overwrites an existing entry, so replaying a registration leaves the
/// original binding in place.
///
/// # Thread Safety
///
/// All operations are thread-safe; registration writes at boot and request
/// lookups can proceed without external synchronization.
#[derive(Debug)]
pub struct ChartStore {
    entries: DashMap<String, ChartBinding>,
    stats: RwLock<StoreStats>,
}

impl ChartStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: RwLock::new(StoreStats::default()),
        }
    }

    /// Creates a store with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity),
            stats: RwLock::new(StoreStats::default()),
        }
    }

    /// Stores the binding produced by `make` under `key`, permanently.
    ///
    /// If an entry already exists it is kept untouched and returned; `make`
    /// is not invoked. Returns the stored binding either way.
    pub fn remember_forever<F>(&self, key: &str, make: F) -> ChartBinding
    where
        F: FnOnce() -> ChartBinding,
    {
        use dashmap::mapref::entry::Entry;

        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(existing) => {
                self.stats.write().replays += 1;
                debug!(key, "chart binding already stored, keeping existing");
                existing.get().clone()
            }
            Entry::Vacant(slot) => {
                let binding = make();
                debug!(key, chart_type = %binding.chart_type, "storing chart binding");
                self.stats.write().writes += 1;
                slot.insert(binding).clone()
            }
        }
    }

    /// Looks up a binding by its full store key.
    pub fn get(&self, key: &str) -> Option<ChartBinding> {
        let found = self.entries.get(key).map(|entry| entry.clone());
        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        found
    }

    /// Returns true if a binding exists under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes the binding under `key`. Returns true if one existed.
    pub fn forget(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes all bindings and resets statistics.
    pub fn clear(&self) {
        self.entries.clear();
        *self.stats.write() = StoreStats::default();
    }

    /// Returns the number of stored bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all store keys.
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Returns the current statistics.
    pub fn stats(&self) -> StoreStats {
        self.stats.read().clone()
    }
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::new()
    }
}
