//! Concurrent cache of resolved strategies
//!
//! Each key owns a `OnceCell`. A caller first clones the cell out of the map,
//! releasing the shard lock, then initializes it. Callers racing on the same
//! key block on that cell only, so exactly one computation runs per key while
//! other keys proceed independently. A failed computation leaves the cell
//! empty and the next caller retries.
//!
//! Every slot records the cache generation it was created in.
//! `invalidate_all` bumps the generation before clearing, and a result that
//! finishes under an older generation is handed to its caller but never left
//! installed.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};

use super::key::MappingStrategyKey;
use super::mapping_strategy::MappingStrategy;
use crate::error::Result;

#[derive(Debug)]
struct Entry {
    generation: u64,
    strategy:   OnceCell<Arc<MappingStrategy>>,
}

type Slot = Arc<Entry>;

/// Resolved strategies by key
#[derive(Debug, Default)]
pub struct StrategyCache {
    entries:    DashMap<MappingStrategyKey, Slot>,
    generation: AtomicU64,
}

impl StrategyCache {
    /// Empty cache
    pub fn new() -> Self { Self::default() }

    /// The cached strategy for `key`, computing it on first request
    ///
    /// `compute` runs at most once per key between invalidations, no matter
    /// how many threads ask concurrently.
    pub fn resolve_or_compute<F>(&self, key: &MappingStrategyKey, compute: F) -> Result<Arc<MappingStrategy>>
    where
        F: FnOnce(&MappingStrategyKey) -> Result<MappingStrategy>,
    {
        let slot = self.slot(key);
        if let Some(strategy) = slot.strategy.get() {
            trace!(key = %key, "Strategy cache hit");
            return Ok(Arc::clone(strategy));
        }

        let strategy = slot
            .strategy
            .get_or_try_init(|| {
                compute(key).map(|strategy| {
                    debug!(key = %key, strategy = strategy.kind().name(), "Resolved strategy");
                    Arc::new(strategy)
                })
            })
            .map(Arc::clone)?;

        if slot.generation != self.generation() {
            // invalidated while computing
            self.entries
                .remove_if(key, |_, current| Arc::ptr_eq(current, &slot));
            debug!(key = %key, "Discarded strategy resolved before invalidation");
        }
        Ok(strategy)
    }

    /// The strategy for `key` if one is resolved
    pub fn get(&self, key: &MappingStrategyKey) -> Option<Arc<MappingStrategy>> {
        self.entries
            .get(key)
            .and_then(|slot| slot.value().strategy.get().map(Arc::clone))
    }

    /// Drop every entry
    ///
    /// Computations already running finish into their detached cells and are
    /// never installed here.
    pub fn invalidate_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let dropped = self.entries.len();
        self.entries.clear();
        debug!(dropped, "Invalidated strategy cache");
    }

    /// Number of keys with a resolved strategy
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().strategy.get().is_some())
            .count()
    }

    /// True if no strategy is resolved
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Times the cache has been invalidated
    pub fn generation(&self) -> u64 { self.generation.load(Ordering::SeqCst) }

    fn slot(&self, key: &MappingStrategyKey) -> Slot {
        if let Some(slot) = self.entries.get(key) {
            return Arc::clone(slot.value());
        }
        let slot = self.entries.entry(key.clone()).or_insert_with(|| {
            Arc::new(Entry {
                generation: self.generation(),
                strategy:   OnceCell::new(),
            })
        });
        Arc::clone(slot.value())
    }
}
