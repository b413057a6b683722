//! Gain memoization cache
//!
//! Several independent surfaces (build config, specs comparison, dyno
//! view, track estimator, shared builds) must display identical numbers
//! for the same build, and "recompute on every selection toggle" UIs call
//! in constantly. A small bounded cache in front of the aggregator keeps
//! that cheap without any surface keeping its own copy of the math.
//!
//! Eviction policy: least-recently-used, evicted when an insert pushes the
//! cache past its fixed capacity. Never unbounded.

use std::collections::{HashMap, VecDeque};

use crate::catalog::{CatalogVersion, ModId};
use crate::gains::GainResult;
use crate::vehicle::VehicleId;

/// Default bound; a few hundred results covers a comparison page many
/// times over
pub const DEFAULT_GAIN_CACHE_CAPACITY: usize = 256;

/// Cache key: the full set of inputs a `GainResult` is a function of.
/// Mod ids are stored sorted so selection order (which cannot change
/// totals for a conflict-free set) does not fragment the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GainCacheKey {
    pub vehicle: VehicleId,
    pub catalog: CatalogVersion,
    pub mods: Vec<ModId>,
}

impl GainCacheKey {
    pub fn new(vehicle: VehicleId, catalog: CatalogVersion, mut mods: Vec<ModId>) -> Self {
        mods.sort();
        Self {
            vehicle,
            catalog,
            mods,
        }
    }
}

/// Bounded LRU cache for aggregation results
#[derive(Debug)]
pub struct GainCache {
    capacity: usize,
    entries: HashMap<GainCacheKey, GainResult>,
    /// Recency order, least-recent at the front
    recency: VecDeque<GainCacheKey>,
}

impl Default for GainCache {
    fn default() -> Self {
        Self::new(DEFAULT_GAIN_CACHE_CAPACITY)
    }
}

impl GainCache {
    /// Create a cache with an explicit bound (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a result, refreshing its recency on hit
    pub fn get(&mut self, key: &GainCacheKey) -> Option<GainResult> {
        let result = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(result)
    }

    /// Insert or replace a result, evicting the least-recently-used entry
    /// if the bound is exceeded
    pub fn insert(&mut self, key: GainCacheKey, result: GainResult) {
        if self.entries.insert(key.clone(), result).is_some() {
            self.touch(&key);
            return;
        }
        self.recency.push_back(key);
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                tracing::debug!(vehicle = %oldest.vehicle, "evicting least-recently-used gain result");
                self.entries.remove(&oldest);
            } else {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn touch(&mut self, key: &GainCacheKey) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}
