//! Memoization with at-most-once computation per key.
//!
//! [`OnceMap`] is the building block: every key owns a [`OnceCell`], so
//! concurrent requests for the same key block on the first computation and
//! share its result. Failed computations leave the cell empty and are not
//! cached. A thread re-entering a key it is still computing gets
//! [`ResolveError::Cycle`] instead of a deadlock.
//!
//! [`DescriptorCache`] is the session-wide `QualifiedName → UniverseMap`
//! cache of the namespace resolver.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::base::QualifiedName;

use super::descriptors::UniverseMap;
use super::error::{ResolveError, ResolveResult};

/// A concurrent map whose values are computed at most once per key.
pub struct OnceMap<K, V> {
    cells: Mutex<FxHashMap<K, Arc<OnceCell<V>>>>,
    in_flight: Mutex<FxHashSet<(ThreadId, K)>>,
}

impl<K, V> Default for OnceMap<K, V> {
    fn default() -> Self {
        Self {
            cells: Mutex::new(FxHashMap::default()),
            in_flight: Mutex::new(FxHashSet::default()),
        }
    }
}

impl<K, V> OnceMap<K, V>
where
    K: Clone + Eq + Hash + fmt::Display,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// The computed value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        let cell = self.cells.lock().get(key).cloned()?;
        cell.get().cloned()
    }

    /// Return the value for `key`, computing it with `init` on a miss.
    pub fn get_or_try_init(
        &self,
        key: &K,
        init: impl FnOnce() -> ResolveResult<V>,
    ) -> ResolveResult<V> {
        let cell = self.cell(key);
        if let Some(value) = cell.get() {
            return Ok(value.clone());
        }

        let _guard = InFlight::enter(&self.in_flight, key)?;
        cell.get_or_try_init(init).cloned()
    }

    /// Publish a value for `key`.
    ///
    /// If the key already holds a value, `same` decides whether the two agree;
    /// a disagreement is returned as `Err(existing)`.
    pub fn insert(&self, key: &K, value: V, same: impl FnOnce(&V, &V) -> bool) -> Result<(), V> {
        let cell = self.cell(key);
        match cell.try_insert(value) {
            Ok(_) => Ok(()),
            Err((existing, value)) if same(existing, &value) => Ok(()),
            Err((existing, _)) => Err(existing.clone()),
        }
    }

    /// Drop every entry whose key matches `predicate`. Returns how many were dropped.
    pub fn remove_where(&self, mut predicate: impl FnMut(&K) -> bool) -> usize {
        let mut cells = self.cells.lock();
        let before = cells.len();
        cells.retain(|key, _| !predicate(key));
        before - cells.len()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.cells.lock().clear();
    }

    /// Number of keys with a computed value.
    pub fn len(&self) -> usize {
        self.cells.lock().values().filter(|cell| cell.get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn cell(&self, key: &K) -> Arc<OnceCell<V>> {
        self.cells.lock().entry(key.clone()).or_default().clone()
    }
}

impl<K, V> fmt::Debug for OnceMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OnceMap")
            .field("keys", &self.cells.lock().len())
            .finish()
    }
}

/// Marks `(current thread, key)` as being computed until dropped.
struct InFlight<'a, K: Eq + Hash> {
    set: &'a Mutex<FxHashSet<(ThreadId, K)>>,
    entry: Option<(ThreadId, K)>,
}

impl<'a, K: Clone + Eq + Hash + fmt::Display> InFlight<'a, K> {
    fn enter(set: &'a Mutex<FxHashSet<(ThreadId, K)>>, key: &K) -> ResolveResult<Self> {
        let entry = (thread::current().id(), key.clone());
        if !set.lock().insert(entry.clone()) {
            return Err(ResolveError::Cycle(key.to_string()));
        }
        Ok(Self {
            set,
            entry: Some(entry),
        })
    }
}

impl<K: Eq + Hash> Drop for InFlight<'_, K> {
    fn drop(&mut self) {
        if let Some(entry) = self.entry.take() {
            self.set.lock().remove(&entry);
        }
    }
}

/// Session-wide cache of namespace resolution results.
///
/// A stored map may be empty: that records "confirmed unresolved in every
/// universe" so the collaborators are not probed again for the same name.
#[derive(Debug, Default)]
pub struct DescriptorCache {
    entries: OnceMap<QualifiedName, UniverseMap>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached result for `name`, if resolved before.
    pub fn lookup(&self, name: &QualifiedName) -> Option<UniverseMap> {
        let hit = self.entries.get(name);
        if hit.is_some() {
            tracing::trace!("[DESCRIPTOR_CACHE] hit {}", name);
        }
        hit
    }

    /// Publish a result computed outside the resolver, e.g. by a driver
    /// seeding the cache before a pass.
    ///
    /// The resolver itself publishes through [`get_or_resolve`](Self::get_or_resolve),
    /// which cannot disagree with itself. Storing a result that disagrees with
    /// an already published one (a different descriptor instance for some
    /// universe) is an invariant violation.
    pub fn store(&self, name: &QualifiedName, result: UniverseMap) -> ResolveResult<()> {
        let mut conflict = None;
        let stored = self.entries.insert(name, result, |existing, new| {
            conflict = first_difference(existing, new);
            conflict.is_none()
        });
        match stored {
            Ok(()) => Ok(()),
            Err(_) => Err(ResolveError::CacheConflict {
                name: name.clone(),
                universe: conflict.unwrap_or_default(),
            }),
        }
    }

    /// Return the cached result for `name`, computing it at most once.
    pub fn get_or_resolve(
        &self,
        name: &QualifiedName,
        resolve: impl FnOnce() -> ResolveResult<UniverseMap>,
    ) -> ResolveResult<UniverseMap> {
        self.entries.get_or_try_init(name, || {
            tracing::trace!("[DESCRIPTOR_CACHE] miss {}", name);
            resolve()
        })
    }

    /// Drop `name` and every name below it. Returns how many entries were dropped.
    pub fn invalidate(&self, name: &QualifiedName) -> usize {
        self.entries.remove_where(|key| key.starts_with(name))
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The first universe whose descriptor differs between two maps.
fn first_difference(existing: &UniverseMap, new: &UniverseMap) -> Option<smol_str::SmolStr> {
    for (universe, descriptor) in existing.iter().chain(new.iter()) {
        let same = match (existing.get(universe), new.get(universe)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        if !same {
            tracing::trace!("[DESCRIPTOR_CACHE] conflict at {}", descriptor.fq_name());
            return Some(universe.name().as_str().into());
        }
    }
    None
}
