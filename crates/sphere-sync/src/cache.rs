//! Query Cache
//!
//! Read-through cache of the three collections, addressed by a logical key.
//! Each entry moves `Unloaded -> Loading -> Ready | Failed` and back to
//! `Loading` when it is invalidated and refetched.
//!
//! Fetches are ticketed per key. A response is applied only if no newer
//! ticket has already been applied, so a slow stale response cannot
//! overwrite a fresher one.

use crate::domain::{Checklist, Sphere, Task};
use crate::error::SyncResult;

/// Logical cache keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Spheres,
    Checklists,
    Tasks,
}

impl CacheKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Spheres => "spheres",
            CacheKey::Checklists => "checklists",
            CacheKey::Tasks => "tasks",
        }
    }
}

/// What the UI renders for a cached collection
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Unloaded,
    /// A fetch is in flight; `stale` is the last value, if any
    Loading { stale: Option<T> },
    Ready(T),
    Failed { message: String, stale: Option<T> },
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Unloaded
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    /// Best value to show: the fresh one, else the stale one
    pub fn value(&self) -> Option<&T> {
        match self {
            LoadState::Ready(value) => Some(value),
            LoadState::Loading { stale } | LoadState::Failed { stale, .. } => stale.as_ref(),
            LoadState::Unloaded => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    fn take_value(&mut self) -> Option<T> {
        match std::mem::take(self) {
            LoadState::Ready(value) => Some(value),
            LoadState::Loading { stale } | LoadState::Failed { stale, .. } => stale,
            LoadState::Unloaded => None,
        }
    }
}

/// One cached collection
#[derive(Debug)]
pub struct Query<T> {
    state: LoadState<T>,
    /// Last ticket handed out
    issued: u64,
    /// Ticket of the response currently reflected in `state`
    applied: u64,
    /// Responses to tickets up to this one predate the last invalidation
    stale_through: u64,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Unloaded,
            issued: 0,
            applied: 0,
            stale_through: 0,
        }
    }
}

impl<T> Query<T> {
    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Ready and not invalidated since the fetch that produced it began
    pub fn is_fresh(&self) -> bool {
        self.state.is_ready() && self.applied > self.stale_through
    }

    /// A fetch is in flight and nothing was invalidated since it began
    pub fn is_pending(&self) -> bool {
        self.state.is_loading() && self.issued > self.stale_through
    }

    /// Something has asked for this key before
    pub fn is_observed(&self) -> bool {
        !matches!(self.state, LoadState::Unloaded)
    }

    pub fn invalidate(&mut self) {
        self.stale_through = self.issued;
    }

    fn begin(&mut self) -> u64 {
        self.issued += 1;
        let stale = self.state.take_value();
        self.state = LoadState::Loading { stale };
        self.issued
    }

    fn complete(&mut self, ticket: u64, result: SyncResult<T>) -> bool {
        if ticket < self.applied {
            return false;
        }
        self.applied = ticket;
        self.state = match result {
            Ok(value) => LoadState::Ready(value),
            Err(err) => LoadState::Failed {
                message: err.to_string(),
                stale: self.state.take_value(),
            },
        };
        true
    }
}

/// Cache of the three collections
#[derive(Debug, Default)]
pub struct QueryCache {
    spheres: Query<Vec<Sphere>>,
    checklists: Query<Vec<Checklist>>,
    tasks: Query<Vec<Task>>,
}

/// Typed handle on one cache key
pub trait QueryKey {
    type Value: Clone;
    const KEY: CacheKey;

    fn query(cache: &QueryCache) -> &Query<Self::Value>;
    fn query_mut(cache: &mut QueryCache) -> &mut Query<Self::Value>;
}

pub struct SpheresKey;
pub struct ChecklistsKey;
pub struct TasksKey;

impl QueryKey for SpheresKey {
    type Value = Vec<Sphere>;
    const KEY: CacheKey = CacheKey::Spheres;

    fn query(cache: &QueryCache) -> &Query<Self::Value> {
        &cache.spheres
    }

    fn query_mut(cache: &mut QueryCache) -> &mut Query<Self::Value> {
        &mut cache.spheres
    }
}

impl QueryKey for ChecklistsKey {
    type Value = Vec<Checklist>;
    const KEY: CacheKey = CacheKey::Checklists;

    fn query(cache: &QueryCache) -> &Query<Self::Value> {
        &cache.checklists
    }

    fn query_mut(cache: &mut QueryCache) -> &mut Query<Self::Value> {
        &mut cache.checklists
    }
}

impl QueryKey for TasksKey {
    type Value = Vec<Task>;
    const KEY: CacheKey = CacheKey::Tasks;

    fn query(cache: &QueryCache) -> &Query<Self::Value> {
        &cache.tasks
    }

    fn query_mut(cache: &mut QueryCache) -> &mut Query<Self::Value> {
        &mut cache.tasks
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<K: QueryKey>(&self) -> &LoadState<K::Value> {
        K::query(self).state()
    }

    /// Mark a key stale so the next read refetches it
    pub fn invalidate(&mut self, key: CacheKey) {
        match key {
            CacheKey::Spheres => self.spheres.invalidate(),
            CacheKey::Checklists => self.checklists.invalidate(),
            CacheKey::Tasks => self.tasks.invalidate(),
        }
    }

    pub fn is_fresh(&self, key: CacheKey) -> bool {
        match key {
            CacheKey::Spheres => self.spheres.is_fresh(),
            CacheKey::Checklists => self.checklists.is_fresh(),
            CacheKey::Tasks => self.tasks.is_fresh(),
        }
    }

    pub fn is_pending(&self, key: CacheKey) -> bool {
        match key {
            CacheKey::Spheres => self.spheres.is_pending(),
            CacheKey::Checklists => self.checklists.is_pending(),
            CacheKey::Tasks => self.tasks.is_pending(),
        }
    }

    pub fn is_observed(&self, key: CacheKey) -> bool {
        match key {
            CacheKey::Spheres => self.spheres.is_observed(),
            CacheKey::Checklists => self.checklists.is_observed(),
            CacheKey::Tasks => self.tasks.is_observed(),
        }
    }

    /// Start a fetch for `K`; returns its ticket
    pub fn begin<K: QueryKey>(&mut self) -> u64 {
        K::query_mut(self).begin()
    }

    /// Record a fetch result. Returns false when a newer response was already applied.
    pub fn complete<K: QueryKey>(&mut self, ticket: u64, result: SyncResult<K::Value>) -> bool {
        K::query_mut(self).complete(ticket, result)
    }
}
