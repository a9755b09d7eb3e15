//! Global Application State Store
//!
//! Mirrors the synchronizer's query cache into a reactive store so the
//! components re-render when a collection changes state.

use leptos::prelude::*;
use reactive_stores::Store;
use sphere_sync::{
    CacheKey, Checklist, ChecklistsKey, LoadState, QueryCache, Sphere, SpheresKey, Task, TasksKey,
};

/// Cached collections with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub spheres: LoadState<Vec<Sphere>>,
    pub checklists: LoadState<Vec<Checklist>>,
    pub tasks: LoadState<Vec<Task>>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

/// Copy one cache entry into the store
pub fn store_sync_key(store: &AppStore, key: CacheKey, cache: &QueryCache) {
    match key {
        CacheKey::Spheres => *store.spheres().write() = cache.get::<SpheresKey>().clone(),
        CacheKey::Checklists => *store.checklists().write() = cache.get::<ChecklistsKey>().clone(),
        CacheKey::Tasks => *store.tasks().write() = cache.get::<TasksKey>().clone(),
    }
}

/// Spheres currently known, fresh or stale
pub fn known_spheres(store: &AppStore) -> Vec<Sphere> {
    store.spheres().with(|s| s.value().cloned().unwrap_or_default())
}
