//! Sphere Sync
//!
//! Client-side synchronization for the life spheres task organizer.
//!
//! Layered architecture:
//! - domain: spheres, checklists, tasks and the drafts forms build
//! - transport: the wire (HTTP or in-memory) behind one async trait
//! - api: typed calls per endpoint
//! - cache: keyed query cache with invalidation and fetch tickets
//! - view: the presentation layer's explicit state
//! - sync: load / mutate / invalidate-and-refetch flow

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod sync;
pub mod transport;
pub mod view;

pub use api::ApiClient;
pub use cache::{CacheKey, ChecklistsKey, LoadState, QueryCache, QueryKey, SpheresKey, TasksKey};
pub use config::{ApiConfig, TransportMode};
pub use domain::{
    Checklist, ChecklistDetail, ChecklistDraft, Entity, Priority, Sphere, SphereDraft, Task, TaskDraft,
};
pub use error::{SyncError, SyncResult};
pub use sync::{Confirm, DeleteOutcome, Synchronizer};
pub use transport::{ApiRequest, HttpTransport, MemoryTransport, Method, Resource, Transport};
pub use view::{DetailSlot, Dialog, Notification, NotificationKind, Tab, ViewHandle, ViewState};
