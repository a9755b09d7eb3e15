//! Domain Layer
//!
//! Client-side copies of the three remote collections and the drafts the
//! forms build. Nothing here talks to the network.

mod entity;
mod sphere;
mod checklist;
mod task;
pub mod timestamp;

pub use entity::{find_by_id, Entity};
pub use sphere::{Sphere, SphereDraft, COLOR_OPTIONS, DEFAULT_COLOR, DEFAULT_ICON, ICON_OPTIONS};
pub use checklist::{Checklist, ChecklistDetail, ChecklistDraft};
pub use task::{Priority, Task, TaskDraft};
