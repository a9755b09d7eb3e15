//! UI Components
//!
//! Leptos components for the three tabs, their dialogs and the toasts.

mod tab_bar;
mod sphere_badge;
mod sphere_grid;
mod sphere_dialog;
mod checklist_list;
mod checklist_dialog;
mod checklist_detail;
mod task_row;
mod task_dialog;
mod task_overview;
mod load_status;
mod toast_stack;

pub use tab_bar::TabBar;
pub use sphere_badge::{icon_glyph, SphereBadge};
pub use sphere_grid::SphereGrid;
pub use sphere_dialog::SphereDialog;
pub use checklist_list::ChecklistList;
pub use checklist_dialog::ChecklistDialog;
pub use checklist_detail::ChecklistDetailView;
pub use task_row::TaskRow;
pub use task_dialog::TaskDialog;
pub use task_overview::TaskOverview;
pub use load_status::LoadStatus;
pub use toast_stack::ToastStack;
