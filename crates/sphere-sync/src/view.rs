//! View State
//!
//! The presentation layer's explicit state: active tab, the currently viewed
//! checklist, one slot per dialog and the notification queue. It is owned by
//! the UI and handed to the synchronizer through [`ViewHandle`].

use std::cell::RefCell;

use crate::domain::{Checklist, ChecklistDetail, ChecklistDraft, Sphere, SphereDraft, Task, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Spheres,
    Checklists,
    Tasks,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Spheres, Tab::Checklists, Tab::Tasks];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Spheres => "Spheres",
            Tab::Checklists => "Checklists",
            Tab::Tasks => "Tasks",
        }
    }
}

/// The "currently viewed checklist" slot
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailSlot {
    #[default]
    Empty,
    Loading(u32),
    Viewing(ChecklistDetail),
}

impl DetailSlot {
    /// ID of the checklist being loaded or shown
    pub fn checklist_id(&self) -> Option<u32> {
        match self {
            DetailSlot::Empty => None,
            DetailSlot::Loading(id) => Some(*id),
            DetailSlot::Viewing(detail) => Some(detail.id()),
        }
    }

    pub fn detail(&self) -> Option<&ChecklistDetail> {
        match self {
            DetailSlot::Viewing(detail) => Some(detail),
            _ => None,
        }
    }
}

/// An open form dialog. `editing` is `None` when creating.
#[derive(Debug, Clone, PartialEq)]
pub struct Dialog<D> {
    pub editing: Option<u32>,
    pub draft: D,
    pub submitting: bool,
}

impl<D> Dialog<D> {
    fn create(draft: D) -> Self {
        Self { editing: None, draft, submitting: false }
    }

    fn edit(id: u32, draft: D) -> Self {
        Self { editing: Some(id), draft, submitting: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub tab: Tab,
    pub detail: DetailSlot,
    pub sphere_dialog: Option<Dialog<SphereDraft>>,
    pub checklist_dialog: Option<Dialog<ChecklistDraft>>,
    pub task_dialog: Option<Dialog<TaskDraft>>,
    pub notifications: Vec<Notification>,
    last_notification: u64,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn viewed_checklist(&self) -> Option<&ChecklistDetail> {
        self.detail.detail()
    }

    /// Back-navigation from the checklist detail
    pub fn close_detail(&mut self) {
        self.detail = DetailSlot::Empty;
        self.task_dialog = None;
    }

    // ---- dialogs ----

    pub fn open_sphere_create(&mut self) {
        self.sphere_dialog = Some(Dialog::create(SphereDraft::default()));
    }

    pub fn open_sphere_edit(&mut self, sphere: &Sphere) {
        self.sphere_dialog = Some(Dialog::edit(sphere.id, SphereDraft::from_sphere(sphere)));
    }

    pub fn open_checklist_create(&mut self, sphere_id: Option<u32>) {
        self.checklist_dialog = Some(Dialog::create(ChecklistDraft {
            sphere_id,
            ..Default::default()
        }));
    }

    pub fn open_checklist_edit(&mut self, checklist: &Checklist) {
        self.checklist_dialog = Some(Dialog::edit(checklist.id, ChecklistDraft::from_checklist(checklist)));
    }

    pub fn open_task_create(&mut self) {
        self.task_dialog = Some(Dialog::create(TaskDraft::default()));
    }

    pub fn open_task_edit(&mut self, task: &Task) {
        self.task_dialog = Some(Dialog::edit(task.id, TaskDraft::from_task(task)));
    }

    // ---- notifications ----

    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> u64 {
        self.last_notification += 1;
        self.notifications.push(Notification {
            id: self.last_notification,
            kind,
            message: message.into(),
        });
        self.last_notification
    }

    pub fn notify_success(&mut self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Success, message)
    }

    pub fn notify_error(&mut self, message: impl Into<String>) -> u64 {
        self.notify(NotificationKind::Error, message)
    }

    pub fn dismiss(&mut self, id: u64) {
        self.notifications.retain(|n| n.id != id);
    }

    pub fn last_error(&self) -> Option<&Notification> {
        self.notifications
            .iter()
            .rev()
            .find(|n| n.kind == NotificationKind::Error)
    }
}

/// Access to the presentation layer's [`ViewState`].
///
/// The synchronizer never keeps the state borrowed across an `.await`;
/// each closure runs to completion.
pub trait ViewHandle {
    fn read_view<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R;
    fn update_view<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R;
}

impl ViewHandle for RefCell<ViewState> {
    fn read_view<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        f(&self.borrow())
    }

    fn update_view<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}
