//! Synchronizer
//!
//! Mediates between the view state and the remote collections: loads keys
//! through the query cache, runs mutations, then invalidates and refetches
//! whatever the mutation may have changed. Server responses to mutations are
//! never merged into the cache.

use std::cell::RefCell;
use std::future::Future;

use log::{debug, info, warn};

use crate::api::ApiClient;
use crate::cache::{CacheKey, ChecklistsKey, LoadState, QueryCache, QueryKey, SpheresKey, TasksKey};
use crate::domain::{find_by_id, Checklist, ChecklistDetail, ChecklistDraft, Sphere, SphereDraft, Task, TaskDraft};
use crate::error::{SyncError, SyncResult};
use crate::transport::Resource;
use crate::view::{DetailSlot, ViewHandle};

/// Blocking yes/no prompt shown before anything is deleted
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; nothing was sent
    Declined,
}

/// What happens to the open checklist detail after a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailEffect {
    Keep,
    RefetchIfOpen,
    RefetchIfViewing(u32),
    ClearIfViewing(u32),
}

/// Cache consequences of a successful mutation
struct Effect {
    keys: &'static [CacheKey],
    detail: DetailEffect,
}

const SPHERE_CREATED: &[CacheKey] = &[CacheKey::Spheres];
/// Checklists carry the sphere's name/color/icon; deletes cascade to tasks
const SPHERE_CHANGED: &[CacheKey] = &[CacheKey::Spheres, CacheKey::Checklists, CacheKey::Tasks];
const CHECKLIST_CHANGED: &[CacheKey] = &[CacheKey::Checklists];
const CHECKLIST_DELETED: &[CacheKey] = &[CacheKey::Checklists, CacheKey::Tasks];
/// Checklist summaries carry the task count
const TASK_CHANGED: &[CacheKey] = &[CacheKey::Checklists, CacheKey::Tasks];

type Listener = Box<dyn Fn(CacheKey, &QueryCache)>;

/// Fetch tickets for the checklist detail slot
#[derive(Debug, Default)]
struct DetailTickets {
    issued: u64,
    /// Ticket of the response currently shown in the slot
    applied: u64,
    /// Ticket of the open that put the slot into `Loading`
    loading: u64,
}

impl DetailTickets {
    fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }
}

pub struct Synchronizer {
    api: ApiClient,
    cache: RefCell<QueryCache>,
    detail: RefCell<DetailTickets>,
    listeners: RefCell<Vec<Listener>>,
}

impl Synchronizer {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: RefCell::new(QueryCache::new()),
            detail: RefCell::new(DetailTickets::default()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    /// Call `listener` whenever a cache entry changes state.
    ///
    /// The listener sees the cache while it is borrowed and must not call
    /// back into the synchronizer.
    pub fn subscribe(&self, listener: impl Fn(CacheKey, &QueryCache) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn emit(&self, key: CacheKey) {
        let cache = self.cache.borrow();
        for listener in self.listeners.borrow().iter() {
            listener(key, &cache);
        }
    }

    /// Current state of a key without triggering a fetch
    pub fn snapshot<K: QueryKey>(&self) -> LoadState<K::Value> {
        self.cache.borrow().get::<K>().clone()
    }

    // ========================
    // Loading
    // ========================

    /// Serve a fresh key from cache, leave an in-flight fetch to finish, otherwise fetch it
    pub async fn load<K: QueryKey>(&self) -> LoadState<K::Value> {
        let (fresh, pending) = {
            let cache = self.cache.borrow();
            (cache.is_fresh(K::KEY), cache.is_pending(K::KEY))
        };
        if fresh {
            debug!("[SYNC] cache hit: {}", K::KEY.as_str());
            return self.snapshot::<K>();
        }
        if pending {
            debug!("[SYNC] {} already loading", K::KEY.as_str());
            return self.snapshot::<K>();
        }
        self.refresh(K::KEY).await;
        self.snapshot::<K>()
    }

    pub async fn load_spheres(&self) -> LoadState<Vec<Sphere>> {
        self.load::<SpheresKey>().await
    }

    pub async fn load_checklists(&self) -> LoadState<Vec<Checklist>> {
        self.load::<ChecklistsKey>().await
    }

    pub async fn load_tasks(&self) -> LoadState<Vec<Task>> {
        self.load::<TasksKey>().await
    }

    /// Fetch a key unconditionally
    pub async fn refresh(&self, key: CacheKey) {
        match key {
            CacheKey::Spheres => self.fetch_into::<SpheresKey, _>(self.api.list_spheres()).await,
            CacheKey::Checklists => self.fetch_into::<ChecklistsKey, _>(self.api.list_checklists()).await,
            CacheKey::Tasks => self.fetch_into::<TasksKey, _>(self.api.list_tasks()).await,
        }
    }

    async fn fetch_into<K, F>(&self, request: F)
    where
        K: QueryKey,
        F: Future<Output = SyncResult<K::Value>>,
    {
        let ticket = self.cache.borrow_mut().begin::<K>();
        debug!("[SYNC] fetching {} (ticket {})", K::KEY.as_str(), ticket);
        self.emit(K::KEY);

        let result = request.await;
        if let Err(err) = &result {
            warn!("[SYNC] loading {} failed: {}", K::KEY.as_str(), err);
        }

        let applied = self.cache.borrow_mut().complete::<K>(ticket, result);
        if applied {
            self.emit(K::KEY);
        } else {
            warn!("[SYNC] discarded stale {} response (ticket {})", K::KEY.as_str(), ticket);
        }
    }

    /// Invalidate keys and refetch the ones the UI has already asked for
    pub async fn invalidate(&self, keys: &[CacheKey]) {
        for &key in keys {
            let observed = {
                let mut cache = self.cache.borrow_mut();
                cache.invalidate(key);
                cache.is_observed(key)
            };
            if observed {
                self.refresh(key).await;
            }
        }
    }

    // ========================
    // Checklist detail
    // ========================

    /// Drill into a checklist: always round-trips and replaces the viewed slot
    pub async fn fetch_detail(&self, view: &impl ViewHandle, checklist_id: u32) -> SyncResult<ChecklistDetail> {
        let ticket = {
            let mut tickets = self.detail.borrow_mut();
            let ticket = tickets.next();
            tickets.loading = ticket;
            ticket
        };
        let previous = view.update_view(|v| std::mem::replace(&mut v.detail, DetailSlot::Loading(checklist_id)));
        // the open that was loading is superseded by this one
        let previous = match previous {
            DetailSlot::Loading(_) => DetailSlot::Empty,
            other => other,
        };
        debug!("[SYNC] opening checklist #{} (ticket {})", checklist_id, ticket);

        match self.api.get_checklist(checklist_id).await {
            Ok(detail) => {
                self.show_detail(view, ticket, detail.clone());
                Ok(detail)
            }
            Err(err) => {
                warn!("[SYNC] loading checklist #{} failed: {}", checklist_id, err);
                let owns_slot = self.detail.borrow().loading == ticket;
                view.update_view(|v| {
                    if owns_slot && v.detail == DetailSlot::Loading(checklist_id) {
                        v.detail = previous;
                    }
                    v.notify_error(format!("Could not open checklist: {}", err));
                });
                Err(err)
            }
        }
    }

    /// Re-read the open checklist in place, without passing through `Loading`
    async fn refresh_detail(&self, view: &impl ViewHandle, checklist_id: u32) {
        let ticket = self.detail.borrow_mut().next();
        match self.api.get_checklist(checklist_id).await {
            Ok(detail) => self.show_detail(view, ticket, detail),
            Err(err) if err.is_not_found() => {
                if self.claim_detail(view, ticket, checklist_id) {
                    view.update_view(|v| v.close_detail());
                }
            }
            Err(err) => {
                warn!("[SYNC] refreshing checklist #{} failed: {}", checklist_id, err);
                view.update_view(|v| v.notify_error(format!("Could not refresh checklist: {}", err)));
            }
        }
    }

    /// Put a detail response in the slot unless the slot moved on or a newer response was shown
    fn show_detail(&self, view: &impl ViewHandle, ticket: u64, detail: ChecklistDetail) {
        if self.claim_detail(view, ticket, detail.id()) {
            view.update_view(|v| v.detail = DetailSlot::Viewing(detail));
        }
    }

    fn claim_detail(&self, view: &impl ViewHandle, ticket: u64, checklist_id: u32) -> bool {
        if view.read_view(|v| v.detail.checklist_id()) != Some(checklist_id) {
            return false;
        }
        let mut tickets = self.detail.borrow_mut();
        if ticket < tickets.applied {
            warn!("[SYNC] discarded stale checklist #{} response (ticket {})", checklist_id, ticket);
            return false;
        }
        tickets.applied = ticket;
        true
    }

    pub fn close_detail(&self, view: &impl ViewHandle) {
        view.update_view(|v| v.close_detail());
    }

    // ========================
    // Mutations
    // ========================

    async fn settle<T>(
        &self,
        view: &impl ViewHandle,
        result: SyncResult<T>,
        effect: Effect,
        success: Option<&str>,
        failure: &str,
    ) -> SyncResult<T> {
        match result {
            Ok(value) => {
                if let Some(message) = success {
                    info!("[SYNC] {}", message);
                    view.update_view(|v| v.notify_success(message));
                }
                self.apply(view, effect).await;
                Ok(value)
            }
            Err(err) => {
                warn!("[SYNC] {}: {}", failure, err);
                view.update_view(|v| v.notify_error(format!("{}: {}", failure, err)));
                Err(err)
            }
        }
    }

    async fn apply(&self, view: &impl ViewHandle, effect: Effect) {
        let open = view.read_view(|v| v.detail.checklist_id());
        let refetch = match (effect.detail, open) {
            (DetailEffect::RefetchIfOpen, Some(id)) => Some(id),
            (DetailEffect::RefetchIfViewing(target), Some(id)) if target == id => Some(id),
            (DetailEffect::ClearIfViewing(target), Some(id)) if target == id => {
                view.update_view(|v| v.close_detail());
                None
            }
            _ => None,
        };
        self.invalidate(effect.keys).await;
        if let Some(id) = refetch {
            self.refresh_detail(view, id).await;
        }
    }

    // ---- spheres ----

    pub async fn create_sphere(&self, view: &impl ViewHandle, draft: &SphereDraft) -> SyncResult<Sphere> {
        let result = self.api.create_sphere(draft).await;
        let effect = Effect { keys: SPHERE_CREATED, detail: DetailEffect::Keep };
        self.settle(view, result, effect, Some("Sphere created!"), "Could not create sphere").await
    }

    pub async fn update_sphere(&self, view: &impl ViewHandle, id: u32, draft: &SphereDraft) -> SyncResult<Sphere> {
        let result = self.api.update_sphere(id, draft).await;
        let effect = Effect { keys: SPHERE_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, Some("Sphere updated!"), "Could not update sphere").await
    }

    pub async fn delete_sphere(&self, view: &impl ViewHandle, id: u32, confirm: &impl Confirm) -> SyncResult<DeleteOutcome> {
        if !confirm.confirm("Delete this sphere?") {
            debug!("[SYNC] delete of sphere #{} declined", id);
            return Ok(DeleteOutcome::Declined);
        }
        let result = self.api.delete_sphere(id).await.map(|_| DeleteOutcome::Deleted);
        let effect = Effect { keys: SPHERE_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, Some("Sphere deleted!"), "Could not delete sphere").await
    }

    // ---- checklists ----

    pub async fn create_checklist(&self, view: &impl ViewHandle, draft: &ChecklistDraft) -> SyncResult<Checklist> {
        let result = self.api.create_checklist(draft).await;
        let effect = Effect { keys: CHECKLIST_CHANGED, detail: DetailEffect::Keep };
        self.settle(view, result, effect, Some("Checklist created!"), "Could not create checklist").await
    }

    pub async fn update_checklist(&self, view: &impl ViewHandle, id: u32, draft: &ChecklistDraft) -> SyncResult<Checklist> {
        let result = self.api.update_checklist(id, draft).await;
        let effect = Effect { keys: CHECKLIST_CHANGED, detail: DetailEffect::RefetchIfViewing(id) };
        self.settle(view, result, effect, Some("Checklist updated!"), "Could not update checklist").await
    }

    pub async fn delete_checklist(&self, view: &impl ViewHandle, id: u32, confirm: &impl Confirm) -> SyncResult<DeleteOutcome> {
        if !confirm.confirm("Delete this checklist and all of its tasks?") {
            debug!("[SYNC] delete of checklist #{} declined", id);
            return Ok(DeleteOutcome::Declined);
        }
        let result = self.api.delete_checklist(id).await.map(|_| DeleteOutcome::Deleted);
        let effect = Effect { keys: CHECKLIST_DELETED, detail: DetailEffect::ClearIfViewing(id) };
        self.settle(view, result, effect, Some("Checklist deleted!"), "Could not delete checklist").await
    }

    // ---- tasks ----

    pub async fn create_task(&self, view: &impl ViewHandle, checklist: &Checklist, draft: &TaskDraft) -> SyncResult<Task> {
        let result = self.api.create_task(checklist, draft).await;
        let effect = Effect { keys: TASK_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, Some("Task added!"), "Could not add task").await
    }

    /// Send the full task record; callers pass the complete known state
    pub async fn update_task(&self, view: &impl ViewHandle, task: &Task) -> SyncResult<Task> {
        let result = self.api.update_task(task).await;
        let effect = Effect { keys: TASK_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, Some("Task updated!"), "Could not update task").await
    }

    /// Flip completion, resending the task's current title, description and priority
    pub async fn toggle_task(&self, view: &impl ViewHandle, task_id: u32) -> SyncResult<Task> {
        let Some(current) = self.known_task(view, task_id) else {
            let err = SyncError::NotFound { resource: Resource::Tasks, id: task_id };
            view.update_view(|v| v.notify_error(format!("Could not update task: {}", err)));
            return Err(err);
        };
        let result = self.api.update_task(&current.toggled()).await;
        let effect = Effect { keys: TASK_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, None, "Could not update task").await
    }

    pub async fn delete_task(&self, view: &impl ViewHandle, id: u32, confirm: &impl Confirm) -> SyncResult<DeleteOutcome> {
        if !confirm.confirm("Delete this task?") {
            debug!("[SYNC] delete of task #{} declined", id);
            return Ok(DeleteOutcome::Declined);
        }
        let result = self.api.delete_task(id).await.map(|_| DeleteOutcome::Deleted);
        let effect = Effect { keys: TASK_CHANGED, detail: DetailEffect::RefetchIfOpen };
        self.settle(view, result, effect, Some("Task deleted!"), "Could not delete task").await
    }

    /// Latest known copy of a task: the open detail first, then the tasks cache
    fn known_task(&self, view: &impl ViewHandle, task_id: u32) -> Option<Task> {
        let from_detail = view.read_view(|v| {
            v.viewed_checklist()
                .and_then(|detail| find_by_id(&detail.tasks, task_id).cloned())
        });
        from_detail.or_else(|| {
            self.cache
                .borrow()
                .get::<TasksKey>()
                .value()
                .and_then(|tasks| find_by_id(tasks, task_id).cloned())
        })
    }

    // ========================
    // Dialog submission
    // ========================
    //
    // On success the dialog closes and its draft is dropped; on failure it
    // stays open with the draft intact so the user can retry.

    pub async fn submit_sphere_dialog(&self, view: &impl ViewHandle) -> SyncResult<Sphere> {
        let Some((editing, draft)) = view.update_view(|v| {
            v.sphere_dialog.as_mut().map(|d| {
                d.submitting = true;
                (d.editing, d.draft.clone())
            })
        }) else {
            return Err(SyncError::Validation("no sphere dialog is open".into()));
        };
        let result = match editing {
            Some(id) => self.update_sphere(view, id, &draft).await,
            None => self.create_sphere(view, &draft).await,
        };
        view.update_view(|v| match &result {
            Ok(_) => v.sphere_dialog = None,
            Err(_) => {
                if let Some(dialog) = v.sphere_dialog.as_mut() {
                    dialog.submitting = false;
                }
            }
        });
        result
    }

    pub async fn submit_checklist_dialog(&self, view: &impl ViewHandle) -> SyncResult<Checklist> {
        let Some((editing, draft)) = view.update_view(|v| {
            v.checklist_dialog.as_mut().map(|d| {
                d.submitting = true;
                (d.editing, d.draft.clone())
            })
        }) else {
            return Err(SyncError::Validation("no checklist dialog is open".into()));
        };
        let result = match editing {
            Some(id) => self.update_checklist(view, id, &draft).await,
            None => self.create_checklist(view, &draft).await,
        };
        view.update_view(|v| match &result {
            Ok(_) => v.checklist_dialog = None,
            Err(_) => {
                if let Some(dialog) = v.checklist_dialog.as_mut() {
                    dialog.submitting = false;
                }
            }
        });
        result
    }

    /// Add a task to the open checklist, or save the task being edited
    pub async fn submit_task_dialog(&self, view: &impl ViewHandle) -> SyncResult<Task> {
        let Some((editing, draft)) = view.update_view(|v| {
            v.task_dialog.as_mut().map(|d| {
                d.submitting = true;
                (d.editing, d.draft.clone())
            })
        }) else {
            return Err(SyncError::Validation("no task dialog is open".into()));
        };
        let result = match editing {
            Some(id) => match self.known_task(view, id) {
                Some(task) => self.update_task(view, &task.with_draft(&draft)).await,
                None => Err(self.reject(view, SyncError::NotFound { resource: Resource::Tasks, id })),
            },
            None => {
                let checklist = view.read_view(|v| v.viewed_checklist().map(|d| d.checklist.clone()));
                match checklist {
                    Some(checklist) => self.create_task(view, &checklist, &draft).await,
                    None => Err(self.reject(
                        view,
                        SyncError::Validation("open a checklist before adding tasks".into()),
                    )),
                }
            }
        };
        view.update_view(|v| match &result {
            Ok(_) => v.task_dialog = None,
            Err(_) => {
                if let Some(dialog) = v.task_dialog.as_mut() {
                    dialog.submitting = false;
                }
            }
        });
        result
    }

    fn reject(&self, view: &impl ViewHandle, err: SyncError) -> SyncError {
        view.update_view(|v| v.notify_error(format!("Could not save task: {}", err)));
        err
    }
}
