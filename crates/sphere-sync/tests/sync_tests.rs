//! Cache, invalidation and dialog behavior of the synchronizer

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use common::{accept, decline, setup};
use sphere_sync::{
    ApiClient, ApiRequest, CacheKey, ChecklistDraft, ChecklistsKey, DetailSlot, LoadState, MemoryTransport, Method,
    Priority, Resource, SphereDraft, SpheresKey, SyncError, SyncResult, Synchronizer, TaskDraft, Transport,
    ViewState,
};

#[tokio::test]
async fn test_ready_key_is_served_from_cache() {
    let h = setup();
    h.backend.seed_sphere("Health", "Heart", "#10B981");

    h.sync.load_spheres().await;
    let second = h.sync.load_spheres().await;

    assert_eq!(second.value().map(Vec::len), Some(1));
    assert_eq!(h.backend.request_count(Method::Get, Resource::Spheres), 1);
}

#[tokio::test]
async fn test_mutation_refetches_only_observed_keys() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    h.sync.load_spheres().await;
    h.backend.clear_requests();

    h.sync
        .update_sphere(&h.view, sphere.id, &SphereDraft::new("Fitness", "Dumbbell", "#10B981"))
        .await
        .unwrap();

    assert_eq!(h.backend.request_count(Method::Put, Resource::Spheres), 1);
    assert_eq!(h.backend.request_count(Method::Get, Resource::Spheres), 1);
    assert_eq!(h.backend.request_count(Method::Get, Resource::Checklists), 0);
    assert_eq!(h.backend.request_count(Method::Get, Resource::Tasks), 0);
    assert_eq!(h.sync.snapshot::<SpheresKey>().value().unwrap()[0].name, "Fitness");

    // never observed, so the first read fetches
    let tasks = h.sync.load_tasks().await;
    assert!(tasks.is_ready());
    assert_eq!(h.backend.request_count(Method::Get, Resource::Tasks), 1);
}

#[tokio::test]
async fn test_declined_delete_sends_nothing() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");

    let outcome = h.sync.delete_sphere(&h.view, sphere.id, &decline).await.unwrap();

    assert_eq!(outcome, sphere_sync::DeleteOutcome::Declined);
    assert!(h.backend.requests().is_empty());
    assert!(h.view.borrow().notifications.is_empty());
    assert_eq!(h.backend.stored_spheres().len(), 1);
}

#[tokio::test]
async fn test_failed_submit_keeps_dialog_open_for_retry() {
    let h = setup();
    h.view.borrow_mut().open_sphere_create();
    h.view.borrow_mut().sphere_dialog.as_mut().unwrap().draft.name = "Health".into();

    h.backend.set_offline(true);
    let err = h.sync.submit_sphere_dialog(&h.view).await.unwrap_err();
    assert!(matches!(err, SyncError::Transport(_)));
    {
        let view = h.view.borrow();
        let dialog = view.sphere_dialog.as_ref().expect("dialog stays open");
        assert_eq!(dialog.draft.name, "Health");
        assert!(!dialog.submitting);
        assert!(view.last_error().unwrap().message.starts_with("Could not create sphere"));
    }

    h.backend.set_offline(false);
    let sphere = h.sync.submit_sphere_dialog(&h.view).await.unwrap();
    assert_eq!(sphere.name, "Health");
    assert!(h.view.borrow().sphere_dialog.is_none());
}

#[tokio::test]
async fn test_blank_name_is_rejected_before_sending() {
    let h = setup();
    h.view.borrow_mut().open_sphere_create();

    let err = h.sync.submit_sphere_dialog(&h.view).await.unwrap_err();

    assert!(matches!(err, SyncError::Validation(_)));
    assert!(h.backend.requests().is_empty());
    assert!(h.view.borrow().sphere_dialog.is_some());
}

#[tokio::test]
async fn test_failed_load_can_be_retried() {
    let h = setup();
    h.backend.seed_sphere("Health", "Heart", "#10B981");
    h.backend.fail_next(SyncError::Status { status: 500, message: "boom".into() });

    let failed = h.sync.load_spheres().await;
    assert!(matches!(failed, LoadState::Failed { stale: None, .. }));
    assert_eq!(failed.error(), Some("server responded with 500: boom"));

    let retried = h.sync.load_spheres().await;
    assert_eq!(retried.value().map(Vec::len), Some(1));
    assert_eq!(h.backend.request_count(Method::Get, Resource::Spheres), 2);
}

#[tokio::test]
async fn test_deleting_viewed_checklist_clears_detail() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Work", "Briefcase", "#0EA5E9");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Weekly Review", "", sphere.id))
        .await
        .unwrap();
    h.sync.load_checklists().await;
    h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();

    h.sync.delete_checklist(&h.view, checklist.id, &accept).await.unwrap();

    assert_eq!(h.view.borrow().detail, DetailSlot::Empty);
    assert_eq!(h.sync.snapshot::<ChecklistsKey>().value().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_sphere_rename_refreshes_checklists_and_open_detail() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    h.sync.load_checklists().await;
    h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();

    h.sync
        .update_sphere(&h.view, sphere.id, &SphereDraft::new("Wellbeing", "Heart", "#10B981"))
        .await
        .unwrap();

    let summaries = h.sync.snapshot::<ChecklistsKey>();
    assert_eq!(summaries.value().unwrap()[0].sphere_name.as_deref(), Some("Wellbeing"));
    let view = h.view.borrow();
    assert_eq!(
        view.viewed_checklist().unwrap().checklist.sphere_name.as_deref(),
        Some("Wellbeing")
    );
}

#[tokio::test]
async fn test_deleting_sphere_cascades_in_cache() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    h.sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    h.sync.load_checklists().await;
    assert_eq!(h.sync.snapshot::<ChecklistsKey>().value().map(Vec::len), Some(1));

    h.sync.delete_sphere(&h.view, sphere.id, &accept).await.unwrap();

    assert_eq!(h.sync.snapshot::<ChecklistsKey>().value().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_subscribers_see_loading_then_ready() {
    let h = setup();
    let seen: Rc<RefCell<Vec<(CacheKey, bool)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.sync.subscribe(move |key, cache| {
        sink.borrow_mut().push((key, cache.get::<SpheresKey>().is_ready()));
    });

    h.sync.load_spheres().await;

    assert_eq!(
        *seen.borrow(),
        vec![(CacheKey::Spheres, false), (CacheKey::Spheres, true)]
    );
}

#[tokio::test]
async fn test_toggle_unknown_task_sends_nothing() {
    let h = setup();

    let err = h.sync.toggle_task(&h.view, 42).await.unwrap_err();

    assert!(err.is_not_found());
    assert!(h.backend.requests().is_empty());
    assert!(h.view.borrow().last_error().is_some());
}

#[tokio::test]
async fn test_task_edit_keeps_completion() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();
    let task = h
        .sync
        .create_task(&h.view, &checklist, &TaskDraft::new("Stretch", Priority::Medium))
        .await
        .unwrap();
    let done = h.sync.toggle_task(&h.view, task.id).await.unwrap();
    assert!(done.is_completed);

    h.view.borrow_mut().open_task_edit(&done);
    h.view.borrow_mut().task_dialog.as_mut().unwrap().draft.title = "Stretch twice".into();
    h.sync.submit_task_dialog(&h.view).await.unwrap();

    let stored = h.backend.stored_tasks().into_iter().find(|t| t.id == task.id).unwrap();
    assert_eq!(stored.title, "Stretch twice");
    assert!(stored.is_completed);
    assert_eq!(stored.priority, Priority::Medium);
}

#[tokio::test]
async fn test_missing_checklist_restores_previous_detail() {
    let h = setup();

    let err = h.sync.fetch_detail(&h.view, 999).await.unwrap_err();

    assert!(err.is_not_found());
    let view = h.view.borrow();
    assert_eq!(view.detail, DetailSlot::Empty);
    assert!(view.last_error().unwrap().message.starts_with("Could not open checklist"));
}

// ---- response ordering ----

/// Holds the first response back until the test releases it
struct GatedTransport {
    inner: Rc<MemoryTransport>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, request: ApiRequest) -> SyncResult<Value> {
        let gate = self.gate.borrow_mut().take();
        let response = self.inner.send(request).await;
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        response
    }
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer_one() {
    let backend = Rc::new(MemoryTransport::new());
    backend.seed_sphere("Old", "Star", "#F97316");
    let (release, gate) = oneshot::channel();
    let transport = Rc::new(GatedTransport {
        inner: backend.clone(),
        gate: RefCell::new(Some(gate)),
    });
    let sync = Synchronizer::new(ApiClient::new(transport));
    let view = RefCell::new(ViewState::new());

    let slow = sync.refresh(CacheKey::Spheres);
    let fast = async {
        sync.create_sphere(&view, &SphereDraft::new("New", "Star", "#F97316"))
            .await
            .unwrap();
        sync.refresh(CacheKey::Spheres).await;
        let _ = release.send(());
    };
    tokio::join!(slow, fast);

    let spheres = sync.snapshot::<SpheresKey>();
    let names: Vec<&str> = spheres.value().unwrap().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["New", "Old"]);
}

#[tokio::test]
async fn test_load_while_loading_sends_one_request() {
    let backend = Rc::new(MemoryTransport::new());
    backend.seed_sphere("Health", "Heart", "#10B981");
    let (release, gate) = oneshot::channel();
    let transport = Rc::new(GatedTransport {
        inner: backend.clone(),
        gate: RefCell::new(Some(gate)),
    });
    let sync = Synchronizer::new(ApiClient::new(transport));

    let first = sync.load_spheres();
    let second = async {
        let state = sync.load_spheres().await;
        let _ = release.send(());
        state
    };
    let (first, second) = tokio::join!(first, second);

    assert!(second.is_loading());
    assert_eq!(first.value().map(Vec::len), Some(1));
    assert_eq!(backend.request_count(Method::Get, Resource::Spheres), 1);
}
