//! Response ordering for the checklist detail slot

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use sphere_sync::{
    ApiClient, ApiRequest, ChecklistDraft, DetailSlot, MemoryTransport, Method, Priority, Resource, SphereDraft,
    SyncResult, Synchronizer, TaskDraft, Transport, ViewState,
};

/// Holds the next detail GET for a checklist until its gate is released.
/// The backend answers immediately; only delivery is delayed.
struct DetailGate {
    inner: Rc<MemoryTransport>,
    gates: RefCell<HashMap<u32, oneshot::Receiver<()>>>,
}

impl DetailGate {
    fn new(inner: Rc<MemoryTransport>) -> Self {
        Self { inner, gates: RefCell::new(HashMap::new()) }
    }

    fn hold(&self, checklist_id: u32) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.borrow_mut().insert(checklist_id, gate);
        release
    }
}

#[async_trait(?Send)]
impl Transport for DetailGate {
    async fn send(&self, request: ApiRequest) -> SyncResult<Value> {
        let gate = match (request.method, request.resource, request.id) {
            (Method::Get, Resource::Checklists, Some(id)) => self.gates.borrow_mut().remove(&id),
            _ => None,
        };
        let response = self.inner.send(request).await;
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        response
    }
}

struct Fixture {
    gate: Rc<DetailGate>,
    sync: Synchronizer,
    view: RefCell<ViewState>,
}

fn fixture() -> Fixture {
    let backend = Rc::new(MemoryTransport::new());
    let gate = Rc::new(DetailGate::new(backend));
    let sync = Synchronizer::new(ApiClient::new(gate.clone()));
    Fixture { gate, sync, view: RefCell::new(ViewState::new()) }
}

async fn settle_others() {
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_failed_open_after_switch_does_not_stick_in_loading() {
    let f = fixture();
    let sphere = f
        .sync
        .create_sphere(&f.view, &SphereDraft::new("Work", "Briefcase", "#0EA5E9"))
        .await
        .unwrap();
    let first = f
        .sync
        .create_checklist(&f.view, &ChecklistDraft::new("Weekly Review", "", sphere.id))
        .await
        .unwrap();
    let missing = 999;

    let release_first = f.gate.hold(first.id);
    let release_missing = f.gate.hold(missing);

    let open_first = f.sync.fetch_detail(&f.view, first.id);
    let open_missing = f.sync.fetch_detail(&f.view, missing);
    let driver = async {
        settle_others().await;
        let _ = release_first.send(());
        settle_others().await;
        let _ = release_missing.send(());
    };
    let (first_result, missing_result, ()) = tokio::join!(open_first, open_missing, driver);

    assert!(first_result.is_ok());
    assert!(missing_result.unwrap_err().is_not_found());
    let view = f.view.borrow();
    assert_eq!(view.detail, DetailSlot::Empty);
    assert!(view.last_error().unwrap().message.starts_with("Could not open checklist"));
}

#[tokio::test]
async fn test_failed_reopen_keeps_shown_checklist() {
    let f = fixture();
    let sphere = f
        .sync
        .create_sphere(&f.view, &SphereDraft::new("Health", "Heart", "#10B981"))
        .await
        .unwrap();
    let shown = f
        .sync
        .create_checklist(&f.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    f.sync.fetch_detail(&f.view, shown.id).await.unwrap();

    f.sync.fetch_detail(&f.view, 999).await.unwrap_err();

    assert_eq!(f.view.borrow().viewed_checklist().map(|d| d.id()), Some(shown.id));
}

#[tokio::test]
async fn test_quick_toggles_keep_newest_detail() {
    let f = fixture();
    let sphere = f
        .sync
        .create_sphere(&f.view, &SphereDraft::new("Health", "Heart", "#10B981"))
        .await
        .unwrap();
    let checklist = f
        .sync
        .create_checklist(&f.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    f.sync.fetch_detail(&f.view, checklist.id).await.unwrap();
    let water = f
        .sync
        .create_task(&f.view, &checklist, &TaskDraft::new("Drink water", Priority::Low))
        .await
        .unwrap();
    let stretch = f
        .sync
        .create_task(&f.view, &checklist, &TaskDraft::new("Stretch", Priority::Medium))
        .await
        .unwrap();

    // the refetch after the first toggle is delivered last
    let release = f.gate.hold(checklist.id);
    let toggle_water = f.sync.toggle_task(&f.view, water.id);
    let toggle_stretch = f.sync.toggle_task(&f.view, stretch.id);
    let driver = async {
        settle_others().await;
        let _ = release.send(());
    };
    let (a, b, ()) = tokio::join!(toggle_water, toggle_stretch, driver);
    a.unwrap();
    b.unwrap();

    let view = f.view.borrow();
    let detail = view.viewed_checklist().expect("detail still open");
    assert!(detail.tasks.iter().all(|t| t.is_completed));
    assert_eq!(detail.completed_count(), 2);
}
