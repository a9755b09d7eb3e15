//! End-to-end flows against the in-memory backend

mod common;

use common::{accept, setup};
use sphere_sync::{ChecklistDraft, DeleteOutcome, Priority, SphereDraft, TaskDraft};

#[tokio::test]
async fn test_sphere_list_matches_backend_after_refetch() {
    let h = setup();
    h.sync.load_spheres().await;

    for (name, icon) in [("Health", "Heart"), ("Work", "Briefcase"), ("Home", "Home")] {
        h.sync
            .create_sphere(&h.view, &SphereDraft::new(name, icon, "#F97316"))
            .await
            .expect("create failed");
    }

    let cached: Vec<u32> = h.sync.snapshot::<sphere_sync::SpheresKey>()
        .value()
        .expect("spheres loaded")
        .iter()
        .map(|s| s.id)
        .collect();
    let stored: Vec<u32> = h.backend.stored_spheres().iter().map(|s| s.id).collect();
    assert_eq!(cached, stored);
    assert_eq!(cached.len(), 3);
}

#[tokio::test]
async fn test_delete_sphere_removes_only_that_sphere() {
    let h = setup();
    let health = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let work = h.backend.seed_sphere("Work", "Briefcase", "#0EA5E9");
    h.sync.load_spheres().await;

    let outcome = h.sync.delete_sphere(&h.view, health.id, &accept).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);

    let spheres = h.sync.load_spheres().await;
    let spheres = spheres.value().unwrap();
    assert_eq!(spheres.len(), 1);
    assert_eq!(spheres[0].id, work.id);
    assert_eq!(spheres[0].name, "Work");
}

#[tokio::test]
async fn test_toggle_preserves_other_task_fields() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();

    let mut draft = TaskDraft::new("Drink water", Priority::High);
    draft.description = "Two glasses".into();
    let task = h.sync.create_task(&h.view, &checklist, &draft).await.unwrap();

    let toggled = h.sync.toggle_task(&h.view, task.id).await.unwrap();
    assert!(toggled.is_completed);

    let stored = h.backend.stored_tasks().into_iter().find(|t| t.id == task.id).unwrap();
    assert!(stored.is_completed);
    assert_eq!(stored.title, "Drink water");
    assert_eq!(stored.description.as_deref(), Some("Two glasses"));
    assert_eq!(stored.priority, Priority::High);
}

#[tokio::test]
async fn test_new_checklist_detail_is_empty() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Evening", "Wind down", sphere.id))
        .await
        .expect("checklist for an existing sphere");

    let detail = h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();
    assert_eq!(detail.checklist.tasks_count, 0);
    assert!(detail.tasks.is_empty());
    assert_eq!(detail.checklist.sphere_name.as_deref(), Some("Health"));
}

#[tokio::test]
async fn test_adding_task_updates_open_detail_and_list() {
    let h = setup();
    let sphere = h.backend.seed_sphere("Health", "Heart", "#10B981");
    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", sphere.id))
        .await
        .unwrap();
    h.sync.load_checklists().await;
    h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();

    h.view.borrow_mut().open_task_create();
    h.view.borrow_mut().task_dialog.as_mut().unwrap().draft = TaskDraft::new("Drink water", Priority::Low);
    let task = h.sync.submit_task_dialog(&h.view).await.unwrap();
    assert_eq!(task.checklist_id, checklist.id);
    assert_eq!(task.sphere_id, sphere.id);

    let view = h.view.borrow();
    assert!(view.task_dialog.is_none());
    let detail = view.viewed_checklist().expect("detail still open");
    assert_eq!(detail.checklist.tasks_count, 1);
    assert_eq!(detail.tasks[0].id, task.id);

    let summaries = h.sync.snapshot::<sphere_sync::ChecklistsKey>();
    assert_eq!(summaries.value().unwrap()[0].tasks_count, 1);
}

#[tokio::test]
async fn test_health_morning_routine_walkthrough() {
    let h = setup();

    let health = h
        .sync
        .create_sphere(&h.view, &SphereDraft::new("Health", "Heart", "#10B981"))
        .await
        .unwrap();
    let spheres = h.sync.load_spheres().await;
    assert!(spheres.value().unwrap().iter().any(|s| s.id == health.id && s.name == "Health"));

    let checklist = h
        .sync
        .create_checklist(&h.view, &ChecklistDraft::new("Morning Routine", "", health.id))
        .await
        .unwrap();
    let detail = h.sync.fetch_detail(&h.view, checklist.id).await.unwrap();

    let task = h
        .sync
        .create_task(&h.view, &detail.checklist, &TaskDraft::new("Drink water", Priority::Low))
        .await
        .unwrap();
    h.sync.toggle_task(&h.view, task.id).await.unwrap();

    let view = h.view.borrow();
    let shown = view.viewed_checklist().unwrap();
    assert_eq!(shown.tasks.len(), 1);
    assert_eq!(shown.tasks[0].title, "Drink water");
    assert!(shown.tasks[0].is_completed);
    assert_eq!(shown.tasks[0].priority.label(), "Low");
    assert_eq!(shown.completed_count(), 1);
}
