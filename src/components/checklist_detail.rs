//! Checklist Detail Component
//!
//! The currently viewed checklist with its tasks and progress.

use leptos::prelude::*;
use sphere_sync::{ChecklistDetail, DetailSlot};

use crate::components::{SphereBadge, TaskRow};
use crate::context::{browser_confirm, use_app_context};

#[component]
fn DetailBody(detail: ChecklistDetail) -> impl IntoView {
    let ctx = use_app_context();
    let checklist = detail.checklist.clone();
    let id = checklist.id;
    let progress = format!("{} of {} completed", detail.completed_count(), detail.tasks.len());
    let editing = checklist.clone();

    let on_delete = move |_| {
        ctx.spawn(move |sync, view| async move {
            let _ = sync.delete_checklist(&view, id, &browser_confirm).await;
        });
    };

    view! {
        <div class="detail-header">
            <h2>{checklist.title.clone()}</h2>
            {checklist.sphere_name.clone().map(|name| view! {
                <SphereBadge
                    name=name
                    icon=checklist.sphere_icon.clone().unwrap_or_default()
                    color=checklist.sphere_color.clone().unwrap_or_default()
                />
            })}
            <div class="card-actions">
                <button on:click=move |_| ctx.update_view(|v| v.open_checklist_edit(&editing))>"Edit"</button>
                <button class="delete-btn" on:click=on_delete>"Delete"</button>
            </div>
        </div>
        {checklist.description.clone().filter(|d| !d.is_empty()).map(|d| view! {
            <p class="checklist-description">{d}</p>
        })}
        <p class="progress">{progress}</p>

        <div class="section-header">
            <h3>"Tasks"</h3>
            <button class="primary-btn" on:click=move |_| ctx.update_view(|v| v.open_task_create())>
                "+ Add Task"
            </button>
        </div>

        {if detail.tasks.is_empty() {
            view! { <p class="empty-state">"No tasks yet."</p> }.into_any()
        } else {
            view! {
                <ul class="task-list">
                    {detail.tasks.into_iter().map(|task| view! { <TaskRow task=task /> }).collect_view()}
                </ul>
            }.into_any()
        }}
    }
}

#[component]
pub fn ChecklistDetailView() -> impl IntoView {
    let ctx = use_app_context();
    let slot = Memo::new(move |_| ctx.view.with(|v| v.detail.clone()));

    view! {
        <section class="checklist-detail">
            <button class="back-btn" on:click=move |_| ctx.sync().close_detail(&ctx.handle())>
                "← Back to checklists"
            </button>
            {move || match slot.get() {
                DetailSlot::Empty => ().into_any(),
                DetailSlot::Loading(_) => view! { <p class="loading">"Loading checklist..."</p> }.into_any(),
                DetailSlot::Viewing(detail) => view! { <DetailBody detail=detail /> }.into_any(),
            }}
        </section>
    }
}
