//! Checklist List Component
//!
//! All checklists, newest first, each with its sphere badge and task count.
//! Clicking a row opens the checklist detail.

use leptos::prelude::*;
use sphere_sync::{CacheKey, Checklist, LoadState};

use crate::components::{LoadStatus, SphereBadge};
use crate::context::{browser_confirm, use_app_context};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn ChecklistRow(checklist: Checklist) -> impl IntoView {
    let ctx = use_app_context();
    let id = checklist.id;
    let editing = checklist.clone();

    let open_detail = move |_| {
        ctx.spawn(move |sync, view| async move {
            let _ = sync.fetch_detail(&view, id).await;
        });
    };

    let on_edit = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.update_view(|v| v.open_checklist_edit(&editing));
    };

    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.spawn(move |sync, view| async move {
            let _ = sync.delete_checklist(&view, id, &browser_confirm).await;
        });
    };

    let count = match checklist.tasks_count {
        1 => "1 task".to_string(),
        n => format!("{} tasks", n),
    };

    view! {
        <li class="checklist-row" on:click=open_detail>
            <div class="checklist-main">
                <span class="checklist-title">{checklist.title.clone()}</span>
                {checklist.description.clone().filter(|d| !d.is_empty()).map(|d| view! {
                    <span class="checklist-description">{d}</span>
                })}
            </div>
            {checklist.sphere_name.clone().map(|name| view! {
                <SphereBadge
                    name=name
                    icon=checklist.sphere_icon.clone().unwrap_or_default()
                    color=checklist.sphere_color.clone().unwrap_or_default()
                />
            })}
            <span class="task-count">{count}</span>
            <button on:click=on_edit>"Edit"</button>
            <button class="delete-btn" on:click=on_delete>"×"</button>
        </li>
    }
}

#[component]
pub fn ChecklistList() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let checklists = move || store.checklists().with(|s| s.value().cloned().unwrap_or_default());
    let loading = Signal::derive(move || store.checklists().with(|s| matches!(s, LoadState::Loading { stale: None })));
    let error = Signal::derive(move || store.checklists().with(|s| s.error().map(str::to_string)));
    let is_empty = move || store.checklists().with(|s| s.is_ready() && s.value().is_some_and(Vec::is_empty));

    view! {
        <section class="checklist-section">
            <div class="section-header">
                <h2>"Checklists"</h2>
                <button class="primary-btn" on:click=move |_| ctx.update_view(|v| v.open_checklist_create(None))>
                    "+ New Checklist"
                </button>
            </div>

            <LoadStatus key=CacheKey::Checklists loading=loading error=error />

            <Show when=is_empty>
                <p class="empty-state">"No checklists yet."</p>
            </Show>

            <ul class="checklist-list">
                <For
                    each=checklists
                    key=|c| {
                        (c.id, c.title.clone(), c.description.clone(), c.tasks_count, c.sphere_name.clone(), c.sphere_color.clone(), c.sphere_icon.clone())
                    }
                    children=move |checklist| view! { <ChecklistRow checklist=checklist /> }
                />
            </ul>
        </section>
    }
}
