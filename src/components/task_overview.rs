//! Task Overview Component
//!
//! Every task across all checklists, grouped by sphere.

use leptos::prelude::*;
use sphere_sync::{CacheKey, LoadState, Sphere, Task};

use crate::components::{LoadStatus, SphereBadge, TaskRow};
use crate::store::{known_spheres, use_app_store, AppStateStoreFields};

/// Tasks bucketed under their sphere, in sphere order; orphans go last
fn group_by_sphere(spheres: &[Sphere], tasks: Vec<Task>) -> Vec<(Option<Sphere>, Vec<Task>)> {
    let mut groups: Vec<(Option<Sphere>, Vec<Task>)> =
        spheres.iter().map(|s| (Some(s.clone()), Vec::new())).collect();
    let mut orphans = Vec::new();
    for task in tasks {
        match groups.iter_mut().find(|(s, _)| s.as_ref().is_some_and(|s| s.id == task.sphere_id)) {
            Some((_, bucket)) => bucket.push(task),
            None => orphans.push(task),
        }
    }
    groups.retain(|(_, bucket)| !bucket.is_empty());
    if !orphans.is_empty() {
        groups.push((None, orphans));
    }
    groups
}

#[component]
pub fn TaskOverview() -> impl IntoView {
    let store = use_app_store();
    let (hide_completed, set_hide_completed) = signal(false);

    let loading = Signal::derive(move || store.tasks().with(|s| matches!(s, LoadState::Loading { stale: None })));
    let error = Signal::derive(move || store.tasks().with(|s| s.error().map(str::to_string)));

    let groups = move || {
        let hide = hide_completed.get();
        let tasks: Vec<Task> = store.tasks().with(|s| {
            s.value()
                .map(|tasks| tasks.iter().filter(|t| !(hide && t.is_completed)).cloned().collect())
                .unwrap_or_default()
        });
        group_by_sphere(&known_spheres(&store), tasks)
    };

    let open_count = move || {
        store.tasks().with(|s| s.value().map(|t| t.iter().filter(|t| !t.is_completed).count()).unwrap_or(0))
    };

    view! {
        <section class="task-overview">
            <div class="section-header">
                <h2>"All Tasks"</h2>
                <span class="task-count">{move || format!("{} open", open_count())}</span>
                <label class="filter-toggle">
                    <input
                        type="checkbox"
                        prop:checked=move || hide_completed.get()
                        on:change=move |_| set_hide_completed.update(|h| *h = !*h)
                    />
                    "Hide completed"
                </label>
            </div>

            <LoadStatus key=CacheKey::Tasks loading=loading error=error />

            {move || {
                let groups = groups();
                if groups.is_empty() {
                    view! { <p class="empty-state">"No tasks to show."</p> }.into_any()
                } else {
                    groups.into_iter().map(|(sphere, tasks)| view! {
                        <div class="task-group">
                            {match sphere {
                                Some(sphere) => view! {
                                    <SphereBadge name=sphere.name icon=sphere.icon color=sphere.color />
                                }.into_any(),
                                None => view! { <span class="sphere-badge">"Other"</span> }.into_any(),
                            }}
                            <ul class="task-list">
                                {tasks.into_iter().map(|task| view! { <TaskRow task=task /> }).collect_view()}
                            </ul>
                        </div>
                    }).collect_view().into_any()
                }
            }}
        </section>
    }
}
