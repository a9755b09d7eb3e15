//! Task Row Component

use leptos::prelude::*;
use sphere_sync::{Priority, Task};

use crate::context::{browser_confirm, use_app_context};

fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "priority low",
        Priority::Medium => "priority medium",
        Priority::High => "priority high",
    }
}

/// One task with completion toggle, edit and delete
#[component]
pub fn TaskRow(task: Task) -> impl IntoView {
    let ctx = use_app_context();
    let id = task.id;
    let editing = task.clone();

    let on_toggle = move |_| {
        ctx.spawn(move |sync, view| async move {
            let _ = sync.toggle_task(&view, id).await;
        });
    };

    let on_delete = move |_| {
        ctx.spawn(move |sync, view| async move {
            let _ = sync.delete_task(&view, id, &browser_confirm).await;
        });
    };

    let row_class = if task.is_completed { "task-row completed" } else { "task-row" };
    let title_style = if task.is_completed { "text-decoration: line-through" } else { "" };

    view! {
        <li class=row_class>
            <input type="checkbox" prop:checked=task.is_completed on:change=on_toggle />
            <div class="task-main">
                <span class="task-title" style=title_style>{task.title.clone()}</span>
                {task.description.clone().filter(|d| !d.is_empty()).map(|d| view! {
                    <span class="task-description">{d}</span>
                })}
            </div>
            <span class=priority_class(task.priority)>{task.priority.label()}</span>
            <button on:click=move |_| ctx.update_view(|v| v.open_task_edit(&editing))>"Edit"</button>
            <button class="delete-btn" on:click=on_delete>"×"</button>
        </li>
    }
}
