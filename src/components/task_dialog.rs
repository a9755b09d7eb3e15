//! Task Dialog Component
//!
//! Add a task to the open checklist, or edit an existing task.

use leptos::prelude::*;
use sphere_sync::{Priority, TaskDraft};

use crate::context::{use_app_context, AppContext};

fn read_draft<R: Default>(ctx: AppContext, f: impl FnOnce(&TaskDraft) -> R) -> R {
    ctx.view.with(|v| v.task_dialog.as_ref().map(|d| f(&d.draft)).unwrap_or_default())
}

fn edit_draft(ctx: AppContext, f: impl FnOnce(&mut TaskDraft)) {
    ctx.update_view(|v| {
        if let Some(dialog) = v.task_dialog.as_mut() {
            f(&mut dialog.draft);
        }
    });
}

#[component]
pub fn TaskDialog() -> impl IntoView {
    let ctx = use_app_context();

    let open = Memo::new(move |_| ctx.view.with(|v| v.task_dialog.as_ref().map(|d| d.editing)));
    let submitting = move || ctx.view.with(|v| v.task_dialog.as_ref().is_some_and(|d| d.submitting));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.spawn(|sync, view| async move {
            let _ = sync.submit_task_dialog(&view).await;
        });
    };

    move || open.get().map(|editing| {
        let heading = if editing.is_some() { "Edit Task" } else { "Add Task" };
        view! {
            <div class="dialog-backdrop">
                <form class="dialog" on:submit=on_submit>
                    <h2>{heading}</h2>

                    <label>"Title"</label>
                    <input
                        type="text"
                        placeholder="What needs doing?"
                        prop:value=move || read_draft(ctx, |d| d.title.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit_draft(ctx, |d| d.title = value);
                        }
                    />

                    <label>"Description"</label>
                    <textarea
                        prop:value=move || read_draft(ctx, |d| d.description.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit_draft(ctx, |d| d.description = value);
                        }
                    />

                    <label>"Priority"</label>
                    <div class="priority-selector">
                        {Priority::ALL.iter().map(|&priority| {
                            let selected = move || read_draft(ctx, |d| d.priority == priority);
                            view! {
                                <button
                                    type="button"
                                    class=move || if selected() { "priority-btn active" } else { "priority-btn" }
                                    on:click=move |_| edit_draft(ctx, |d| d.priority = priority)
                                >
                                    {priority.label()}
                                </button>
                            }
                        }).collect_view()}
                    </div>

                    <div class="dialog-actions">
                        <button type="button" on:click=move |_| ctx.update_view(|v| v.task_dialog = None)>
                            "Cancel"
                        </button>
                        <button type="submit" class="primary-btn" disabled=submitting>
                            {move || if submitting() { "Saving..." } else { "Save" }}
                        </button>
                    </div>
                </form>
            </div>
        }
    })
}
