//! Checklist Dialog Component
//!
//! Create / edit form for a checklist: title, description and sphere.

use leptos::prelude::*;
use sphere_sync::ChecklistDraft;

use crate::context::{use_app_context, AppContext};
use crate::store::{known_spheres, use_app_store};

fn read_draft<R: Default>(ctx: AppContext, f: impl FnOnce(&ChecklistDraft) -> R) -> R {
    ctx.view.with(|v| v.checklist_dialog.as_ref().map(|d| f(&d.draft)).unwrap_or_default())
}

fn edit_draft(ctx: AppContext, f: impl FnOnce(&mut ChecklistDraft)) {
    ctx.update_view(|v| {
        if let Some(dialog) = v.checklist_dialog.as_mut() {
            f(&mut dialog.draft);
        }
    });
}

#[component]
pub fn ChecklistDialog() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let open = Memo::new(move |_| ctx.view.with(|v| v.checklist_dialog.as_ref().map(|d| d.editing)));
    let submitting = move || ctx.view.with(|v| v.checklist_dialog.as_ref().is_some_and(|d| d.submitting));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.spawn(|sync, view| async move {
            let _ = sync.submit_checklist_dialog(&view).await;
        });
    };

    move || open.get().map(|editing| {
        let heading = if editing.is_some() { "Edit Checklist" } else { "New Checklist" };
        view! {
            <div class="dialog-backdrop">
                <form class="dialog" on:submit=on_submit>
                    <h2>{heading}</h2>

                    <label>"Title"</label>
                    <input
                        type="text"
                        placeholder="e.g. Morning Routine"
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

                    <label>"Sphere"</label>
                    <select
                        prop:value=move || read_draft(ctx, |d| d.sphere_id.map(|id| id.to_string()).unwrap_or_default())
                        on:change=move |ev| {
                            let sphere_id = event_target_value(&ev).parse::<u32>().ok();
                            edit_draft(ctx, |d| d.sphere_id = sphere_id);
                        }
                    >
                        <option value="">"Select a sphere"</option>
                        {move || known_spheres(&store).into_iter().map(|sphere| {
                            let value = sphere.id.to_string();
                            let id = sphere.id;
                            view! {
                                <option
                                    value=value
                                    selected=move || read_draft(ctx, |d| d.sphere_id == Some(id))
                                >
                                    {sphere.name}
                                </option>
                            }
                        }).collect_view()}
                    </select>

                    <div class="dialog-actions">
                        <button type="button" on:click=move |_| ctx.update_view(|v| v.checklist_dialog = None)>
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
