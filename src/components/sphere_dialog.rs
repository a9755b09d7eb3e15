//! Sphere Dialog Component
//!
//! Create / edit form for a sphere: name, icon and color.

use leptos::prelude::*;
use sphere_sync::domain::{COLOR_OPTIONS, ICON_OPTIONS};
use sphere_sync::SphereDraft;

use crate::components::icon_glyph;
use crate::context::{use_app_context, AppContext};

fn read_draft<R: Default>(ctx: AppContext, f: impl FnOnce(&SphereDraft) -> R) -> R {
    ctx.view.with(|v| v.sphere_dialog.as_ref().map(|d| f(&d.draft)).unwrap_or_default())
}

fn edit_draft(ctx: AppContext, f: impl FnOnce(&mut SphereDraft)) {
    ctx.update_view(|v| {
        if let Some(dialog) = v.sphere_dialog.as_mut() {
            f(&mut dialog.draft);
        }
    });
}

#[component]
pub fn SphereDialog() -> impl IntoView {
    let ctx = use_app_context();

    // Some(editing) while the dialog is open; the form body only re-renders on open/close
    let open = Memo::new(move |_| ctx.view.with(|v| v.sphere_dialog.as_ref().map(|d| d.editing)));
    let submitting = move || ctx.view.with(|v| v.sphere_dialog.as_ref().is_some_and(|d| d.submitting));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.spawn(|sync, view| async move {
            let _ = sync.submit_sphere_dialog(&view).await;
        });
    };

    move || open.get().map(|editing| {
        let heading = if editing.is_some() { "Edit Sphere" } else { "New Sphere" };
        view! {
            <div class="dialog-backdrop">
                <form class="dialog" on:submit=on_submit>
                    <h2>{heading}</h2>

                    <label>"Name"</label>
                    <input
                        type="text"
                        placeholder="e.g. Health, Work, Family"
                        prop:value=move || read_draft(ctx, |d| d.name.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit_draft(ctx, |d| d.name = value);
                        }
                    />

                    <label>"Icon"</label>
                    <div class="icon-picker">
                        {ICON_OPTIONS.iter().map(|&icon| {
                            let selected = move || read_draft(ctx, |d| d.icon == icon);
                            view! {
                                <button
                                    type="button"
                                    class=move || if selected() { "icon-btn active" } else { "icon-btn" }
                                    title=icon
                                    on:click=move |_| edit_draft(ctx, |d| d.icon = icon.to_string())
                                >
                                    {icon_glyph(icon)}
                                </button>
                            }
                        }).collect_view()}
                    </div>

                    <label>"Color"</label>
                    <div class="color-picker">
                        {COLOR_OPTIONS.iter().map(|&color| {
                            let selected = move || read_draft(ctx, |d| d.color == color);
                            view! {
                                <button
                                    type="button"
                                    class=move || if selected() { "color-swatch active" } else { "color-swatch" }
                                    style=format!("background-color: {}", color)
                                    title=color
                                    on:click=move |_| edit_draft(ctx, |d| d.color = color.to_string())
                                />
                            }
                        }).collect_view()}
                    </div>

                    <div class="dialog-actions">
                        <button type="button" on:click=move |_| ctx.update_view(|v| v.sphere_dialog = None)>
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
