//! Sphere Grid Component
//!
//! Cards for every life sphere with edit/delete actions and a shortcut for
//! starting a checklist inside a sphere.

use leptos::prelude::*;
use sphere_sync::{CacheKey, LoadState, Sphere, Tab};

use crate::components::{icon_glyph, LoadStatus};
use crate::context::{browser_confirm, use_app_context};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
fn SphereCard(sphere: Sphere) -> impl IntoView {
    let ctx = use_app_context();
    let id = sphere.id;
    let card_style = format!("border-color: {}", sphere.color);
    let icon_style = format!("background-color: {}", sphere.color);
    let editing = sphere.clone();

    let on_delete = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        ctx.spawn(move |sync, view| async move {
            let _ = sync.delete_sphere(&view, id, &browser_confirm).await;
        });
    };

    let on_new_checklist = move |_| {
        ctx.update_view(|v| {
            v.select_tab(Tab::Checklists);
            v.open_checklist_create(Some(id));
        });
    };

    view! {
        <div class="sphere-card" style=card_style>
            <div class="sphere-icon large" style=icon_style>{icon_glyph(&sphere.icon)}</div>
            <h3>{sphere.name.clone()}</h3>
            <div class="card-actions">
                <button on:click=move |_| ctx.update_view(|v| v.open_sphere_edit(&editing))>"Edit"</button>
                <button on:click=on_new_checklist>"New checklist"</button>
                <button class="delete-btn" on:click=on_delete>"×"</button>
            </div>
        </div>
    }
}

#[component]
pub fn SphereGrid() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();

    let spheres = move || store.spheres().with(|s| s.value().cloned().unwrap_or_default());
    let loading = Signal::derive(move || store.spheres().with(|s| matches!(s, LoadState::Loading { stale: None })));
    let error = Signal::derive(move || store.spheres().with(|s| s.error().map(str::to_string)));
    let is_empty = move || store.spheres().with(|s| s.is_ready() && s.value().is_some_and(Vec::is_empty));

    view! {
        <section class="sphere-section">
            <div class="section-header">
                <h2>"Your Spheres"</h2>
                <button class="primary-btn" on:click=move |_| ctx.update_view(|v| v.open_sphere_create())>
                    "+ New Sphere"
                </button>
            </div>

            <Show when=move || loading.get()>
                <div class="sphere-grid">
                    {(0..3).map(|_| view! { <div class="sphere-card skeleton" /> }).collect_view()}
                </div>
            </Show>
            <LoadStatus key=CacheKey::Spheres loading=Signal::stored(false) error=error />

            <Show when=is_empty>
                <p class="empty-state">"No spheres yet. Create one to organize your life."</p>
            </Show>

            <div class="sphere-grid">
                <For
                    each=spheres
                    key=|sphere| (sphere.id, sphere.name.clone(), sphere.icon.clone(), sphere.color.clone())
                    children=move |sphere| view! { <SphereCard sphere=sphere /> }
                />
            </div>
        </section>
    }
}
