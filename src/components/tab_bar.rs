//! Tab Bar Component
//!
//! Switches between the spheres, checklists and tasks views.

use leptos::prelude::*;
use sphere_sync::Tab;

use crate::context::use_app_context;

#[component]
pub fn TabBar() -> impl IntoView {
    let ctx = use_app_context();
    let current = Memo::new(move |_| ctx.view.with(|v| v.tab));

    view! {
        <nav class="tab-bar">
            {Tab::ALL.iter().map(|&tab| {
                let tab_class = move || {
                    if current.get() == tab { "tab active" } else { "tab" }
                };
                view! {
                    <button
                        class=tab_class
                        on:click=move |_| ctx.update_view(|v| v.select_tab(tab))
                    >
                        {tab.label()}
                    </button>
                }
            }).collect_view()}
        </nav>
    }
}
