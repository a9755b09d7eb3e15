//! Load Status Component
//!
//! Loading indicator and error banner with retry for one cached collection.

use leptos::prelude::*;
use sphere_sync::CacheKey;

use crate::context::use_app_context;

/// Shows "loading" while nothing is cached yet, and the error with a retry
/// button when the last fetch failed
#[component]
pub fn LoadStatus(
    key: CacheKey,
    #[prop(into)] loading: Signal<bool>,
    #[prop(into)] error: Signal<Option<String>>,
) -> impl IntoView {
    let ctx = use_app_context();

    let retry = move |_| {
        ctx.spawn(move |sync, _| async move {
            sync.refresh(key).await;
        });
    };

    view! {
        <Show when=move || loading.get()>
            <p class="loading">"Loading " {key.as_str()} "..."</p>
        </Show>
        {move || error.get().map(|message| view! {
            <div class="load-error">
                <span>{format!("Could not load {}: {}", key.as_str(), message)}</span>
                <button on:click=retry>"Retry"</button>
            </div>
        })}
    }
}
