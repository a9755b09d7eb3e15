//! Toast Stack Component
//!
//! Success and error notifications; each one dismisses itself after a few
//! seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sphere_sync::{Notification, NotificationKind};

use crate::context::use_app_context;

const TOAST_MS: u32 = 3_000;

#[component]
fn Toast(notification: Notification) -> impl IntoView {
    let ctx = use_app_context();
    let id = notification.id;

    spawn_local(async move {
        TimeoutFuture::new(TOAST_MS).await;
        ctx.update_view(|v| v.dismiss(id));
    });

    let class = match notification.kind {
        NotificationKind::Success => "toast success",
        NotificationKind::Error => "toast error",
    };

    view! {
        <div class=class on:click=move |_| ctx.update_view(|v| v.dismiss(id))>
            {notification.message}
        </div>
    }
}

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app_context();
    let notifications = move || ctx.view.with(|v| v.notifications.clone());

    view! {
        <div class="toast-stack">
            <For
                each=notifications
                key=|n| n.id
                children=move |notification| view! { <Toast notification=notification /> }
            />
        </div>
    }
}
