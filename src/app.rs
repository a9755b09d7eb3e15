//! Life Spheres Frontend App
//!
//! Tab layout over spheres, checklists and tasks, with the form dialogs and
//! toast stack layered on top.

use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info};
use reactive_stores::Store;
use sphere_sync::{ApiClient, MemoryTransport, Synchronizer, Tab, TransportMode};

use crate::components::{
    ChecklistDetailView, ChecklistDialog, ChecklistList, SphereDialog, SphereGrid, TabBar, TaskDialog, TaskOverview,
    ToastStack,
};
use crate::config;
use crate::context::AppContext;
use crate::store::{store_sync_key, AppState};

/// Connect to the configured endpoints, or fall back to the demo backend
fn connect() -> (ApiClient, Option<String>) {
    let connected = config::api_config().and_then(|config| {
        info!(
            "[APP] transport: {}",
            if config.mode == TransportMode::Http { "http" } else { "memory" }
        );
        ApiClient::connect(&config)
    });
    match connected {
        Ok(api) => (api, None),
        Err(err) => {
            error!("[APP] invalid API configuration, using demo data: {}", err);
            let api = ApiClient::new(Rc::new(MemoryTransport::with_demo_data()));
            (api, Some(format!("Using demo data: {}", err)))
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let (api, config_error) = connect();
    let sync = Synchronizer::new(api);

    let store = Store::new(AppState::default());
    sync.subscribe(move |key, cache| store_sync_key(&store, key, cache));

    let ctx = AppContext::new(sync);
    provide_context(ctx);
    provide_context(store);

    if let Some(message) = config_error {
        ctx.update_view(|v| {
            v.notify_error(message);
        });
    }

    // Only re-run the loads when the tab itself changes
    let tab = Memo::new(move |_| ctx.view.with(|v| v.tab));

    Effect::new(move |_| {
        let tab = tab.get();
        ctx.spawn(move |sync, _| async move {
            match tab {
                Tab::Spheres => {
                    sync.load_spheres().await;
                }
                Tab::Checklists => {
                    sync.load_checklists().await;
                    sync.load_spheres().await;
                }
                Tab::Tasks => {
                    sync.load_tasks().await;
                    sync.load_spheres().await;
                }
            }
        });
    });

    let viewing_detail = Memo::new(move |_| ctx.view.with(|v| v.detail.checklist_id().is_some()));

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Life Spheres"</h1>

                <TabBar />

                {move || match tab.get() {
                    Tab::Spheres => view! { <SphereGrid /> }.into_any(),
                    Tab::Checklists => {
                        if viewing_detail.get() {
                            view! { <ChecklistDetailView /> }.into_any()
                        } else {
                            view! { <ChecklistList /> }.into_any()
                        }
                    }
                    Tab::Tasks => view! { <TaskOverview /> }.into_any(),
                }}
            </main>

            <SphereDialog />
            <ChecklistDialog />
            <TaskDialog />
            <ToastStack />
        </div>
    }
}
