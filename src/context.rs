//! Application Context
//!
//! Shared state provided via Leptos Context API: the synchronizer and the
//! view state it drives.

use std::rc::Rc;

use leptos::prelude::*;
use sphere_sync::{Synchronizer, ViewHandle, ViewState};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    sync: StoredValue<Rc<Synchronizer>, LocalStorage>,
    /// Tab, detail slot, dialogs and notifications
    pub view: RwSignal<ViewState>,
}

impl AppContext {
    pub fn new(sync: Synchronizer) -> Self {
        Self {
            sync: StoredValue::new_local(Rc::new(sync)),
            view: RwSignal::new(ViewState::new()),
        }
    }

    pub fn sync(&self) -> Rc<Synchronizer> {
        self.sync.get_value()
    }

    /// Handle the synchronizer writes view changes through
    pub fn handle(&self) -> SignalView {
        SignalView(self.view)
    }

    /// Run a synchronizer operation in the background
    pub fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(Rc<Synchronizer>, SignalView) -> Fut + 'static,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        let fut = op(self.sync(), self.handle());
        leptos::task::spawn_local(fut);
    }

    /// Mutate view state directly (open dialogs, switch tabs, ...)
    pub fn update_view(&self, f: impl FnOnce(&mut ViewState)) {
        self.view.update(f);
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

/// [`ViewHandle`] over the view-state signal
#[derive(Clone, Copy)]
pub struct SignalView(RwSignal<ViewState>);

impl ViewHandle for SignalView {
    fn read_view<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
        self.0.with_untracked(f)
    }

    fn update_view<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        f(&mut self.0.write())
    }
}

/// Blocking browser confirmation used before deletes
pub fn browser_confirm(prompt: &str) -> bool {
    window().confirm_with_message(prompt).unwrap_or(false)
}
