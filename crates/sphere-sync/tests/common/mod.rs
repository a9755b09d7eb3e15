//! Shared setup for the synchronizer integration tests

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use sphere_sync::{ApiClient, MemoryTransport, Synchronizer, ViewState};

pub struct Harness {
    pub backend: Rc<MemoryTransport>,
    pub sync: Synchronizer,
    pub view: RefCell<ViewState>,
}

pub fn setup() -> Harness {
    let backend = Rc::new(MemoryTransport::new());
    let sync = Synchronizer::new(ApiClient::new(backend.clone()));
    Harness {
        backend,
        sync,
        view: RefCell::new(ViewState::new()),
    }
}

pub fn accept(_: &str) -> bool {
    true
}

pub fn decline(_: &str) -> bool {
    false
}
