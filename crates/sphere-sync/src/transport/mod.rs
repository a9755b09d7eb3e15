//! Transport Layer
//!
//! The seam between typed API calls and the wire. `HttpTransport` talks to
//! the real endpoints; `MemoryTransport` emulates them in-process.

mod http;
mod memory;

use std::fmt;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ApiConfig, TransportMode};
use crate::error::SyncResult;

pub use http::HttpTransport;
pub use memory::MemoryTransport;

/// The three remote collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Spheres,
    Checklists,
    Tasks,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Resource::Spheres, Resource::Checklists, Resource::Tasks];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Spheres => "spheres",
            Resource::Checklists => "checklists",
            Resource::Tasks => "tasks",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = match self {
            Resource::Spheres => "sphere",
            Resource::Checklists => "checklist",
            Resource::Tasks => "task",
        };
        f.write_str(noun)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One request against a collection endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub resource: Resource,
    /// Sent as the `?id=` query parameter
    pub id: Option<u32>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn list(resource: Resource) -> Self {
        Self { method: Method::Get, resource, id: None, body: None }
    }

    pub fn get(resource: Resource, id: u32) -> Self {
        Self { method: Method::Get, resource, id: Some(id), body: None }
    }

    pub fn post(resource: Resource, body: Value) -> Self {
        Self { method: Method::Post, resource, id: None, body: Some(body) }
    }

    pub fn put(resource: Resource, body: Value) -> Self {
        Self { method: Method::Put, resource, id: None, body: Some(body) }
    }

    pub fn delete(resource: Resource, id: u32) -> Self {
        Self { method: Method::Delete, resource, id: Some(id), body: None }
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method.as_str(), self.resource.as_str())?;
        if let Some(id) = self.id {
            write!(f, "?id={}", id)?;
        }
        Ok(())
    }
}

/// Sends a request and yields the decoded JSON body.
///
/// Single-threaded: futures are not required to be `Send`, which lets the
/// browser fetch API sit behind the same trait.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> SyncResult<Value>;
}

/// Build the transport selected by the configuration
pub fn connect(config: &ApiConfig) -> SyncResult<Rc<dyn Transport>> {
    match config.mode {
        TransportMode::Http => Ok(Rc::new(HttpTransport::new(config.clone())?)),
        TransportMode::Memory => Ok(Rc::new(MemoryTransport::with_demo_data())),
    }
}
