//! API Client
//!
//! Typed wrappers over the three collection endpoints, organized by domain.
//! Update calls always send the full set of mutable fields.

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::domain::{Checklist, ChecklistDetail, ChecklistDraft, Priority, Sphere, SphereDraft, Task, TaskDraft};
use crate::error::{SyncError, SyncResult};
use crate::transport::{self, ApiRequest, Resource, Transport};

// ========================
// Payload Structs
// ========================

#[derive(Serialize)]
struct SpherePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    name: &'a str,
    icon: &'a str,
    color: &'a str,
}

#[derive(Serialize)]
struct ChecklistPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<u32>,
    title: &'a str,
    description: &'a str,
    sphere_id: u32,
}

#[derive(Serialize)]
struct NewTaskPayload<'a> {
    title: &'a str,
    description: &'a str,
    checklist_id: u32,
    sphere_id: u32,
    priority: Priority,
}

#[derive(Serialize)]
struct TaskUpdatePayload<'a> {
    id: u32,
    title: &'a str,
    description: Option<&'a str>,
    is_completed: bool,
    priority: Priority,
}

// ========================
// Client
// ========================

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Client over the transport the configuration selects
    pub fn connect(config: &ApiConfig) -> SyncResult<Self> {
        Ok(Self::new(transport::connect(config)?))
    }

    async fn call<T: DeserializeOwned>(&self, request: ApiRequest) -> SyncResult<T> {
        let value = self.transport.send(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Like `call`, but a `null` body means the target row does not exist
    async fn call_existing<T: DeserializeOwned>(&self, request: ApiRequest, resource: Resource, id: u32) -> SyncResult<T> {
        match self.transport.send(request).await? {
            Value::Null => Err(SyncError::NotFound { resource, id }),
            value => Ok(serde_json::from_value(value)?),
        }
    }

    async fn delete(&self, resource: Resource, id: u32) -> SyncResult<()> {
        self.transport.send(ApiRequest::delete(resource, id)).await?;
        Ok(())
    }

    // ---- spheres ----

    pub async fn list_spheres(&self) -> SyncResult<Vec<Sphere>> {
        self.call(ApiRequest::list(Resource::Spheres)).await
    }

    pub async fn create_sphere(&self, draft: &SphereDraft) -> SyncResult<Sphere> {
        draft.validate()?;
        let body = serde_json::to_value(SpherePayload {
            id: None,
            name: draft.name.trim(),
            icon: &draft.icon,
            color: &draft.color,
        })?;
        self.call(ApiRequest::post(Resource::Spheres, body)).await
    }

    pub async fn update_sphere(&self, id: u32, draft: &SphereDraft) -> SyncResult<Sphere> {
        draft.validate()?;
        let body = serde_json::to_value(SpherePayload {
            id: Some(id),
            name: draft.name.trim(),
            icon: &draft.icon,
            color: &draft.color,
        })?;
        self.call_existing(ApiRequest::put(Resource::Spheres, body), Resource::Spheres, id).await
    }

    pub async fn delete_sphere(&self, id: u32) -> SyncResult<()> {
        self.delete(Resource::Spheres, id).await
    }

    // ---- checklists ----

    pub async fn list_checklists(&self) -> SyncResult<Vec<Checklist>> {
        self.call(ApiRequest::list(Resource::Checklists)).await
    }

    /// Single checklist with its nested tasks
    pub async fn get_checklist(&self, id: u32) -> SyncResult<ChecklistDetail> {
        self.call(ApiRequest::get(Resource::Checklists, id))
            .await
            .map_err(|err| match err {
                SyncError::Status { status: 404, .. } => SyncError::NotFound {
                    resource: Resource::Checklists,
                    id,
                },
                other => other,
            })
    }

    pub async fn create_checklist(&self, draft: &ChecklistDraft) -> SyncResult<Checklist> {
        let sphere_id = draft.validate()?;
        let body = serde_json::to_value(ChecklistPayload {
            id: None,
            title: draft.title.trim(),
            description: &draft.description,
            sphere_id,
        })?;
        self.call(ApiRequest::post(Resource::Checklists, body)).await
    }

    pub async fn update_checklist(&self, id: u32, draft: &ChecklistDraft) -> SyncResult<Checklist> {
        let sphere_id = draft.validate()?;
        let body = serde_json::to_value(ChecklistPayload {
            id: Some(id),
            title: draft.title.trim(),
            description: &draft.description,
            sphere_id,
        })?;
        self.call_existing(ApiRequest::put(Resource::Checklists, body), Resource::Checklists, id).await
    }

    pub async fn delete_checklist(&self, id: u32) -> SyncResult<()> {
        self.delete(Resource::Checklists, id).await
    }

    // ---- tasks ----

    pub async fn list_tasks(&self) -> SyncResult<Vec<Task>> {
        self.call(ApiRequest::list(Resource::Tasks)).await
    }

    /// Create a task in `checklist`; the task inherits the checklist's sphere
    pub async fn create_task(&self, checklist: &Checklist, draft: &TaskDraft) -> SyncResult<Task> {
        draft.validate()?;
        let body = serde_json::to_value(NewTaskPayload {
            title: draft.title.trim(),
            description: &draft.description,
            checklist_id: checklist.id,
            sphere_id: checklist.sphere_id,
            priority: draft.priority,
        })?;
        self.call(ApiRequest::post(Resource::Tasks, body)).await
    }

    /// Replace title, description, completion and priority of a task
    pub async fn update_task(&self, task: &Task) -> SyncResult<Task> {
        if task.title.trim().is_empty() {
            return Err(SyncError::Validation("task title is required".into()));
        }
        let body = serde_json::to_value(TaskUpdatePayload {
            id: task.id,
            title: &task.title,
            description: task.description.as_deref(),
            is_completed: task.is_completed,
            priority: task.priority,
        })?;
        self.call_existing(ApiRequest::put(Resource::Tasks, body), Resource::Tasks, task.id).await
    }

    pub async fn delete_task(&self, id: u32) -> SyncResult<()> {
        self.delete(Resource::Tasks, id).await
    }
}
