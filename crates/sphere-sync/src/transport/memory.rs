//! In-Memory Transport
//!
//! Emulates the spheres/checklists/tasks endpoints in-process: newest-first
//! listings, server-side defaults, joined sphere fields and task counts on
//! checklists, 404 for a missing detail, `null` for a missing update target,
//! cascading deletes and foreign-key rejection. Backs the offline demo and the
//! test suite, which can also inject failures and inspect the request log.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use log::{debug, warn};
use serde::Serialize;
use serde_json::{json, Value};

use super::{ApiRequest, Method, Resource, Transport};
use crate::domain::{Checklist, ChecklistDetail, Priority, Sphere, Task, DEFAULT_COLOR, DEFAULT_ICON};
use crate::error::{SyncError, SyncResult};

#[derive(Debug, Clone)]
struct ChecklistRow {
    id: u32,
    title: String,
    description: Option<String>,
    sphere_id: u32,
    created_at: NaiveDateTime,
}

#[derive(Debug, Default)]
struct Tables {
    spheres: Vec<Sphere>,
    checklists: Vec<ChecklistRow>,
    tasks: Vec<Task>,
    last_id: u32,
    offline: bool,
    failures: VecDeque<SyncError>,
    log: Vec<ApiRequest>,
}

/// In-process stand-in for the three endpoints
#[derive(Debug, Default)]
pub struct MemoryTransport {
    tables: RefCell<Tables>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-populated with a couple of spheres, checklists and tasks
    pub fn with_demo_data() -> Self {
        let transport = Self::new();
        if let Err(err) = transport.tables.borrow_mut().seed_demo() {
            warn!("[MEMORY] demo data incomplete: {}", err);
        }
        transport
    }

    /// Make every following request fail as if the network were down
    pub fn set_offline(&self, offline: bool) {
        self.tables.borrow_mut().offline = offline;
    }

    /// Fail the next request with the given error
    pub fn fail_next(&self, error: SyncError) {
        self.tables.borrow_mut().failures.push_back(error);
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.tables.borrow().log.clone()
    }

    pub fn request_count(&self, method: Method, resource: Resource) -> usize {
        self.tables
            .borrow()
            .log
            .iter()
            .filter(|r| r.method == method && r.resource == resource)
            .count()
    }

    pub fn clear_requests(&self) {
        self.tables.borrow_mut().log.clear();
    }

    /// Insert a sphere directly, bypassing the request log
    pub fn seed_sphere(&self, name: &str, icon: &str, color: &str) -> Sphere {
        self.tables.borrow_mut().insert_sphere(name, icon, color)
    }

    /// Spheres as the backend would list them
    pub fn stored_spheres(&self) -> Vec<Sphere> {
        self.tables.borrow().spheres.iter().rev().cloned().collect()
    }

    /// Tasks as the backend would list them
    pub fn stored_tasks(&self) -> Vec<Task> {
        self.tables.borrow().tasks.iter().rev().cloned().collect()
    }
}

#[async_trait(?Send)]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> SyncResult<Value> {
        let mut tables = self.tables.borrow_mut();
        tables.log.push(request.clone());
        if tables.offline {
            return Err(SyncError::Transport("backend unreachable".into()));
        }
        if let Some(err) = tables.failures.pop_front() {
            return Err(err);
        }
        debug!("[MEMORY] {}", request);
        tables.handle(&request)
    }
}

impl Tables {
    fn next_id(&mut self) -> u32 {
        self.last_id += 1;
        self.last_id
    }

    fn handle(&mut self, request: &ApiRequest) -> SyncResult<Value> {
        match (request.resource, request.method) {
            (Resource::Spheres, Method::Get) => match request.id {
                Some(id) => match self.spheres.iter().find(|s| s.id == id) {
                    Some(sphere) => to_json(sphere),
                    None => Ok(Value::Null),
                },
                None => to_json(&self.spheres.iter().rev().collect::<Vec<_>>()),
            },
            (Resource::Spheres, Method::Post) => {
                let body = body(request)?;
                let name = required_str(body, "name")?;
                let icon = optional_str(body, "icon").unwrap_or(DEFAULT_ICON);
                let color = optional_str(body, "color").unwrap_or(DEFAULT_COLOR);
                let sphere = self.insert_sphere(name, icon, color);
                to_json(&sphere)
            }
            (Resource::Spheres, Method::Put) => {
                let body = body(request)?;
                let Some(id) = body_id(body) else { return Ok(Value::Null) };
                let name = required_str(body, "name")?.to_string();
                let icon = required_str(body, "icon")?.to_string();
                let color = required_str(body, "color")?.to_string();
                match self.spheres.iter_mut().find(|s| s.id == id) {
                    Some(sphere) => {
                        sphere.name = name;
                        sphere.icon = icon;
                        sphere.color = color;
                        to_json(&*sphere)
                    }
                    None => Ok(Value::Null),
                }
            }
            (Resource::Spheres, Method::Delete) => {
                if let Some(id) = request.id {
                    self.spheres.retain(|s| s.id != id);
                    self.checklists.retain(|c| c.sphere_id != id);
                    self.tasks.retain(|t| t.sphere_id != id);
                }
                Ok(deleted(request.id))
            }

            (Resource::Checklists, Method::Get) => match request.id {
                Some(id) => match self.checklists.iter().find(|c| c.id == id) {
                    Some(row) => {
                        let detail = ChecklistDetail {
                            checklist: self.summary(row),
                            tasks: self.tasks.iter().filter(|t| t.checklist_id == id).cloned().collect(),
                        };
                        to_json(&detail)
                    }
                    None => Err(SyncError::Status {
                        status: 404,
                        message: "Not found".into(),
                    }),
                },
                None => {
                    let summaries: Vec<Checklist> =
                        self.checklists.iter().rev().map(|row| self.summary(row)).collect();
                    to_json(&summaries)
                }
            },
            (Resource::Checklists, Method::Post) => {
                let body = body(request)?;
                let title = required_str(body, "title")?;
                let description = optional_str(body, "description").or(Some(""));
                let sphere_id = required_id(body, "sphere_id")?;
                let row = self.insert_checklist(title, description, sphere_id)?;
                to_json(&self.summary(&row))
            }
            (Resource::Checklists, Method::Put) => {
                let body = body(request)?;
                let Some(id) = body_id(body) else { return Ok(Value::Null) };
                let title = required_str(body, "title")?.to_string();
                let description = optional_str(body, "description").map(str::to_string);
                let sphere_id = required_id(body, "sphere_id")?;
                self.check_sphere(sphere_id)?;
                let Some(row) = self.checklists.iter_mut().find(|c| c.id == id) else {
                    return Ok(Value::Null);
                };
                row.title = title;
                row.description = description;
                row.sphere_id = sphere_id;
                let row = row.clone();
                to_json(&self.summary(&row))
            }
            (Resource::Checklists, Method::Delete) => {
                if let Some(id) = request.id {
                    self.checklists.retain(|c| c.id != id);
                    self.tasks.retain(|t| t.checklist_id != id);
                }
                Ok(deleted(request.id))
            }

            (Resource::Tasks, Method::Get) => to_json(&self.tasks.iter().rev().collect::<Vec<_>>()),
            (Resource::Tasks, Method::Post) => {
                let body = body(request)?;
                let title = required_str(body, "title")?;
                let description = optional_str(body, "description").or(Some(""));
                let checklist_id = required_id(body, "checklist_id")?;
                let sphere_id = required_id(body, "sphere_id")?;
                let priority = match body.get("priority") {
                    None | Some(Value::Null) => Priority::default(),
                    Some(value) => priority(value)?,
                };
                let task = self.insert_task(title, description, checklist_id, sphere_id, priority)?;
                to_json(&task)
            }
            (Resource::Tasks, Method::Put) => {
                let body = body(request)?;
                let Some(id) = body_id(body) else { return Ok(Value::Null) };
                let title = required_str(body, "title")?.to_string();
                let description = optional_str(body, "description").map(str::to_string);
                let is_completed = body
                    .get("is_completed")
                    .and_then(Value::as_bool)
                    .ok_or_else(|| not_null("is_completed"))?;
                let priority = priority(body.get("priority").unwrap_or(&Value::Null))?;
                match self.tasks.iter_mut().find(|t| t.id == id) {
                    Some(task) => {
                        task.title = title;
                        task.description = description;
                        task.is_completed = is_completed;
                        task.priority = priority;
                        to_json(&*task)
                    }
                    None => Ok(Value::Null),
                }
            }
            (Resource::Tasks, Method::Delete) => {
                if let Some(id) = request.id {
                    self.tasks.retain(|t| t.id != id);
                }
                Ok(deleted(request.id))
            }
        }
    }

    fn seed_demo(&mut self) -> SyncResult<()> {
        let health = self.insert_sphere("Health", "Heart", "#10B981");
        let work = self.insert_sphere("Work", "Briefcase", "#0EA5E9");
        let morning = self.insert_checklist("Morning Routine", Some(""), health.id)?;
        let review = self.insert_checklist("Weekly Review", Some("Every Friday"), work.id)?;
        self.insert_task("Drink water", Some(""), morning.id, health.id, Priority::Low)?;
        self.insert_task("Stretch", Some("Ten minutes"), morning.id, health.id, Priority::Medium)?;
        self.insert_task("Clear inbox", Some(""), review.id, work.id, Priority::High)?;
        Ok(())
    }

    fn insert_sphere(&mut self, name: &str, icon: &str, color: &str) -> Sphere {
        let sphere = Sphere {
            id: self.next_id(),
            name: name.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            created_at: Some(Utc::now().naive_utc()),
        };
        self.spheres.push(sphere.clone());
        sphere
    }

    fn insert_checklist(&mut self, title: &str, description: Option<&str>, sphere_id: u32) -> SyncResult<ChecklistRow> {
        self.check_sphere(sphere_id)?;
        let row = ChecklistRow {
            id: self.next_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            sphere_id,
            created_at: Utc::now().naive_utc(),
        };
        self.checklists.push(row.clone());
        Ok(row)
    }

    fn insert_task(
        &mut self,
        title: &str,
        description: Option<&str>,
        checklist_id: u32,
        sphere_id: u32,
        priority: Priority,
    ) -> SyncResult<Task> {
        if !self.checklists.iter().any(|c| c.id == checklist_id) {
            return Err(foreign_key("tasks", "checklist_id"));
        }
        self.check_sphere(sphere_id)?;
        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            description: description.map(str::to_string),
            checklist_id,
            sphere_id,
            is_completed: false,
            priority,
            created_at: Some(Utc::now().naive_utc()),
        };
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn check_sphere(&self, sphere_id: u32) -> SyncResult<()> {
        if self.spheres.iter().any(|s| s.id == sphere_id) {
            Ok(())
        } else {
            Err(foreign_key("checklists", "sphere_id"))
        }
    }

    /// Checklist row joined with its sphere and task count
    fn summary(&self, row: &ChecklistRow) -> Checklist {
        let sphere = self.spheres.iter().find(|s| s.id == row.sphere_id);
        Checklist {
            id: row.id,
            title: row.title.clone(),
            description: row.description.clone(),
            sphere_id: row.sphere_id,
            sphere_name: sphere.map(|s| s.name.clone()),
            sphere_color: sphere.map(|s| s.color.clone()),
            sphere_icon: sphere.map(|s| s.icon.clone()),
            tasks_count: self.tasks.iter().filter(|t| t.checklist_id == row.id).count() as u32,
            created_at: Some(row.created_at),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> SyncResult<Value> {
    Ok(serde_json::to_value(value)?)
}

fn deleted(id: Option<u32>) -> Value {
    json!({ "success": true, "id": id.map(|id| id.to_string()) })
}

fn body(request: &ApiRequest) -> SyncResult<&Value> {
    request.body.as_ref().ok_or_else(|| SyncError::Status {
        status: 400,
        message: "request body is required".into(),
    })
}

fn body_id(body: &Value) -> Option<u32> {
    body.get("id").and_then(Value::as_u64).map(|id| id as u32)
}

fn optional_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

fn required_str<'a>(body: &'a Value, key: &str) -> SyncResult<&'a str> {
    optional_str(body, key).ok_or_else(|| not_null(key))
}

fn required_id(body: &Value, key: &str) -> SyncResult<u32> {
    body.get(key)
        .and_then(Value::as_u64)
        .map(|id| id as u32)
        .ok_or_else(|| not_null(key))
}

fn priority(value: &Value) -> SyncResult<Priority> {
    value
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .ok_or_else(|| SyncError::Status {
            status: 500,
            message: format!("invalid priority: {}", value),
        })
}

fn not_null(column: &str) -> SyncError {
    SyncError::Status {
        status: 500,
        message: format!("null value in column \"{}\" violates not-null constraint", column),
    }
}

fn foreign_key(table: &str, column: &str) -> SyncError {
    SyncError::Status {
        status: 500,
        message: format!("insert or update on table \"{}\" violates foreign key constraint on {}", table, column),
    }
}
