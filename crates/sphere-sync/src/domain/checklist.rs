//! Checklist Entity
//!
//! A named collection of tasks belonging to exactly one sphere. The list
//! endpoint returns summaries; the detail endpoint embeds the task list.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::task::Task;
use super::timestamp;
use crate::error::{SyncError, SyncResult};

/// Checklist summary with the denormalized sphere fields supplied by the read endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sphere_id: u32,
    #[serde(default)]
    pub sphere_name: Option<String>,
    #[serde(default)]
    pub sphere_color: Option<String>,
    #[serde(default)]
    pub sphere_icon: Option<String>,
    #[serde(default)]
    pub tasks_count: u32,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl Entity for Checklist {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Single checklist with its tasks, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistDetail {
    #[serde(flatten)]
    pub checklist: Checklist,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl ChecklistDetail {
    pub fn id(&self) -> u32 {
        self.checklist.id
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed).count()
    }
}

/// Editable checklist fields, used for both create and full update
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChecklistDraft {
    pub title: String,
    pub description: String,
    pub sphere_id: Option<u32>,
}

impl ChecklistDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, sphere_id: u32) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            sphere_id: Some(sphere_id),
        }
    }

    pub fn from_checklist(checklist: &Checklist) -> Self {
        Self {
            title: checklist.title.clone(),
            description: checklist.description.clone().unwrap_or_default(),
            sphere_id: Some(checklist.sphere_id),
        }
    }

    /// Check required fields; returns the owning sphere ID
    pub fn validate(&self) -> SyncResult<u32> {
        if self.title.trim().is_empty() {
            return Err(SyncError::Validation("checklist title is required".into()));
        }
        self.sphere_id
            .ok_or_else(|| SyncError::Validation("choose a sphere for the checklist".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_summary_with_missing_sphere() {
        let json = r#"{"id": 1, "title": "Morning Routine", "description": "", "sphere_id": 9,
                       "sphere_name": null, "sphere_color": null, "sphere_icon": null,
                       "tasks_count": 0, "created_at": "2024-05-01 08:30:00",
                       "updated_at": "2024-05-01 08:30:00"}"#;
        let checklist: Checklist = serde_json::from_str(json).unwrap();
        assert_eq!(checklist.sphere_id, 9);
        assert!(checklist.sphere_name.is_none());
        assert_eq!(checklist.tasks_count, 0);
    }

    #[test]
    fn test_decode_detail_with_tasks() {
        let json = r#"{"id": 1, "title": "Morning Routine", "sphere_id": 2, "tasks_count": 2,
                       "tasks": [
                         {"id": 10, "title": "Drink water", "checklist_id": 1, "sphere_id": 2,
                          "is_completed": true, "priority": "low"},
                         {"id": 11, "title": "Stretch", "checklist_id": 1, "sphere_id": 2}
                       ]}"#;
        let detail: ChecklistDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.id(), 1);
        assert_eq!(detail.tasks.len(), 2);
        assert_eq!(detail.completed_count(), 1);
        assert_eq!(detail.checklist.tasks_count, 2);
    }

    #[test]
    fn test_draft_requires_title_and_sphere() {
        assert!(ChecklistDraft::default().validate().is_err());
        let no_sphere = ChecklistDraft {
            title: "Evening".into(),
            ..Default::default()
        };
        assert!(no_sphere.validate().is_err());
        assert_eq!(ChecklistDraft::new("Evening", "", 4).validate().unwrap(), 4);
    }
}
