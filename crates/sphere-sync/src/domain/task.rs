//! Task Entity
//!
//! A single actionable item inside a checklist.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::timestamp;
use crate::error::{SyncError, SyncResult};

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(SyncError::Validation(format!("invalid priority: {}", other))),
        }
    }
}

/// A task as embedded in checklist detail or listed by the tasks endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub checklist_id: u32,
    /// Inherited from the checklist at creation, never revised on its own
    pub sphere_id: u32,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl Task {
    /// Copy of this task with the completion flag flipped and every other field kept
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }

    /// Copy of this task with the draft's editable fields applied
    pub fn with_draft(&self, draft: &TaskDraft) -> Self {
        Self {
            title: draft.title.clone(),
            description: Some(draft.description.clone()),
            priority: draft.priority,
            ..self.clone()
        }
    }
}

impl Entity for Task {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Fields entered in the task form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
        }
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.title.trim().is_empty() {
            return Err(SyncError::Validation("task title is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task {
            id: 7,
            title: "Drink water".into(),
            description: Some("Two glasses".into()),
            checklist_id: 2,
            sphere_id: 1,
            is_completed: false,
            priority: Priority::Low,
            created_at: None,
        }
    }

    #[test]
    fn test_toggle_keeps_other_fields() {
        let task = sample();
        let toggled = task.toggled();
        assert!(toggled.is_completed);
        assert_eq!(toggled.title, task.title);
        assert_eq!(toggled.description, task.description);
        assert_eq!(toggled.priority, task.priority);
        assert!(!toggled.toggled().is_completed);
    }

    #[test]
    fn test_with_draft_preserves_completion_and_owners() {
        let mut task = sample();
        task.is_completed = true;
        let edited = task.with_draft(&TaskDraft::new("Drink more water", Priority::High));
        assert!(edited.is_completed);
        assert_eq!(edited.checklist_id, 2);
        assert_eq!(edited.sphere_id, 1);
        assert_eq!(edited.priority, Priority::High);
    }

    #[test]
    fn test_priority_serialization() {
        assert_eq!(Priority::Low.as_str(), "low");
        assert_eq!("high".parse::<Priority>(), Ok(Priority::High));
        assert!(matches!("urgent".parse::<Priority>(), Err(SyncError::Validation(_))));
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        assert_eq!(Priority::default().label(), "Medium");
    }

    #[test]
    fn test_decode_defaults() {
        let json = r#"{"id": 1, "title": "Stretch", "checklist_id": 4, "sphere_id": 2}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.is_completed);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.description.is_none());
    }
}
