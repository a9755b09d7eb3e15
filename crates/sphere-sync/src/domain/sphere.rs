//! Sphere Entity
//!
//! A user-defined life area that groups checklists.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::timestamp;
use crate::error::{SyncError, SyncResult};

/// Icon the server assigns when none is supplied
pub const DEFAULT_ICON: &str = "Circle";
/// Color the server assigns when none is supplied
pub const DEFAULT_COLOR: &str = "#8B5CF6";

/// Icons offered by the sphere form
pub const ICON_OPTIONS: &[&str] = &[
    "Home", "Briefcase", "Heart", "Star", "Zap", "Coffee", "Book", "Music", "Dumbbell", "Paintbrush",
];

/// Colors offered by the sphere form
pub const COLOR_OPTIONS: &[&str] = &[
    "#F97316", "#8B5CF6", "#D946EF", "#0EA5E9", "#10B981", "#F59E0B", "#EF4444", "#06B6D4",
];

/// A life sphere as returned by the spheres endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<NaiveDateTime>,
}

impl Entity for Sphere {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Editable sphere fields, used for both create and full update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDraft {
    pub name: String,
    pub icon: String,
    pub color: String,
}

impl Default for SphereDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            icon: DEFAULT_ICON.to_string(),
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl SphereDraft {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
        }
    }

    /// Prefill from an existing sphere (edit dialog)
    pub fn from_sphere(sphere: &Sphere) -> Self {
        Self::new(sphere.name.clone(), sphere.icon.clone(), sphere.color.clone())
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.name.trim().is_empty() {
            return Err(SyncError::Validation("sphere name is required".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_defaults_match_server_defaults() {
        let draft = SphereDraft::default();
        assert_eq!(draft.icon, "Circle");
        assert_eq!(draft.color, "#8B5CF6");
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let draft = SphereDraft::new("   ", "Heart", "#10B981");
        assert!(matches!(draft.validate(), Err(SyncError::Validation(_))));
    }

    #[test]
    fn test_decode_endpoint_row() {
        let json = r##"{"id": 3, "name": "Health", "icon": "Heart", "color": "#10B981",
                        "created_at": "2024-05-01 08:30:00.123456"}"##;
        let sphere: Sphere = serde_json::from_str(json).unwrap();
        assert_eq!(sphere.id(), 3);
        assert_eq!(sphere.name, "Health");
        assert!(sphere.created_at.is_some());
        assert_eq!(SphereDraft::from_sphere(&sphere).icon, "Heart");
    }
}
