//! API Configuration
//!
//! Where the three collection endpoints live, and whether to talk to them
//! at all or run against the in-memory backend.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};
use crate::transport::Resource;

/// Which transport the client is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Http,
    /// In-process backend seeded with demo data
    #[default]
    Memory,
}

/// Endpoint configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub mode: TransportMode,
    pub spheres_url: String,
    pub checklists_url: String,
    pub tasks_url: String,
}

impl ApiConfig {
    /// HTTP configuration for the three endpoint URLs
    pub fn http(spheres_url: &str, checklists_url: &str, tasks_url: &str) -> Self {
        Self {
            mode: TransportMode::Http,
            spheres_url: spheres_url.to_string(),
            checklists_url: checklists_url.to_string(),
            tasks_url: tasks_url.to_string(),
        }
    }

    /// In-memory demo configuration
    pub fn memory() -> Self {
        Self::default()
    }

    /// Build from optional URLs (e.g. build-time environment).
    ///
    /// No URLs at all selects the in-memory backend; a partial set is an error.
    pub fn from_urls(spheres: Option<&str>, checklists: Option<&str>, tasks: Option<&str>) -> SyncResult<Self> {
        match (spheres, checklists, tasks) {
            (None, None, None) => Ok(Self::memory()),
            (Some(s), Some(c), Some(t)) => {
                let config = Self::http(s, c, t);
                config.validate()?;
                Ok(config)
            }
            _ => Err(SyncError::Config(
                "spheres, checklists and tasks URLs must be configured together".into(),
            )),
        }
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let config: ApiConfig =
            serde_json::from_str(json).map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn url_for(&self, resource: Resource) -> &str {
        match resource {
            Resource::Spheres => &self.spheres_url,
            Resource::Checklists => &self.checklists_url,
            Resource::Tasks => &self.tasks_url,
        }
    }

    /// HTTP mode needs an absolute URL for every endpoint
    pub fn validate(&self) -> SyncResult<()> {
        if self.mode == TransportMode::Memory {
            return Ok(());
        }
        for resource in Resource::ALL {
            let url = self.url_for(resource);
            reqwest::Url::parse(url)
                .map_err(|e| SyncError::Config(format!("{} url {:?}: {}", resource.as_str(), url, e)))?;
        }
        Ok(())
    }
}
