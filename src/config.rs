//! Frontend Configuration
//!
//! Endpoint URLs are baked in at build time:
//! `SPHERES_API`, `CHECKLISTS_API` and `TASKS_API`. Leaving all three unset
//! runs the app against the in-memory demo backend.

use log::Level;
use sphere_sync::{ApiConfig, SyncResult};

pub fn api_config() -> SyncResult<ApiConfig> {
    ApiConfig::from_urls(
        option_env!("SPHERES_API"),
        option_env!("CHECKLISTS_API"),
        option_env!("TASKS_API"),
    )
}

/// `LIFE_SPHERES_LOG` = error | warn | info | debug | trace (default: info)
pub fn log_level() -> Level {
    match option_env!("LIFE_SPHERES_LOG") {
        Some("error") => Level::Error,
        Some("warn") => Level::Warn,
        Some("debug") => Level::Debug,
        Some("trace") => Level::Trace,
        _ => Level::Info,
    }
}
