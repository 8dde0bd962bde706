// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components and register every route

pub mod areas;
pub mod auth;
pub mod blogs;
pub mod contact;
pub mod dashboard;
pub mod guards;
pub mod health;
pub mod properties;

pub use areas::config as areas_config;
pub use auth::config as auth_config;
pub use blogs::config as blogs_config;
pub use contact::config as contact_config;
pub use dashboard::config as dashboard_config;
pub use guards::{AgentSession, AuthSession, Session};
pub use health::config as health_config;
pub use properties::config as properties_config;

use crate::errors::PortalError;
use actix_web::web;
use serde_json::Value;

/// Register every route group
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health_config)
        .configure(auth_config)
        .configure(properties_config)
        .configure(areas_config)
        .configure(blogs_config)
        .configure(contact_config)
        .configure(dashboard_config);
}

/// Accept an id or slug only if it is safe to splice into a backend path
pub(crate) fn path_segment(raw: &str) -> Result<&str, PortalError> {
    let segment = raw.trim();
    let valid = !segment.is_empty()
        && segment.len() <= 200
        && segment
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(segment)
    } else {
        Err(PortalError::InvalidInput(format!("invalid path segment '{}'", raw)))
    }
}

/// Human-readable message from a backend acknowledgement
pub(crate) fn message_of(response: &Value) -> Option<String> {
    ["message", "msg", "status"]
        .iter()
        .filter_map(|key| response.get(*key).and_then(Value::as_str))
        .find(|m| !m.is_empty())
        .map(str::to_string)
}
