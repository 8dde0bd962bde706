// src/lib.rs
// DOCUMENTATION: Library root for the estate portal gateway
// PURPOSE: Share modules and application state between the server,
// the area-picker binary and integration tests

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use actix_web::web;
use config::Config;
use errors::PortalError;
use services::{AuthThrottle, BackendClient, SessionKeys};

/// Shared application state
/// DOCUMENTATION: Built once at startup, cloned into every worker.
/// Each piece is registered as its own `web::Data` so handlers extract
/// only what they use.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub client: web::Data<BackendClient>,
    pub keys: web::Data<SessionKeys>,
    pub throttle: web::Data<AuthThrottle>,
}

impl AppState {
    pub fn from_config(config: Config) -> Result<Self, PortalError> {
        let client = BackendClient::from_config(&config)?;
        let keys = SessionKeys::from_config(&config);
        let throttle = AuthThrottle::per_minute(config.auth_rate_limit_per_minute)
            .trusting_forwarded(config.trust_proxy_headers);

        Ok(AppState {
            config: web::Data::new(config),
            client: web::Data::new(client),
            keys: web::Data::new(keys),
            throttle: web::Data::new(throttle),
        })
    }

    /// Register state and every route on an app
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.client.clone())
            .app_data(self.keys.clone())
            .app_data(self.throttle.clone());
        handlers::configure(cfg);
    }
}
