// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use crate::models::Locale;
use dotenv::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Secret used when SESSION_SECRET is missing; refused in production
pub const DEV_SESSION_SECRET: &str = "estate-portal-dev-secret";

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Listing backend base URL, always ending with '/'
    /// Format: https://host/api/v1/
    pub api_base_url: String,

    /// Server bind address (e.g., "127.0.0.1")
    pub server_address: String,

    /// Server listen port (default 3000)
    pub server_port: u16,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// HMAC secret for session cookies
    pub session_secret: String,

    /// Session lifetime in hours
    pub session_ttl_hours: u64,

    /// Locale used when the request does not name one
    pub default_locale: Locale,

    /// Timeout for every backend request, in seconds
    pub backend_timeout_secs: u64,

    /// Quiet period before a suggestion fetch, in milliseconds
    pub suggest_debounce_ms: u64,

    /// Login/signup attempts allowed per client per minute
    pub auth_rate_limit_per_minute: u32,

    /// Key the auth throttle on X-Forwarded-For / Forwarded (default false)
    /// Enable only behind a reverse proxy that sets those headers itself
    pub trust_proxy_headers: bool,
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        dotenv().ok();

        Config {
            api_base_url: normalize_base_url(
                &env::var("API_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/api/v1/".to_string()),
            ),

            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            server_port: parse_or("SERVER_PORT", 3000),

            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| DEV_SESSION_SECRET.to_string()),

            session_ttl_hours: parse_or("SESSION_TTL_HOURS", 168),

            default_locale: env::var("DEFAULT_LOCALE")
                .ok()
                .and_then(|v| Locale::from_code(&v))
                .unwrap_or(Locale::Ar),

            backend_timeout_secs: parse_or("BACKEND_TIMEOUT_SECS", 30),

            suggest_debounce_ms: parse_or("SUGGEST_DEBOUNCE_MS", 300),

            auth_rate_limit_per_minute: parse_or("AUTH_RATE_LIMIT_PER_MINUTE", 10),

            trust_proxy_headers: parse_or("TRUST_PROXY_HEADERS", false),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if !(self.api_base_url.starts_with("http://") || self.api_base_url.starts_with("https://"))
        {
            return Err(format!(
                "API_BASE_URL must be an http(s) URL, got '{}'",
                self.api_base_url
            ));
        }

        if self.session_secret.is_empty() {
            return Err("SESSION_SECRET must not be empty".to_string());
        }

        if self.is_production() && self.session_secret == DEV_SESSION_SECRET {
            return Err("SESSION_SECRET must be set in production".to_string());
        }

        if self.suggest_debounce_ms == 0 {
            log::warn!("SUGGEST_DEBOUNCE_MS is 0 - every keystroke will hit the backend");
        }

        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_secs(self.backend_timeout_secs)
    }

    pub fn suggest_debounce(&self) -> Duration {
        Duration::from_millis(self.suggest_debounce_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:8000/api/v1/".to_string(),
            server_address: "127.0.0.1".to_string(),
            server_port: 3000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            session_secret: DEV_SESSION_SECRET.to_string(),
            session_ttl_hours: 168,
            default_locale: Locale::Ar,
            backend_timeout_secs: 30,
            suggest_debounce_ms: 300,
            auth_rate_limit_per_minute: 10,
            trust_proxy_headers: false,
        }
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Ensure a trailing slash so endpoints join as `<base>endpoint`
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("https://api.example.com/api/v1"),
            "https://api.example.com/api/v1/"
        );
        assert_eq!(
            normalize_base_url(" https://api.example.com/api/v1/ "),
            "https://api.example.com/api/v1/"
        );
    }

    #[test]
    fn test_validate_rejects_dev_secret_in_production() {
        let config = Config {
            environment: "production".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            environment: "production".to_string(),
            session_secret: "a-real-secret".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let config = Config {
            api_base_url: "ftp://example.com/".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
