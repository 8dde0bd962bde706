// src/services/session.rs
// DOCUMENTATION: Signed session cookies
// PURPOSE: Resolve who the caller is from a verified credential, once per request

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::{AuthGrant, Locale, Role};
use crate::services::backend_client::CallContext;
use actix_web::cookie::{time, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session";

/// Cookies written by older frontends; cleared on logout
pub const LEGACY_COOKIES: [&str; 3] = ["token", "user", "user_data"];

/// Claims carried by the session cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Backend user id
    pub sub: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Backend bearer token
    pub token: String,
    /// Session id, one per login
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn call_context(&self, locale: Locale) -> CallContext {
        CallContext::authenticated(self.token.clone(), locale)
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }

    /// Claims safe to hand to the browser (no bearer token)
    pub fn public_view(&self) -> serde_json::Value {
        json!({
            "id": self.sub,
            "name": self.name,
            "email": self.email,
            "role": self.role,
            "expires_at": self.exp,
        })
    }
}

/// HS256 keys and cookie policy
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    secure: bool,
}

impl SessionKeys {
    pub fn new(secret: &str, ttl_hours: u64, secure: bool) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours.min(24 * 365) as i64),
            secure,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.session_secret, config.session_ttl_hours, config.is_production())
    }

    /// Sign claims for a backend login grant
    pub fn issue(&self, grant: &AuthGrant) -> Result<(SessionClaims, String), PortalError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: grant.user.id.clone(),
            name: grant.user.name.clone(),
            email: grant.user.email.clone(),
            role: Role::from_label(&grant.user.role),
            token: grant.token.clone(),
            sid: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let signed = encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| PortalError::InternalError(format!("Failed to sign session: {}", e)))?;

        Ok((claims, signed))
    }

    /// Verify signature and expiry
    pub fn verify(&self, signed: &str) -> Result<SessionClaims, PortalError> {
        decode::<SessionClaims>(signed, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                log::warn!("Rejected session cookie: {}", e);
                PortalError::Unauthorized
            })
    }

    pub fn session_cookie(&self, signed: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, signed)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(self.ttl.num_seconds()))
            .finish()
    }
}

/// Empty, already-expired cookie that overwrites `name`
pub fn expired_cookie(name: &str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name.to_string(), "").path("/").finish();
    cookie.make_removal();
    cookie
}
