// src/handlers/guards.rs
// DOCUMENTATION: Session extractors for handlers
// PURPOSE: Verify the session cookie once per request and gate pages by role

use crate::errors::PortalError;
use crate::models::Locale;
use crate::services::{CallContext, SessionClaims, SessionKeys, SESSION_COOKIE};
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// Verified claims from the `session` cookie, if any
fn read_claims(req: &HttpRequest) -> Result<Option<SessionClaims>, PortalError> {
    let keys = req
        .app_data::<web::Data<SessionKeys>>()
        .ok_or_else(|| PortalError::InternalError("Session keys not registered".to_string()))?;

    Ok(req
        .cookie(SESSION_COOKIE)
        .and_then(|cookie| keys.verify(cookie.value()).ok()))
}

/// Optional session: anonymous callers are allowed
/// An invalid or expired cookie counts as anonymous.
#[derive(Debug, Clone)]
pub struct Session(pub Option<SessionClaims>);

impl Session {
    /// Authenticated context when signed in, anonymous otherwise
    pub fn call_context(&self, locale: Locale) -> CallContext {
        match &self.0 {
            Some(claims) => claims.call_context(locale),
            None => CallContext::anonymous(locale),
        }
    }
}

impl FromRequest for Session {
    type Error = PortalError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(read_claims(req).map(Session))
    }
}

/// Any signed-in account, else 401
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionClaims);

impl FromRequest for AuthSession {
    type Error = PortalError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match read_claims(req) {
            Ok(Some(claims)) => Ok(AuthSession(claims)),
            Ok(None) => Err(PortalError::Unauthorized),
            Err(e) => Err(e),
        })
    }
}

/// Signed-in agent, else 303 to the home page
#[derive(Debug, Clone)]
pub struct AgentSession(pub SessionClaims);

impl FromRequest for AgentSession {
    type Error = PortalError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match read_claims(req) {
            Ok(Some(claims)) if claims.is_agent() => Ok(AgentSession(claims)),
            Ok(Some(claims)) => {
                log::info!("Non-agent {} sent away from {}", claims.sub, req.path());
                Err(PortalError::Redirect("/".to_string()))
            }
            Ok(None) => Err(PortalError::Redirect("/".to_string())),
            Err(e) => Err(e),
        })
    }
}
