// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for sign-in, registration and logout
// PURPOSE: Validate credentials, call the backend, issue or clear the session

use crate::errors::PortalError;
use crate::handlers::{message_of, AuthSession, Session};
use crate::models::{AgentSignupForm, AuthGrant, Locale, LoginForm, SignupForm, VerifyCodeForm};
use crate::services::{
    expired_cookie, normalize_phone, AuthThrottle, BackendClient, CallContext, SessionKeys, LEGACY_COOKIES,
    SESSION_COOKIE,
};
use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use serde_json::{json, Value};
use validator::Validate;

/// Sign the grant into a session cookie and tell the client where to go
fn start_session(keys: &SessionKeys, grant: AuthGrant) -> Result<HttpResponse, PortalError> {
    let (claims, signed) = keys.issue(&grant)?;
    log::info!(
        "Session {} started for user {} ({:?})",
        claims.sid,
        claims.sub,
        claims.role
    );

    Ok(HttpResponse::Ok()
        .cookie(keys.session_cookie(signed))
        .json(json!({
            "user": claims.public_view(),
            "redirect": claims.role.home_path(),
        })))
}

/// Session when the backend handed out a token, acknowledgement otherwise
fn session_or_ack(keys: &SessionKeys, response: Value, fallback: &str) -> Result<HttpResponse, PortalError> {
    let message = message_of(&response).unwrap_or_else(|| fallback.to_string());
    match AuthGrant::from_response(response) {
        Some(grant) => start_session(keys, grant),
        None => Ok(HttpResponse::Ok().json(json!({ "message": message }))),
    }
}

/// POST /auth/login
pub async fn login(
    req: HttpRequest,
    client: web::Data<BackendClient>,
    keys: web::Data<SessionKeys>,
    throttle: web::Data<AuthThrottle>,
    locale: Locale,
    form: web::Json<LoginForm>,
) -> Result<impl Responder, PortalError> {
    throttle.check_request(&req)?;
    form.validate()?;

    let response: Value = client
        .post_data("login-api", &form.into_inner(), &CallContext::anonymous(locale))
        .await?;

    let grant = AuthGrant::from_response(response)
        .ok_or_else(|| PortalError::Decode("login-api: response carries no token".to_string()))?;

    start_session(&keys, grant)
}

/// POST /auth/signup
/// The backend answers with a verification step, not a session
pub async fn signup(
    req: HttpRequest,
    client: web::Data<BackendClient>,
    throttle: web::Data<AuthThrottle>,
    locale: Locale,
    form: web::Json<SignupForm>,
) -> Result<impl Responder, PortalError> {
    throttle.check_request(&req)?;
    form.validate()?;

    let mut form = form.into_inner();
    form.phone = normalize_phone(&form.phone);
    let response: Value = client
        .post_data("register-api", &form, &CallContext::anonymous(locale))
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "message": message_of(&response).unwrap_or_else(|| "Verification code sent".to_string()),
        "email": form.email,
        "next": "/auth/verify",
    })))
}

/// POST /auth/verify
pub async fn verify(
    req: HttpRequest,
    client: web::Data<BackendClient>,
    keys: web::Data<SessionKeys>,
    throttle: web::Data<AuthThrottle>,
    locale: Locale,
    form: web::Json<VerifyCodeForm>,
) -> Result<impl Responder, PortalError> {
    throttle.check_request(&req)?;
    form.validate()?;

    let response: Value = client
        .post_data("verify-code-register", &form.into_inner(), &CallContext::anonymous(locale))
        .await?;

    session_or_ack(&keys, response, "Account verified")
}

/// POST /auth/agent-signup
pub async fn agent_signup(
    req: HttpRequest,
    client: web::Data<BackendClient>,
    keys: web::Data<SessionKeys>,
    throttle: web::Data<AuthThrottle>,
    locale: Locale,
    form: web::Json<AgentSignupForm>,
) -> Result<impl Responder, PortalError> {
    throttle.check_request(&req)?;
    form.validate()?;

    let mut form = form.into_inner();
    form.phone = normalize_phone(&form.phone);
    let response: Value = client
        .post_data("agent/register", &form, &CallContext::anonymous(locale))
        .await?;

    session_or_ack(&keys, response, "Agent account created")
}

/// GET|POST /logout
/// Expires the session and every legacy auth cookie, then goes home
pub async fn logout(session: Session) -> impl Responder {
    if let Some(claims) = &session.0 {
        log::info!("Session {} ended for user {}", claims.sid, claims.sub);
    }

    let mut response = HttpResponse::SeeOther();
    response.insert_header((header::LOCATION, "/"));
    for name in std::iter::once(SESSION_COOKIE).chain(LEGACY_COOKIES) {
        response.cookie(expired_cookie(name));
    }
    response.finish()
}

/// GET /me
pub async fn me(session: AuthSession) -> impl Responder {
    HttpResponse::Ok().json(session.0.public_view())
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/signup", web::post().to(signup))
            .route("/verify", web::post().to(verify))
            .route("/agent-signup", web::post().to(agent_signup)),
    )
    .route("/logout", web::get().to(logout))
    .route("/logout", web::post().to(logout))
    .route("/me", web::get().to(me));
}
