// src/handlers/dashboard.rs
// DOCUMENTATION: Agent dashboard handlers
// PURPOSE: Profile, statistics and listings for signed-in agents only

use crate::errors::{ErrorKind, PortalError};
use crate::handlers::{message_of, AgentSession};
use crate::models::lenient::decode_record;
use crate::models::{
    AgentProfile, DashboardView, Locale, Page, Property, StatisticsSnapshot, UpdatePasswordForm,
    UpdateProfileForm,
};
use crate::services::{format_phone, normalize_phone, BackendClient, CallContext, NO_QUERY};
use actix_web::{web, HttpResponse, Responder};
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

/// A backend 401 means the stored token died: clear the session
fn expired_to_logout(error: PortalError) -> PortalError {
    match error {
        PortalError::Unauthorized => {
            log::info!("Backend rejected agent token, ending session");
            PortalError::Redirect("/logout".to_string())
        }
        other => other,
    }
}

async fn fetch_profile(client: &BackendClient, ctx: &CallContext) -> Result<AgentProfile, PortalError> {
    let response: Value = client
        .get_data("agent/profile", NO_QUERY, ctx)
        .await
        .map_err(expired_to_logout)?;
    decode_record(response)
}

/// Statistics fold to zeros unless the failure is about credentials
async fn fetch_statistics(client: &BackendClient, ctx: &CallContext) -> Result<StatisticsSnapshot, PortalError> {
    match client.get_data::<Value, _>("agent/statistics", NO_QUERY, ctx).await {
        Ok(response) => Ok(decode_record(response).unwrap_or_else(|e| {
            log::warn!("Unreadable agent statistics, showing zeros: {}", e);
            StatisticsSnapshot::default()
        })),
        Err(e) if e.kind() == ErrorKind::Authorization => Err(expired_to_logout(e)),
        Err(e) => {
            log::warn!("Agent statistics unavailable, showing zeros: {}", e);
            Ok(StatisticsSnapshot::default())
        }
    }
}

/// GET /dashboard
pub async fn overview(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
) -> Result<impl Responder, PortalError> {
    let ctx = session.0.call_context(locale);
    let (profile, statistics) =
        tokio::try_join!(fetch_profile(&client, &ctx), fetch_statistics(&client, &ctx))?;

    let available_properties = statistics.available_properties();
    Ok(HttpResponse::Ok().json(DashboardView {
        profile,
        statistics,
        available_properties,
    }))
}

/// GET /dashboard/profile
pub async fn get_profile(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
) -> Result<impl Responder, PortalError> {
    let profile = fetch_profile(&client, &session.0.call_context(locale)).await?;
    let phone_display = format_phone(&profile.phone);

    Ok(HttpResponse::Ok().json(json!({
        "profile": profile,
        "phone_display": phone_display,
    })))
}

/// POST /dashboard/profile
/// Forwarded as multipart, the encoding the backend's update endpoint takes
pub async fn update_profile(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
    form: web::Json<UpdateProfileForm>,
) -> Result<impl Responder, PortalError> {
    form.validate()?;
    let form = form.into_inner();

    let mut multipart = Form::new().text("name", form.name).text("email", form.email);
    let optional = [
        ("phone", form.phone.as_deref().map(normalize_phone)),
        ("company_name", form.company),
        ("bio", form.bio),
    ];
    for (field, value) in optional {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            multipart = multipart.text(field, value);
        }
    }

    let response: Value = client
        .post_multipart("agent/profile/update", multipart, &session.0.call_context(locale))
        .await
        .map_err(expired_to_logout)?;

    log::info!("Agent {} updated profile", session.0.sub);

    Ok(HttpResponse::Ok().json(json!({
        "message": message_of(&response).unwrap_or_else(|| "Profile updated".to_string()),
    })))
}

/// POST /dashboard/password
pub async fn update_password(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
    form: web::Json<UpdatePasswordForm>,
) -> Result<impl Responder, PortalError> {
    form.validate()?;

    let response: Value = client
        .post_data(
            "agent/profile/update-password",
            &form.into_inner(),
            &session.0.call_context(locale),
        )
        .await
        .map_err(expired_to_logout)?;

    log::info!("Agent {} changed password", session.0.sub);

    Ok(HttpResponse::Ok().json(json!({
        "message": message_of(&response).unwrap_or_else(|| "Password updated".to_string()),
    })))
}

/// GET /dashboard/statistics
pub async fn statistics(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
) -> Result<impl Responder, PortalError> {
    let statistics = fetch_statistics(&client, &session.0.call_context(locale)).await?;
    let available = statistics.available_properties();

    Ok(HttpResponse::Ok().json(json!({
        "statistics": statistics,
        "available_properties": available,
    })))
}

#[derive(Debug, Deserialize)]
pub struct ListingsQuery {
    pub page: Option<u32>,
}

/// GET /dashboard/listings?page=
pub async fn listings(
    client: web::Data<BackendClient>,
    session: AgentSession,
    locale: Locale,
    query: web::Query<ListingsQuery>,
) -> Result<impl Responder, PortalError> {
    let page = query.page.unwrap_or(1).max(1).to_string();

    let response: Value = client
        .get_data(
            "agent/property_listings",
            &[("page", page.as_str())],
            &session.0.call_context(locale),
        )
        .await
        .map_err(expired_to_logout)?;
    let listings = Page::<Property>::from_envelope(response)?.map(|p| p.to_card(locale));

    Ok(HttpResponse::Ok().json(listings))
}

/// Configuration for dashboard routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/dashboard")
            .route("", web::get().to(overview))
            .route("/profile", web::get().to(get_profile))
            .route("/profile", web::post().to(update_profile))
            .route("/password", web::post().to(update_password))
            .route("/statistics", web::get().to(statistics))
            .route("/listings", web::get().to(listings)),
    );
}
