// src/handlers/properties.rs
// DOCUMENTATION: HTTP handlers for property listings
// PURPOSE: Search with filters, show one listing, toggle favourites

use crate::config::Config;
use crate::errors::PortalError;
use crate::handlers::{message_of, path_segment, AuthSession, Session};
use crate::models::lenient::{decode_record, unwrap_data};
use crate::models::{Locale, Page, Property};
use crate::services::{category_cookie, BackendClient, Category, PropertyFilters, CATEGORY_COOKIE, NO_QUERY};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::{json, Value};

/// GET /properties
/// Search listings; an explicit category is remembered in a cookie
pub async fn list_properties(
    req: HttpRequest,
    client: web::Data<BackendClient>,
    config: web::Data<Config>,
    session: Session,
    locale: Locale,
    query: web::Query<PropertyFilters>,
) -> Result<impl Responder, PortalError> {
    let chosen = query.category;
    let remembered = req
        .cookie(CATEGORY_COOKIE)
        .and_then(|c| c.value().parse::<Category>().ok());

    let filters = query.into_inner().with_remembered_category(remembered);
    filters.validate()?;

    let response: Value = client
        .get_data("properties", &filters.to_query(), &session.call_context(locale))
        .await?;
    let page = Page::<Property>::from_envelope(response)?.map(|p| p.to_card(locale));

    log::debug!(
        "Property search returned {} of {} listings",
        page.items.len(),
        page.pagination.total
    );

    let mut builder = HttpResponse::Ok();
    if let Some(category) = chosen {
        builder.cookie(category_cookie(category, config.is_production()));
    }
    Ok(builder.json(page))
}

/// GET /properties/{id}
pub async fn get_property(
    client: web::Data<BackendClient>,
    session: Session,
    locale: Locale,
    path: web::Path<String>,
) -> Result<impl Responder, PortalError> {
    let id = path_segment(&path)?;

    let response: Value = client
        .get_data(&format!("properties/{}", id), NO_QUERY, &session.call_context(locale))
        .await?;

    if unwrap_data(response.clone()).is_null() {
        return Err(PortalError::NotFound(format!("property {}", id)));
    }

    let property: Property = decode_record(response)?;
    Ok(HttpResponse::Ok().json(property.to_detail(locale)))
}

/// Favourite flag from a toggle acknowledgement, when the backend sends one
fn favourite_flag(response: &Value) -> Option<bool> {
    let data = response.get("data").unwrap_or(response);
    ["is_favourite", "is_favorite", "favourite", "favorite", "status"]
        .iter()
        .find_map(|key| data.get(*key).and_then(Value::as_bool))
}

/// POST /properties/{id}/favourite
pub async fn toggle_favourite(
    client: web::Data<BackendClient>,
    session: AuthSession,
    locale: Locale,
    path: web::Path<String>,
) -> Result<impl Responder, PortalError> {
    let id = path_segment(&path)?;

    let response: Value = client
        .post_data(
            "favourite/toggle",
            &json!({ "property_id": id }),
            &session.0.call_context(locale),
        )
        .await?;

    log::info!("User {} toggled favourite on property {}", session.0.sub, id);

    Ok(HttpResponse::Ok().json(json!({
        "property_id": id,
        "is_favourite": favourite_flag(&response),
        "message": message_of(&response),
    })))
}

/// Configuration for property routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/properties")
            .route("", web::get().to(list_properties))
            .route("/{id}", web::get().to(get_property))
            .route("/{id}/favourite", web::post().to(toggle_favourite)),
    );
}
