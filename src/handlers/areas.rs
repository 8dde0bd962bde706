// src/handlers/areas.rs
// DOCUMENTATION: HTTP handlers for areas, area suggestions and property types
// PURPOSE: Feed the location picker and the search filter dropdowns

use crate::errors::PortalError;
use crate::models::lenient::extract_list;
use crate::models::{AreaSuggestion, Locale, TypeOption};
use crate::services::{AreaSearchSource, BackendClient, CallContext, SuggestionSource, NO_QUERY};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    #[serde(default, alias = "search")]
    pub q: String,
}

/// GET /areas
pub async fn list_areas(
    client: web::Data<BackendClient>,
    locale: Locale,
) -> Result<impl Responder, PortalError> {
    let response: Value = client
        .get_data("areas", NO_QUERY, &CallContext::anonymous(locale))
        .await?;

    let areas: Vec<AreaSuggestion> = extract_list(response)
        .iter()
        .map(|record| AreaSuggestion::from_value(record, locale))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "items": areas })))
}

/// GET /areas/suggest?q=
/// Lookup failures render as an empty list, like a search with no matches
pub async fn suggest_areas(
    client: web::Data<BackendClient>,
    locale: Locale,
    query: web::Query<SuggestQuery>,
) -> impl Responder {
    let text = query.into_inner().q.trim().to_string();
    let source = AreaSearchSource::new(client.into_inner(), locale);

    let items: Vec<AreaSuggestion> = match source.fetch(&text).await {
        Ok(records) => records
            .iter()
            .map(|record| AreaSuggestion::from_value(record, locale))
            .collect(),
        Err(e) => {
            log::warn!("Area suggestions for '{}' failed: {}", text, e);
            Vec::new()
        }
    };

    let message = items.is_empty().then(|| locale.no_results_message());
    HttpResponse::Ok().json(json!({
        "query": text,
        "items": items,
        "message": message,
    }))
}

/// GET /types
pub async fn list_types(
    client: web::Data<BackendClient>,
    locale: Locale,
) -> Result<impl Responder, PortalError> {
    let response: Value = client
        .get_data("types", NO_QUERY, &CallContext::anonymous(locale))
        .await?;

    let types: Vec<TypeOption> = extract_list(response)
        .iter()
        .map(|record| TypeOption::from_value(record, locale))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "items": types })))
}

/// Configuration for area and type routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/areas", web::get().to(list_areas))
        .route("/areas/suggest", web::get().to(suggest_areas))
        .route("/types", web::get().to(list_types));
}
