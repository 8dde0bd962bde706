// src/handlers/blogs.rs
// DOCUMENTATION: HTTP handlers for the blog
// PURPOSE: Paginated article index and single article pages

use crate::errors::PortalError;
use crate::handlers::path_segment;
use crate::models::lenient::{decode_record, unwrap_data};
use crate::models::{Blog, BlogArticle, Locale, Page};
use crate::services::{BackendClient, CallContext, NO_QUERY};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct BlogQuery {
    pub page: Option<u32>,
}

/// GET /blogs?page=
pub async fn list_blogs(
    client: web::Data<BackendClient>,
    locale: Locale,
    query: web::Query<BlogQuery>,
) -> Result<impl Responder, PortalError> {
    let page = query.page.unwrap_or(1).max(1).to_string();

    let response: Value = client
        .get_data("blogs", &[("page", page.as_str())], &CallContext::anonymous(locale))
        .await?;
    let blogs = Page::<Blog>::from_envelope(response)?.map(|blog| blog.to_summary(locale));

    Ok(HttpResponse::Ok().json(blogs))
}

/// GET /blogs/{slug}
pub async fn get_blog(
    client: web::Data<BackendClient>,
    locale: Locale,
    path: web::Path<String>,
) -> Result<impl Responder, PortalError> {
    let slug = path_segment(&path)?;

    let response: Value = client
        .get_data(&format!("blogs/{}", slug), NO_QUERY, &CallContext::anonymous(locale))
        .await?;

    if unwrap_data(response.clone()).is_null() {
        return Err(PortalError::NotFound(format!("blog {}", slug)));
    }

    let blog: Blog = decode_record(response)?;
    Ok(HttpResponse::Ok().json(BlogArticle::from((blog, locale))))
}

/// Configuration for blog routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/blogs")
            .route("", web::get().to(list_blogs))
            .route("/{slug}", web::get().to(get_blog)),
    );
}
