// src/handlers/contact.rs
// DOCUMENTATION: Contact form handler
// PURPOSE: Validate enquiries and relay them to the backend mailer

use crate::errors::PortalError;
use crate::handlers::message_of;
use crate::models::{ContactForm, Locale};
use crate::services::{normalize_phone, BackendClient, CallContext};
use actix_web::{web, HttpResponse, Responder};
use serde_json::{json, Value};
use validator::Validate;

/// POST /contact
pub async fn send_message(
    client: web::Data<BackendClient>,
    locale: Locale,
    form: web::Json<ContactForm>,
) -> Result<impl Responder, PortalError> {
    form.validate()?;

    let mut form = form.into_inner();
    form.phone = form.phone.as_deref().map(normalize_phone).filter(|p| !p.is_empty());

    let response: Value = client
        .post_data("mail", &form, &CallContext::anonymous(locale))
        .await?;

    log::info!("Contact message relayed for {}", form.email);

    Ok(HttpResponse::Ok().json(json!({
        "message": message_of(&response).unwrap_or_else(|| "Message sent".to_string()),
    })))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/contact", web::post().to(send_message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use httpmock::prelude::*;

    #[actix_rt::test]
    async fn test_contact_relays_normalized_phone() {
        let server = MockServer::start_async().await;
        let backend = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/mail")
                    .json_body_partial(r#"{"phone": "01012345678", "email": "buyer@example.com"}"#);
                then.status(200).json_body(json!({"message": "Thanks, we will call you"}));
            })
            .await;

        let state = test_support::state(&server.base_url());
        let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/contact")
            .set_json(json!({
                "name": "Buyer",
                "email": "buyer@example.com",
                "phone": "010 1234-5678",
                "message": "Is the Maadi flat still available?"
            }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["message"], "Thanks, we will call you");
        backend.assert_async().await;
    }

    #[actix_rt::test]
    async fn test_contact_rejects_short_message() {
        let state = test_support::state("http://127.0.0.1:9");
        let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/contact")
            .set_json(json!({"name": "B", "email": "buyer@example.com", "message": "hi"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"]["fields"]["message"].is_array());
        assert!(body["error"]["fields"]["name"].is_array());
    }
}
