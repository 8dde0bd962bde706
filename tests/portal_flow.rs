// tests/portal_flow.rs
// End-to-end flows through the full route table against a mock backend

use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, App};
use estate_portal::config::Config;
use estate_portal::models::Locale;
use estate_portal::services::SESSION_COOKIE;
use estate_portal::AppState;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tokio_test::assert_ok;

fn state_for(server: &MockServer) -> AppState {
    assert_ok!(AppState::from_config(Config {
        api_base_url: format!("{}/api/v1/", server.base_url()),
        default_locale: Locale::En,
        ..Config::default()
    }))
}

fn login_mock_body(role: &str) -> Value {
    json!({
        "status": true,
        "data": {
            "token": format!("{}-token", role),
            "user": {"id": 77, "name": "Hala", "email": "hala@example.com", "user_type": role}
        }
    })
}

#[actix_rt::test]
async fn agent_logs_in_sees_dashboard_and_logs_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/login-api");
            then.status(200).json_body(login_mock_body("agent"));
        })
        .await;
    let profile = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/agent/profile")
                .header("authorization", "Bearer agent-token");
            then.status(200).json_body(json!({"data": {"id": 77, "name": "Hala"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/agent/statistics");
            then.status(200).json_body(json!({"data": {"total_properties": 4}}));
        })
        .await;

    let state = state_for(&server);
    let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "hala@example.com", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session: Cookie<'static> = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("login sets the session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/dashboard");

    let req = test::TestRequest::get()
        .uri("/dashboard")
        .cookie(session.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["profile"]["name"], "Hala");
    assert_eq!(body["available_properties"], 4);
    profile.assert_async().await;

    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string());
    assert_eq!(cleared.as_deref(), Some(""));

    // Without the cookie the dashboard sends the browser home again
    let req = test::TestRequest::get().uri("/dashboard").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_rt::test]
async fn regular_user_cannot_open_dashboard() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/login-api");
            then.status(200).json_body(login_mock_body("user"));
        })
        .await;
    let profile = server
        .mock_async(|when, then| {
            when.path("/api/v1/agent/profile");
            then.status(200).json_body(json!({}));
        })
        .await;

    let state = state_for(&server);
    let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({"email": "hala@example.com", "password": "secret"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .expect("login sets the session cookie");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["redirect"], "/");

    let req = test::TestRequest::get()
        .uri("/dashboard/profile")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
    assert_eq!(profile.hits_async().await, 0);
}

#[actix_rt::test]
async fn forged_role_cookie_is_ignored() {
    let server = MockServer::start_async().await;
    let state = state_for(&server);
    let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

    // The old frontend trusted a plain `user` cookie; it carries no weight now
    let req = test::TestRequest::get()
        .uri("/dashboard")
        .cookie(Cookie::new("user", r#"{"type":"agent"}"#))
        .cookie(Cookie::new("token", "stolen"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/");
}

#[actix_rt::test]
async fn property_search_round_trip() {
    let server = MockServer::start_async().await;
    let backend = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/properties")
                .query_param("search", "Zamalek")
                .query_param("per_page", "12")
                .header("accept-language", "en");
            then.status(200).json_body(json!({
                "data": [{"id": 5, "title_en": "Nile view flat", "price": 8500000, "type": {"name_en": "Apartment"}}]
            }));
        })
        .await;

    let state = state_for(&server);
    let app = test::init_service(App::new().configure(|cfg| state.register(cfg))).await;

    let req = test::TestRequest::get()
        .uri("/properties?search=Zamalek")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["items"][0]["title"], "Nile view flat");
    assert_eq!(body["pagination"]["total"], 1);
    backend.assert_async().await;
}
