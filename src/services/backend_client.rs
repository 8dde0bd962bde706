// src/services/backend_client.rs
// DOCUMENTATION: Listing backend API client
// PURPOSE: Single entry point for every read and write against the REST backend

use crate::config::Config;
use crate::errors::PortalError;
use crate::models::Locale;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Query for endpoints that take no parameters
pub const NO_QUERY: &[(&str, &str)] = &[];

/// Per-call credentials and language
/// DOCUMENTATION: Built by handlers from the verified session and locale
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Backend bearer token (authenticated calls only)
    pub token: Option<String>,
    /// Sent as Accept-Language so the backend localizes its payload
    pub locale: Locale,
}

impl CallContext {
    pub fn anonymous(locale: Locale) -> Self {
        CallContext { token: None, locale }
    }

    pub fn authenticated(token: impl Into<String>, locale: Locale) -> Self {
        CallContext {
            token: Some(token.into()),
            locale,
        }
    }
}

/// Listing backend client
/// DOCUMENTATION: Attaches headers, sends, and classifies failures once.
/// No retry, no backoff, no caching.
#[derive(Debug, Clone)]
pub struct BackendClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL ending with '/', e.g. https://host/api/v1/
    base_url: String,
}

impl BackendClient {
    /// Create new backend client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PortalError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PortalError::InternalError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: crate::config::env::normalize_base_url(base_url),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, PortalError> {
        Self::new(&config.api_base_url, config.backend_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>endpoint`, tolerating a leading slash on the endpoint
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// GET `endpoint` with query parameters
    ///
    /// # Arguments
    /// * `endpoint` - Path relative to the base URL (e.g. "properties")
    /// * `query` - Anything reqwest can encode as a query string
    /// * `ctx` - Token and locale for this call
    pub async fn get_data<T, Q>(&self, endpoint: &str, query: &Q, ctx: &CallContext) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.request(Method::GET, endpoint, ctx).query(query);
        self.execute(Method::GET, endpoint, builder).await
    }

    /// POST a JSON body to `endpoint`
    pub async fn post_data<T, B>(&self, endpoint: &str, body: &B, ctx: &CallContext) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, endpoint, ctx).json(body);
        self.execute(Method::POST, endpoint, builder).await
    }

    /// POST a multipart form to `endpoint`
    pub async fn post_multipart<T>(&self, endpoint: &str, form: Form, ctx: &CallContext) -> Result<T, PortalError>
    where
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, endpoint, ctx).multipart(form);
        self.execute(Method::POST, endpoint, builder).await
    }

    fn request(&self, method: Method, endpoint: &str, ctx: &CallContext) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint_url(endpoint))
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, ctx.locale.code());

        if let Some(token) = ctx.token.as_deref().filter(|t| !t.is_empty()) {
            builder = builder.bearer_auth(token);
        }

        builder
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        builder: RequestBuilder,
    ) -> Result<T, PortalError> {
        log::debug!("Backend {} {}", method, endpoint);

        let response = builder.send().await.map_err(|e| {
            log::error!("Backend request {} {} failed: {}", method, endpoint, e);
            PortalError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            log::error!("Backend body read {} {} failed: {}", method, endpoint, e);
            PortalError::Network(e.to_string())
        })?;

        if !status.is_success() {
            log::error!("Backend error {} on {} {}: {}", status, method, endpoint, truncate(&body, 300));
            return Err(classify_failure(status, &body));
        }

        // 204 and empty 200s decode as JSON null
        let text = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(text).map_err(|e| {
            log::error!("Failed to parse backend response for {}: {}", endpoint, e);
            PortalError::Decode(format!("{}: {}", endpoint, e))
        })
    }
}

/// Map a non-success backend response onto PortalError
pub fn classify_failure(status: StatusCode, body: &str) -> PortalError {
    let json: Value = serde_json::from_str(body).unwrap_or(Value::Null);
    let message = ["message", "error", "msg"]
        .iter()
        .filter_map(|key| json.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .find(|m| !m.is_empty())
        .unwrap_or_else(|| {
            if json.is_null() && !body.trim().is_empty() {
                truncate(body, 200)
            } else {
                status
                    .canonical_reason()
                    .unwrap_or("Backend request failed")
                    .to_string()
            }
        });

    match status {
        StatusCode::UNAUTHORIZED => PortalError::Unauthorized,
        StatusCode::FORBIDDEN => PortalError::Forbidden,
        StatusCode::NOT_FOUND => PortalError::NotFound(message),
        StatusCode::UNPROCESSABLE_ENTITY => PortalError::Validation {
            message,
            fields: field_errors(&json),
        },
        StatusCode::TOO_MANY_REQUESTS => PortalError::RateLimitExceeded,
        other => PortalError::Backend {
            status: other.as_u16(),
            message,
        },
    }
}

/// `{"errors": {"email": ["taken"], "phone": "invalid"}}` → field map
fn field_errors(json: &Value) -> BTreeMap<String, Vec<String>> {
    json.get("errors")
        .and_then(Value::as_object)
        .map(|errors| {
            errors
                .iter()
                .map(|(field, messages)| {
                    let list = match messages {
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                        Value::String(s) => vec![s.clone()],
                        _ => Vec::new(),
                    };
                    (field.clone(), list)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.url("/api/v1"), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_endpoint_url_joins_cleanly() {
        let client = BackendClient::new("https://example.com/api/v1", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), "https://example.com/api/v1/");
        assert_eq!(client.endpoint_url("/blogs/a-b"), "https://example.com/api/v1/blogs/a-b");
        assert_eq!(client.endpoint_url("areas"), "https://example.com/api/v1/areas");
    }

    #[tokio::test]
    async fn test_get_data_sends_headers_and_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/agent/statistics")
                    .query_param("period", "month")
                    .header("authorization", "Bearer tok-1")
                    .header("accept-language", "en")
                    .header("accept", "application/json");
                then.status(200).json_body(json!({"data": {"views": 10}}));
            })
            .await;

        let client = client_for(&server);
        let ctx = CallContext::authenticated("tok-1", Locale::En);
        let value: Value = client
            .get_data("agent/statistics", &[("period", "month")], &ctx)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value["data"]["views"], 10);
    }

    #[tokio::test]
    async fn test_post_data_sends_json() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/favourite/toggle")
                    .json_body(json!({"property_id": "7"}));
                then.status(204);
            })
            .await;

        let client = client_for(&server);
        let value: Value = client
            .post_data("favourite/toggle", &json!({"property_id": "7"}), &CallContext::default())
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(value.is_null());
    }

    #[tokio::test]
    async fn test_post_multipart() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/agent/profile/update")
                    .body_contains("Mona Adel");
                then.status(200).json_body(json!({"message": "updated"}));
            })
            .await;

        let client = client_for(&server);
        let form = Form::new().text("name", "Mona Adel");
        let value: Value = client
            .post_multipart("agent/profile/update", form, &CallContext::authenticated("t", Locale::Ar))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(value["message"], "updated");
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_fields() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/register-api");
                then.status(422).json_body(json!({
                    "message": "The email has already been taken.",
                    "errors": {"email": ["The email has already been taken."], "phone": "invalid"}
                }));
            })
            .await;

        let client = client_for(&server);
        let result: Result<Value, _> = client
            .post_data("register-api", &json!({}), &CallContext::default())
            .await;

        match result {
            Err(PortalError::Validation { message, fields }) => {
                assert_eq!(message, "The email has already been taken.");
                assert_eq!(fields["email"], vec!["The email has already been taken."]);
                assert_eq!(fields["phone"], vec!["invalid"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_server_error_and_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/properties");
                then.status(500).body("upstream exploded");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/types");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let client = client_for(&server);
        let ctx = CallContext::default();

        let err = client
            .get_data::<Value, _>("properties", &[("page", "1")], &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, PortalError::Backend { status: 500, ref message } if message == "upstream exploded"));
        assert_eq!(err.kind(), ErrorKind::Http);

        let err = client
            .get_data::<Value, _>("types", NO_QUERY, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Malformed);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = BackendClient::new("http://127.0.0.1:9/api/v1/", Duration::from_secs(2)).unwrap();
        let err = client
            .get_data::<Value, _>("areas", NO_QUERY, &CallContext::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn test_classify_failure_statuses() {
        assert!(matches!(classify_failure(StatusCode::UNAUTHORIZED, ""), PortalError::Unauthorized));
        assert!(matches!(classify_failure(StatusCode::FORBIDDEN, "{}"), PortalError::Forbidden));
        assert!(matches!(
            classify_failure(StatusCode::NOT_FOUND, r#"{"message":"Blog not found"}"#),
            PortalError::NotFound(ref m) if m == "Blog not found"
        ));
        assert!(matches!(classify_failure(StatusCode::TOO_MANY_REQUESTS, ""), PortalError::RateLimitExceeded));
    }
}
