// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Single result type for every failure in the gateway

use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;
use validator::ValidationErrors;

/// Coarse classification of a failure
/// DOCUMENTATION: Call sites match on this instead of inspecting error shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport failure talking to the backend
    Network,
    /// Backend answered with a non-success status
    Http,
    /// Input rejected before or by the backend
    Validation,
    /// Missing, invalid or insufficient credentials
    Authorization,
    /// Backend payload could not be understood
    Malformed,
    /// Anything raised by the gateway itself
    Internal,
}

/// Application-specific error types
/// DOCUMENTATION: Comprehensive error enum for all possible failures
/// Each variant maps to appropriate HTTP status code and error response
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Backend unreachable: {0}")]
    Network(String),

    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
    },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden access")]
    Forbidden,

    #[error("Redirecting to {0}")]
    Redirect(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl PortalError {
    /// Build a validation error without per-field detail
    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation {
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PortalError::Network(_) => ErrorKind::Network,
            PortalError::Backend { .. } | PortalError::NotFound(_) | PortalError::RateLimitExceeded => {
                ErrorKind::Http
            }
            PortalError::Decode(_) => ErrorKind::Malformed,
            PortalError::InvalidInput(_) | PortalError::Validation { .. } => ErrorKind::Validation,
            PortalError::Unauthorized | PortalError::Forbidden | PortalError::Redirect(_) => {
                ErrorKind::Authorization
            }
            PortalError::InternalError(_) => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            PortalError::NotFound(_) => "NOT_FOUND",
            PortalError::Network(_) => "BACKEND_UNREACHABLE",
            PortalError::Backend { .. } => "BACKEND_ERROR",
            PortalError::Decode(_) => "MALFORMED_RESPONSE",
            PortalError::InvalidInput(_) => "INVALID_INPUT",
            PortalError::Validation { .. } => "VALIDATION_ERROR",
            PortalError::Unauthorized => "UNAUTHORIZED",
            PortalError::Forbidden => "FORBIDDEN",
            PortalError::Redirect(_) => "REDIRECT",
            PortalError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            PortalError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Collect validator output into field -> messages
/// DOCUMENTATION: Uses the rule's message when present, else its code
impl From<ValidationErrors> for PortalError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        PortalError::Validation {
            message: "One or more fields are invalid".to_string(),
            fields,
        }
    }
}

/// Convert PortalError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
impl ResponseError for PortalError {
    fn error_response(&self) -> HttpResponse {
        if let PortalError::Redirect(location) = self {
            return HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location.as_str()))
                .finish();
        }

        let mut error = json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        if let PortalError::Validation { fields, .. } = self {
            if !fields.is_empty() {
                error["fields"] = json!(fields);
            }
        }

        HttpResponse::build(self.status_code()).json(json!({ "error": error }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Network(_) => StatusCode::BAD_GATEWAY,
            PortalError::Backend { status, .. } => {
                // Backend server faults surface as a gateway fault
                match StatusCode::from_u16(*status) {
                    Ok(code) if code.is_client_error() => code,
                    _ => StatusCode::BAD_GATEWAY,
                }
            }
            PortalError::Decode(_) => StatusCode::BAD_GATEWAY,
            PortalError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            PortalError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            PortalError::Unauthorized => StatusCode::UNAUTHORIZED,
            PortalError::Forbidden => StatusCode::FORBIDDEN,
            PortalError::Redirect(_) => StatusCode::SEE_OTHER,
            PortalError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            PortalError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(email(message = "Enter a valid email"))]
        email: String,
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(PortalError::Network("down".into()).kind(), ErrorKind::Network);
        assert_eq!(
            PortalError::Backend { status: 500, message: "boom".into() }.kind(),
            ErrorKind::Http
        );
        assert_eq!(PortalError::validation("bad").kind(), ErrorKind::Validation);
        assert_eq!(PortalError::Redirect("/".into()).kind(), ErrorKind::Authorization);
        assert_eq!(PortalError::Decode("eof".into()).kind(), ErrorKind::Malformed);
    }

    #[test]
    fn test_backend_status_mapping() {
        let client = PortalError::Backend { status: 409, message: "taken".into() };
        assert_eq!(client.status_code(), StatusCode::CONFLICT);

        let server = PortalError::Backend { status: 503, message: "down".into() };
        assert_eq!(server.status_code(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_redirect_response() {
        let response = PortalError::Redirect("/".into()).error_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[actix_rt::test]
    async fn test_validation_response_lists_fields() {
        let form = Form { email: "nope".into() };
        let error: PortalError = form.validate().unwrap_err().into();

        let response = error.error_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(value["error"]["fields"]["email"][0], "Enter a valid email");
    }
}
