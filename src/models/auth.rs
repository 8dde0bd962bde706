// src/models/auth.rs
// DOCUMENTATION: Authentication forms and backend auth payloads
// PURPOSE: Validate credentials before they reach the backend

use super::lenient::{de_string, first_text, unwrap_data};
use crate::services::phone::validate_phone_field;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Account role as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Agent,
    User,
    #[serde(other)]
    Other,
}

impl Role {
    pub fn from_label(label: &str) -> Role {
        match label.trim().to_ascii_lowercase().as_str() {
            "agent" => Role::Agent,
            "user" | "customer" | "client" => Role::User,
            _ => Role::Other,
        }
    }

    /// Where a freshly logged-in account lands
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Agent => "/dashboard",
            _ => "/",
        }
    }
}

/// User block of a login/verify response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendUser {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,

    #[serde(default, deserialize_with = "de_string")]
    pub name: String,

    #[serde(default, deserialize_with = "de_string")]
    pub email: String,

    #[serde(default, alias = "type", alias = "user_type", deserialize_with = "de_string")]
    pub role: String,
}

/// Token plus user extracted from an auth response
#[derive(Debug, Clone)]
pub struct AuthGrant {
    pub token: String,
    pub user: BackendUser,
}

impl AuthGrant {
    /// Find `token`/`access_token` and `user` at the root or under `data`
    pub fn from_response(value: Value) -> Option<AuthGrant> {
        let root = if value.get("token").is_some() || value.get("access_token").is_some() {
            value
        } else {
            unwrap_data(value)
        };

        let token = first_text(&root, &["token", "access_token"])?;
        let user = root
            .get("user")
            .cloned()
            .and_then(|u| serde_json::from_value(u).ok())
            .unwrap_or_default();

        Some(AuthGrant { token, user })
    }
}

/// POST /auth/login
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /auth/signup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(custom = "validate_phone_field")]
    pub phone: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match = "password")]
    pub password_confirmation: String,
}

/// POST /auth/agent-signup
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AgentSignupForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(custom = "validate_phone_field")]
    pub phone: String,

    #[validate(length(max = 150))]
    pub company_name: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match = "password")]
    pub password_confirmation: String,
}

/// POST /auth/verify
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyCodeForm {
    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(length(min = 4, max = 6, message = "Code must be 4-6 digits"))]
    pub code: String,
}

/// POST /contact
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(custom = "validate_phone_field")]
    pub phone: Option<String>,

    #[validate(length(max = 150))]
    pub subject: Option<String>,

    #[validate(length(min = 10, max = 2000, message = "Message must be 10-2000 characters"))]
    pub message: String,
}
