// src/models/agent.rs
// DOCUMENTATION: Agent dashboard data
// PURPOSE: Profile, statistics and the forms that change them

use super::lenient::{de_string, de_u64};
use crate::services::phone::validate_phone_field;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Agent profile returned by `agent/profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentProfile {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,

    #[serde(default, deserialize_with = "de_string")]
    pub name: String,

    #[serde(default, deserialize_with = "de_string")]
    pub email: String,

    #[serde(default, deserialize_with = "de_string")]
    pub phone: String,

    #[serde(default, alias = "image", alias = "photo", deserialize_with = "de_string")]
    pub avatar: String,

    #[serde(default, alias = "company_name", deserialize_with = "de_string")]
    pub company: String,

    #[serde(default, deserialize_with = "de_string")]
    pub bio: String,

    #[serde(default, alias = "type", deserialize_with = "de_string")]
    pub role: String,
}

/// Views for one month of the dashboard chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCount {
    #[serde(default, alias = "label", deserialize_with = "de_string")]
    pub month: String,

    #[serde(default, alias = "views", alias = "total", deserialize_with = "de_u64")]
    pub count: u64,
}

/// Aggregates returned by `agent/statistics`
/// DOCUMENTATION: Missing or malformed counts render as 0
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    #[serde(default, alias = "properties_count", deserialize_with = "de_u64")]
    pub total_properties: u64,

    #[serde(default, alias = "active_count", deserialize_with = "de_u64")]
    pub active_properties: u64,

    #[serde(default, alias = "sold_count", deserialize_with = "de_u64")]
    pub sold_properties: u64,

    #[serde(default, alias = "rented_count", deserialize_with = "de_u64")]
    pub rented_properties: u64,

    #[serde(default, alias = "views_count", alias = "views", deserialize_with = "de_u64")]
    pub total_views: u64,

    #[serde(default, alias = "favorites_count", alias = "favourites_count", deserialize_with = "de_u64")]
    pub total_favourites: u64,

    #[serde(default, alias = "inquiries_count", alias = "messages_count", deserialize_with = "de_u64")]
    pub total_inquiries: u64,

    #[serde(default, alias = "monthly", deserialize_with = "de_monthly")]
    pub monthly_views: Vec<MonthlyCount>,
}

fn de_monthly<'de, D: serde::Deserializer<'de>>(d: D) -> Result<Vec<MonthlyCount>, D::Error> {
    let value = serde_json::Value::deserialize(d)?;
    Ok(match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        // {"Jan": 10, "Feb": 4}
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(month, count)| MonthlyCount {
                month,
                count: super::lenient::value_to_f64(&count)
                    .filter(|n| *n >= 0.0)
                    .map(|n| n as u64)
                    .unwrap_or(0),
            })
            .collect(),
        _ => Vec::new(),
    })
}

impl StatisticsSnapshot {
    /// Listings that are neither sold nor rented
    pub fn available_properties(&self) -> u64 {
        self.total_properties
            .saturating_sub(self.sold_properties)
            .saturating_sub(self.rented_properties)
    }
}

/// Dashboard landing payload
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub profile: AgentProfile,
    pub statistics: StatisticsSnapshot,
    pub available_properties: u64,
}

/// POST /dashboard/profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(min = 2, max = 100, message = "Name must be 2-100 characters"))]
    pub name: String,

    #[validate(email(message = "Enter a valid email"))]
    pub email: String,

    #[validate(custom = "validate_phone_field")]
    pub phone: Option<String>,

    #[validate(length(max = 150))]
    pub company: Option<String>,

    #[validate(length(max = 1000))]
    pub bio: Option<String>,
}

/// POST /dashboard/password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(must_match = "password")]
    pub password_confirmation: String,
}
