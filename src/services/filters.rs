// src/services/filters.rs
// DOCUMENTATION: Property search filter state
// PURPOSE: Compose user filter choices into backend query parameters

use crate::errors::PortalError;
use actix_web::cookie::{time, Cookie, SameSite};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Remembers the last chosen category across navigations
pub const CATEGORY_COOKIE: &str = "property_category";

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const MAX_PER_PAGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sale,
    Rent,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sale => "sale",
            Category::Rent => "rent",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sale" | "buy" => Ok(Category::Sale),
            "rent" => Ok(Category::Rent),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Newest,
    Oldest,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    /// (sort_by, sort_order) as the backend expects them
    fn backend_params(&self) -> (&'static str, &'static str) {
        match self {
            SortOrder::Newest => ("created_at", "desc"),
            SortOrder::Oldest => ("created_at", "asc"),
            SortOrder::PriceAsc => ("price", "asc"),
            SortOrder::PriceDesc => ("price", "desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "latest" => Ok(SortOrder::Newest),
            "oldest" => Ok(SortOrder::Oldest),
            "price_asc" | "price-low" => Ok(SortOrder::PriceAsc),
            "price_desc" | "price-high" => Ok(SortOrder::PriceDesc),
            other => Err(format!("unknown sort '{}'", other)),
        }
    }
}

/// Blank form fields arrive as "" and mean "not set"
fn empty_as_none<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(d)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Filters accepted by GET /properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyFilters {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub area_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub type_id: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category: Option<Category>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_price: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub min_area: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub max_area: Option<f64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub bathrooms: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort: Option<SortOrder>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub per_page: Option<u32>,
}

impl PropertyFilters {
    /// Reject ranges that cannot match anything
    pub fn validate(&self) -> Result<(), PortalError> {
        check_range("price", self.min_price, self.max_price)?;
        check_range("area", self.min_area, self.max_area)?;
        Ok(())
    }

    /// Fall back to the remembered category when none was chosen
    pub fn with_remembered_category(mut self, remembered: Option<Category>) -> Self {
        if self.category.is_none() {
            self.category = remembered;
        }
        self
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE)
    }

    /// Backend query parameters, unset filters omitted
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key.to_string(), value));
            }
        };

        push("search", self.search.clone());
        push("area_id", self.area_id.clone());
        push("type_id", self.type_id.clone());
        push("status", self.category.map(|c| c.as_str().to_string()));
        push("min_price", self.min_price.map(|v| v.to_string()));
        push("max_price", self.max_price.map(|v| v.to_string()));
        push("min_area", self.min_area.map(|v| v.to_string()));
        push("max_area", self.max_area.map(|v| v.to_string()));
        push("bedrooms", self.bedrooms.map(|v| v.to_string()));
        push("bathrooms", self.bathrooms.map(|v| v.to_string()));
        if let Some(sort) = self.sort {
            let (by, order) = sort.backend_params();
            push("sort_by", Some(by.to_string()));
            push("sort_order", Some(order.to_string()));
        }
        push("page", Some(self.page().to_string()));
        push("per_page", Some(self.per_page().to_string()));

        query
    }
}

fn check_range(name: &str, min: Option<f64>, max: Option<f64>) -> Result<(), PortalError> {
    for value in [min, max].into_iter().flatten() {
        if !value.is_finite() || value < 0.0 {
            return Err(PortalError::InvalidInput(format!(
                "{} filter must be a non-negative number",
                name
            )));
        }
    }

    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(PortalError::InvalidInput(format!(
                "min_{} ({}) is greater than max_{} ({})",
                name, min, name, max
            )));
        }
    }
    Ok(())
}

pub fn category_cookie(category: Category, secure: bool) -> Cookie<'static> {
    Cookie::build(CATEGORY_COOKIE, category.as_str())
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::days(30))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    fn parse(query: &str) -> PropertyFilters {
        Query::<PropertyFilters>::from_query(query).unwrap().into_inner()
    }

    fn param<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
        query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_blank_fields_are_unset() {
        let filters = parse("search=&min_price=&category=&bedrooms=3&sort=");
        assert_eq!(filters.search, None);
        assert_eq!(filters.min_price, None);
        assert_eq!(filters.category, None);
        assert_eq!(filters.bedrooms, Some(3));
    }

    #[test]
    fn test_to_query_composes_backend_params() {
        let filters = parse("search=Nile+view&category=rent&min_price=5000&max_price=20000&sort=price_desc&page=2");
        let query = filters.to_query();

        assert_eq!(param(&query, "search"), Some("Nile view"));
        assert_eq!(param(&query, "status"), Some("rent"));
        assert_eq!(param(&query, "min_price"), Some("5000"));
        assert_eq!(param(&query, "max_price"), Some("20000"));
        assert_eq!(param(&query, "sort_by"), Some("price"));
        assert_eq!(param(&query, "sort_order"), Some("desc"));
        assert_eq!(param(&query, "page"), Some("2"));
        assert_eq!(param(&query, "per_page"), Some("12"));
        assert_eq!(param(&query, "area_id"), None);
    }

    #[test]
    fn test_paging_bounds() {
        let filters = parse("page=0&per_page=500");
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Query::<PropertyFilters>::from_query("category=lease").is_err());
        assert!(Query::<PropertyFilters>::from_query("min_price=cheap").is_err());

        let inverted = parse("min_price=900&max_price=100");
        assert!(matches!(inverted.validate(), Err(PortalError::InvalidInput(_))));

        let negative = parse("min_area=-5");
        assert!(negative.validate().is_err());

        assert!(parse("min_area=50&max_area=50").validate().is_ok());
    }

    #[test]
    fn test_remembered_category() {
        let filters = parse("").with_remembered_category(Some(Category::Rent));
        assert_eq!(filters.category, Some(Category::Rent));

        let filters = parse("category=sale").with_remembered_category(Some(Category::Rent));
        assert_eq!(filters.category, Some(Category::Sale));
    }
}
