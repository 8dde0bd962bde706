// src/models/lenient.rs
// DOCUMENTATION: Forgiving decoders for backend JSON
// PURPOSE: Fold missing or oddly typed fields into defaults instead of failing

use crate::errors::PortalError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Finite number from a JSON number or numeric string
pub fn value_to_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite())
}

/// Text form of a scalar; objects and arrays yield None
pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-empty string among `keys` on an object
pub fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(value_to_string)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

pub fn de_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value_to_string(&value).unwrap_or_default())
}

pub fn de_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value_to_f64(&value).unwrap_or(0.0))
}

pub fn de_u64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(value_to_f64(&value)
        .filter(|n| *n >= 0.0)
        .map(|n| n as u64)
        .unwrap_or(0))
}

pub fn de_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "1" | "true" | "yes"),
        _ => false,
    })
}

/// String or object carrying a name (e.g. `"type": {"name": "Villa"}`)
pub fn de_label<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Value::deserialize(d)?;
    Ok(match &value {
        Value::Object(_) => first_text(&value, &["name", "title", "name_en", "name_ar"]).unwrap_or_default(),
        other => value_to_string(other).unwrap_or_default(),
    })
}

/// Image list given as URLs or as objects holding one
pub fn de_images<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(d)?;
    let items = match value {
        Value::Array(items) => items,
        Value::String(s) if !s.is_empty() => vec![Value::String(s)],
        _ => Vec::new(),
    };

    Ok(items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.clone()),
            Value::Object(_) => first_text(item, &["url", "image", "path", "src"]),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect())
}

/// Strip a `{ "data": ... }` envelope when present
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

/// Decode a single record, tolerating a `data` envelope
pub fn decode_record<T: DeserializeOwned>(value: Value) -> Result<T, PortalError> {
    serde_json::from_value(unwrap_data(value)).map_err(|e| PortalError::Decode(e.to_string()))
}

/// Pagination metadata
/// DOCUMENTATION: Accepts both `meta` blocks and flat paginator objects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, deserialize_with = "de_u64")]
    pub current_page: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub last_page: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub per_page: u64,
    #[serde(default, deserialize_with = "de_u64")]
    pub total: u64,
}

impl Pagination {
    fn single(count: usize) -> Self {
        Pagination {
            current_page: 1,
            last_page: 1,
            per_page: count as u64,
            total: count as u64,
        }
    }

    fn from_object(value: &Value, count: usize) -> Self {
        let mut pagination: Pagination =
            serde_json::from_value(value.clone()).unwrap_or_else(|_| Pagination::single(count));
        pagination.current_page = pagination.current_page.max(1);
        pagination.last_page = pagination.last_page.max(pagination.current_page);
        if pagination.total == 0 {
            pagination.total = count as u64;
        }
        pagination
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of records
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: DeserializeOwned> Page<T> {
    /// Decode a list response in any of the shapes the backend uses
    /// DOCUMENTATION: bare array, `{data: [..]}`, `{data: [..], meta: {..}}`,
    /// or a paginator `{data: {data: [..], current_page, ..}}`
    pub fn from_envelope(value: Value) -> Result<Self, PortalError> {
        let (raw_items, meta) = split_envelope(value)?;
        let count = raw_items.len();

        let items = raw_items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<T>, _>>()
            .map_err(|e| PortalError::Decode(e.to_string()))?;

        let pagination = match meta {
            Some(meta) => Pagination::from_object(&meta, count),
            None => Pagination::single(count),
        };

        Ok(Page { items, pagination })
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Raw list items of a response, empty when the shape is unknown
pub fn extract_list(value: Value) -> Vec<Value> {
    split_envelope(value).map(|(items, _)| items).unwrap_or_default()
}

fn split_envelope(value: Value) -> Result<(Vec<Value>, Option<Value>), PortalError> {
    match value {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => {
                let meta = map.remove("meta").or_else(|| Some(Value::Object(map)));
                Ok((items, meta))
            }
            Some(Value::Object(mut inner)) => match inner.remove("data") {
                Some(Value::Array(items)) => Ok((items, Some(Value::Object(inner)))),
                _ => Err(PortalError::Decode("paginator without data list".to_string())),
            },
            Some(Value::Null) | None => Ok((Vec::new(), None)),
            Some(_) => Err(PortalError::Decode("data is not a list".to_string())),
        },
        Value::Null => Ok((Vec::new(), None)),
        _ => Err(PortalError::Decode("expected a list response".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "de_string")]
        id: String,
    }

    #[test]
    fn test_value_to_f64_rejects_non_finite() {
        assert_eq!(value_to_f64(&json!(30.04)), Some(30.04));
        assert_eq!(value_to_f64(&json!("31.2")), Some(31.2));
        assert_eq!(value_to_f64(&json!("1,250,000")), Some(1_250_000.0));
        assert_eq!(value_to_f64(&json!("NaN")), None);
        assert_eq!(value_to_f64(&json!("inf")), None);
        assert_eq!(value_to_f64(&json!("")), None);
        assert_eq!(value_to_f64(&json!(null)), None);
    }

    #[test]
    fn test_first_text_skips_empty() {
        let value = json!({"name_en": "", "title": "  Maadi ", "name": "x"});
        assert_eq!(first_text(&value, &["name_en", "title", "name"]), Some("Maadi".to_string()));
    }

    #[test]
    fn test_page_from_bare_array() {
        let page: Page<Row> = Page::from_envelope(json!([{"id": 1}, {"id": "2"}])).unwrap();
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[1].id, "2");
        assert_eq!(page.pagination.total, 2);
        assert!(!page.pagination.has_more());
    }

    #[test]
    fn test_page_from_meta_envelope() {
        let page: Page<Row> = Page::from_envelope(json!({
            "data": [{"id": 5}],
            "meta": {"current_page": 2, "last_page": "4", "per_page": 1, "total": 4}
        }))
        .unwrap();
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.last_page, 4);
        assert!(page.pagination.has_more());
    }

    #[test]
    fn test_page_from_paginator() {
        let page: Page<Row> = Page::from_envelope(json!({
            "status": true,
            "data": {"data": [{"id": 9}], "current_page": 1, "last_page": 1, "total": 1}
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 1);
    }

    #[test]
    fn test_page_rejects_scalar() {
        let result: Result<Page<Row>, _> = Page::from_envelope(json!("oops"));
        assert!(matches!(result, Err(PortalError::Decode(_))));
    }

    #[test]
    fn test_decode_record_unwraps_data() {
        let row: Row = decode_record(json!({"data": {"id": 3}})).unwrap();
        assert_eq!(row.id, "3");
    }
}
