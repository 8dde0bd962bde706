// src/models/area.rs
// DOCUMENTATION: Areas, property types and suggestion entries
// PURPOSE: Display-name and coordinate rules shared by listings and autocomplete

use super::lenient::{first_text, value_to_f64, value_to_string};
use super::Locale;
use serde::Serialize;
use serde_json::Value;

const LAT_ALIASES: &[&str] = &["lat", "latitude", "location_lat", "map_lat"];
const LNG_ALIASES: &[&str] = &["lng", "lon", "long", "longitude", "location_lng", "map_lng"];

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Name shown for an area-like record
/// DOCUMENTATION: name_<locale> → title → name_<other locale> → name
/// Empty strings are skipped; returns "" when nothing matches
pub fn display_name(value: &Value, locale: Locale) -> String {
    let own = format!("name_{}", locale.code());
    let other = format!("name_{}", locale.other().code());
    first_text(value, &[own.as_str(), "title", other.as_str(), "name"]).unwrap_or_default()
}

/// Best-effort coordinates of a backend record
/// DOCUMENTATION: Tries every alias at the top level, then inside
/// `location`, `coordinates` and `geometry.location`. Both values must be
/// finite numbers (or numeric strings), otherwise None.
pub fn extract_coordinates(value: &Value) -> Option<Coordinates> {
    let candidates = [
        Some(value),
        value.get("location"),
        value.get("coordinates"),
        value.get("geometry").and_then(|g| g.get("location")),
    ];

    candidates
        .into_iter()
        .flatten()
        .find_map(|scope| {
            let lat = first_number(scope, LAT_ALIASES)?;
            let lng = first_number(scope, LNG_ALIASES)?;
            Some(Coordinates { lat, lng })
        })
}

fn first_number(scope: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| scope.get(*key))
        .find_map(value_to_f64)
}

/// Backend id of a record as text
pub fn record_id(value: &Value) -> String {
    value
        .get("id")
        .and_then(value_to_string)
        .unwrap_or_default()
}

/// One entry of the area autocomplete / area listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaSuggestion {
    pub id: String,
    pub display_name: String,
    pub coordinates: Option<Coordinates>,
}

impl AreaSuggestion {
    pub fn from_value(value: &Value, locale: Locale) -> Self {
        AreaSuggestion {
            id: record_id(value),
            display_name: display_name(value, locale),
            coordinates: extract_coordinates(value),
        }
    }
}

/// Property type option (apartment, villa, ...)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeOption {
    pub id: String,
    pub name: String,
}

impl TypeOption {
    pub fn from_value(value: &Value, locale: Locale) -> Self {
        TypeOption {
            id: record_id(value),
            name: display_name(value, locale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_prefers_locale() {
        let area = json!({"name_ar": "المعادي", "name_en": "Maadi", "title": "Maadi, Cairo", "name": "maadi"});
        assert_eq!(display_name(&area, Locale::Ar), "المعادي");
        assert_eq!(display_name(&area, Locale::En), "Maadi");
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let area = json!({"name_ar": "", "title": "New Cairo", "name_en": "Fifth Settlement", "name": "x"});
        assert_eq!(display_name(&area, Locale::Ar), "New Cairo");

        let area = json!({"name_en": "Zamalek", "name": "zamalek"});
        assert_eq!(display_name(&area, Locale::Ar), "Zamalek");

        let area = json!({"name": "Giza"});
        assert_eq!(display_name(&area, Locale::En), "Giza");

        assert_eq!(display_name(&json!({}), Locale::En), "");
    }

    #[test]
    fn test_coordinates_for_every_alias() {
        for lat_key in LAT_ALIASES {
            for lng_key in LNG_ALIASES {
                let mut map = serde_json::Map::new();
                map.insert(lat_key.to_string(), json!("30.0444"));
                map.insert(lng_key.to_string(), json!(31.2357));
                let value = Value::Object(map);
                assert_eq!(
                    extract_coordinates(&value),
                    Some(Coordinates { lat: 30.0444, lng: 31.2357 }),
                    "aliases {} / {}",
                    lat_key,
                    lng_key
                );
            }
        }
    }

    #[test]
    fn test_coordinates_missing_or_non_finite() {
        assert_eq!(extract_coordinates(&json!({"lat": 30.0})), None);
        assert_eq!(extract_coordinates(&json!({"lat": "abc", "lng": 31.0})), None);
        assert_eq!(extract_coordinates(&json!({"lat": "NaN", "lng": "31"})), None);
        assert_eq!(extract_coordinates(&json!({"lat": "Infinity", "lng": "31"})), None);
        assert_eq!(extract_coordinates(&json!({"lat": null, "lng": null})), None);
        assert_eq!(extract_coordinates(&json!({})), None);
    }

    #[test]
    fn test_coordinates_nested_scopes() {
        let value = json!({"location": {"latitude": "29.96", "longitude": "31.25"}});
        assert_eq!(
            extract_coordinates(&value),
            Some(Coordinates { lat: 29.96, lng: 31.25 })
        );

        let value = json!({"geometry": {"location": {"lat": 30.1, "lng": 31.3}}});
        assert_eq!(
            extract_coordinates(&value),
            Some(Coordinates { lat: 30.1, lng: 31.3 })
        );
    }

    #[test]
    fn test_suggestion_from_value() {
        let value = json!({"id": 12, "name_en": "Heliopolis", "lat": 30.09, "lng": 31.32});
        let suggestion = AreaSuggestion::from_value(&value, Locale::En);
        assert_eq!(suggestion.id, "12");
        assert_eq!(suggestion.display_name, "Heliopolis");
        assert!(suggestion.coordinates.is_some());
    }
}
