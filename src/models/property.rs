// src/models/property.rs
// DOCUMENTATION: Property listing records
// PURPOSE: Decode listings from the backend and shape them for pages

use super::lenient::{de_bool, de_f64, de_images, de_label, de_string, de_u64};
use super::Locale;
use serde::{Deserialize, Serialize};

/// A property listing as returned by the backend
/// DOCUMENTATION: Every field is optional on the wire and folds to a default
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Property {
    #[serde(default, deserialize_with = "de_string")]
    pub id: String,

    #[serde(default, deserialize_with = "de_string")]
    pub slug: String,

    #[serde(default, deserialize_with = "de_string")]
    pub title: String,

    #[serde(default, deserialize_with = "de_string")]
    pub title_ar: String,

    #[serde(default, deserialize_with = "de_string")]
    pub title_en: String,

    #[serde(default, deserialize_with = "de_string")]
    pub description: String,

    /// Asking price (sale) or monthly rent
    #[serde(default, deserialize_with = "de_f64")]
    pub price: f64,

    /// Floor area in square meters
    #[serde(default, alias = "space", alias = "size", deserialize_with = "de_f64")]
    pub area: f64,

    #[serde(default, alias = "rooms", alias = "beds", deserialize_with = "de_u64")]
    pub bedrooms: u64,

    #[serde(default, alias = "baths", deserialize_with = "de_u64")]
    pub bathrooms: u64,

    #[serde(default, alias = "gallery", deserialize_with = "de_images")]
    pub images: Vec<String>,

    /// Main image when the backend sends it apart from the gallery
    #[serde(default, alias = "main_image", deserialize_with = "de_string")]
    pub image: String,

    /// sale / rent
    #[serde(default, deserialize_with = "de_label")]
    pub status: String,

    #[serde(default, rename = "type", alias = "property_type", deserialize_with = "de_label")]
    pub property_type: String,

    /// Area / neighbourhood label
    #[serde(default, alias = "area_name", deserialize_with = "de_label")]
    pub location: String,

    #[serde(default, deserialize_with = "de_string")]
    pub address: String,

    #[serde(default, alias = "is_favorite", alias = "favourite", deserialize_with = "de_bool")]
    pub is_favourite: bool,

    #[serde(default, deserialize_with = "de_string")]
    pub created_at: String,
}

/// Compact listing used by search pages and dashboard tables
#[derive(Debug, Clone, Serialize)]
pub struct PropertyCard {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub price: f64,
    pub area: f64,
    pub bedrooms: u64,
    pub bathrooms: u64,
    pub image: Option<String>,
    pub status: String,
    pub property_type: String,
    pub location: String,
    pub is_favourite: bool,
}

/// Full listing page payload
#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub card: PropertyCard,
    pub description: String,
    pub address: String,
    pub images: Vec<String>,
    pub created_at: String,
}

impl Property {
    /// Localized title: title_<locale> → title → title_<other locale>
    pub fn display_title(&self, locale: Locale) -> &str {
        let (own, other) = match locale {
            Locale::Ar => (&self.title_ar, &self.title_en),
            Locale::En => (&self.title_en, &self.title_ar),
        };
        [own, &self.title, other]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }

    pub fn cover_image(&self) -> Option<&str> {
        if !self.image.is_empty() {
            return Some(self.image.as_str());
        }
        self.images.first().map(String::as_str)
    }

    pub fn to_card(&self, locale: Locale) -> PropertyCard {
        PropertyCard {
            id: self.id.clone(),
            slug: self.slug.clone(),
            title: self.display_title(locale).to_string(),
            price: self.price,
            area: self.area,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            image: self.cover_image().map(str::to_string),
            status: self.status.clone(),
            property_type: self.property_type.clone(),
            location: self.location.clone(),
            is_favourite: self.is_favourite,
        }
    }

    pub fn to_detail(&self, locale: Locale) -> PropertyDetail {
        let mut images = self.images.clone();
        if !self.image.is_empty() && !images.contains(&self.image) {
            images.insert(0, self.image.clone());
        }

        PropertyDetail {
            card: self.to_card(locale),
            description: self.description.clone(),
            address: self.address.clone(),
            images,
            created_at: self.created_at.clone(),
        }
    }
}
