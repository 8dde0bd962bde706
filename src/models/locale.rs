// src/models/locale.rs
// DOCUMENTATION: Active display language for a request
// PURPOSE: Pick localized fields and messages (Arabic / English)

use crate::config::Config;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::{ready, Ready};

/// Cookie the frontend uses to remember the chosen language
pub const LOCALE_COOKIE: &str = "NEXT_LOCALE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ar,
    En,
}

impl Locale {
    /// Parse "ar", "en", "en-US", "ar_EG"...
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match primary.as_str() {
            "ar" => Some(Locale::Ar),
            "en" => Some(Locale::En),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ar => "ar",
            Locale::En => "en",
        }
    }

    pub fn other(&self) -> Locale {
        match self {
            Locale::Ar => Locale::En,
            Locale::En => Locale::Ar,
        }
    }

    /// Shown in a suggestion panel that has no matches
    pub fn no_results_message(&self) -> &'static str {
        match self {
            Locale::Ar => "لا توجد نتائج",
            Locale::En => "No results found",
        }
    }

    /// Resolve from query `locale`, the locale cookie, then Accept-Language
    pub fn resolve(req: &HttpRequest, default: Locale) -> Locale {
        let from_query = web::Query::<LocaleQuery>::from_query(req.query_string())
            .ok()
            .and_then(|q| q.locale.as_deref().and_then(Locale::from_code));
        if let Some(locale) = from_query {
            return locale;
        }

        if let Some(locale) = req
            .cookie(LOCALE_COOKIE)
            .and_then(|c| Locale::from_code(c.value()))
        {
            return locale;
        }

        req.headers()
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| {
                h.split(',')
                    .filter_map(|tag| tag.split(';').next())
                    .find_map(Locale::from_code)
            })
            .unwrap_or(default)
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::Ar
    }
}

#[derive(Debug, Deserialize)]
struct LocaleQuery {
    locale: Option<String>,
}

impl FromRequest for Locale {
    type Error = Infallible;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let default = req
            .app_data::<web::Data<Config>>()
            .map(|config| config.default_locale)
            .unwrap_or_default();
        ready(Ok(Locale::resolve(req, default)))
    }
}
