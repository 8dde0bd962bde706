// src/models/blog.rs
// DOCUMENTATION: Blog posts
// PURPOSE: Decode blog content for the listing and article pages

use super::lenient::de_string;
use super::Locale;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Blog {
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

    #[serde(default, alias = "short_description", deserialize_with = "de_string")]
    pub excerpt: String,

    #[serde(default, alias = "body", alias = "description", deserialize_with = "de_string")]
    pub content: String,

    #[serde(default, alias = "cover", deserialize_with = "de_string")]
    pub image: String,

    #[serde(default, alias = "created_at", deserialize_with = "de_string")]
    pub published_at: String,
}

/// Card shown on the blog index
#[derive(Debug, Clone, Serialize)]
pub struct BlogSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub image: Option<String>,
    pub published_at: String,
}

impl Blog {
    pub fn display_title(&self, locale: Locale) -> String {
        let (own, other) = match locale {
            Locale::Ar => (&self.title_ar, &self.title_en),
            Locale::En => (&self.title_en, &self.title_ar),
        };
        [own, &self.title, other]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
            .to_string()
    }

    /// Excerpt, or the first 160 characters of the body
    pub fn summary_text(&self) -> String {
        if !self.excerpt.trim().is_empty() {
            return self.excerpt.trim().to_string();
        }
        let body = self.content.trim();
        match body.char_indices().nth(160) {
            Some((cut, _)) => format!("{}…", body[..cut].trim_end()),
            None => body.to_string(),
        }
    }

    pub fn to_summary(&self, locale: Locale) -> BlogSummary {
        BlogSummary {
            slug: if self.slug.is_empty() { self.id.clone() } else { self.slug.clone() },
            title: self.display_title(locale),
            excerpt: self.summary_text(),
            image: Some(self.image.clone()).filter(|s| !s.is_empty()),
            published_at: self.published_at.clone(),
        }
    }
}

/// Article page payload
#[derive(Debug, Clone, Serialize)]
pub struct BlogArticle {
    #[serde(flatten)]
    pub summary: BlogSummary,
    pub content: String,
}

impl From<(Blog, Locale)> for BlogArticle {
    fn from((blog, locale): (Blog, Locale)) -> Self {
        BlogArticle {
            summary: blog.to_summary(locale),
            content: blog.content,
        }
    }
}
