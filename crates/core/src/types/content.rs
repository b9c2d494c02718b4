//! Records persisted in the storefront's generated data files.
//!
//! Field names and order match the TypeScript interfaces the storefront
//! compiles against; rich text (`content`) is HTML and is carried verbatim.

use serde::{Deserialize, Serialize};

use super::id::{BlogPostId, IngredientEntryId, LegalDocumentId};

/// A record addressable by a string key within its collection.
pub trait Keyed {
    /// The record's identity within its collection.
    fn key(&self) -> &str;
}

/// A blog article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    /// HTML body.
    pub content: String,
    pub image: String,
    /// Publication date as entered (`YYYY-MM-DD`).
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
}

impl BlogPost {
    /// Author used for posts created in the dashboard.
    pub const DEFAULT_AUTHOR: &'static str = "Marom Team";
}

impl Keyed for BlogPost {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// A legal page (terms, privacy policy, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDocument {
    pub id: LegalDocumentId,
    pub title: String,
    pub slug: String,
    /// HTML body.
    pub content: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: String,
}

impl Keyed for LegalDocument {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Ingredient spotlight entry shown on the storefront home page.
///
/// Unlike the `ingredients` table, benefits are a single free-text string
/// and entries carry an explicit display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub id: IngredientEntryId,
    pub name: String,
    pub image: String,
    pub description: String,
    pub benefits: String,
    pub order: i64,
}

impl Keyed for IngredientEntry {
    fn key(&self) -> &str {
        self.id.as_str()
    }
}

/// Storefront-wide settings edited on the socials screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub social_links: SocialLinks,
    pub trustindex_widget_code: String,
}

/// Social profile URLs. Empty strings hide the icon on the storefront.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub facebook: String,
    pub instagram: String,
    pub tiktok: String,
    pub youtube: String,
    pub whatsapp: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_document_uses_camel_case_date() {
        let doc = LegalDocument {
            id: LegalDocumentId::new("terms"),
            title: "Terms".into(),
            slug: "terms".into(),
            content: "<h2>1.</h2>".into(),
            last_updated: "2025-02-01".into(),
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["lastUpdated"], "2025-02-01");
        assert!(value.get("last_updated").is_none());
    }

    #[test]
    fn test_blog_post_requires_every_field() {
        let partial = serde_json::json!({"id": "1", "title": "T"});
        assert!(serde_json::from_value::<BlogPost>(partial).is_err());
    }

    #[test]
    fn test_site_settings_fill_missing_fields() {
        let settings: SiteSettings =
            serde_json::from_str(r#"{"socialLinks": {"instagram": "https://instagram.com/marom"}}"#)
                .unwrap();
        assert_eq!(settings.social_links.instagram, "https://instagram.com/marom");
        assert_eq!(settings.social_links.facebook, "");
        assert_eq!(settings.trustindex_widget_code, "");
    }

    #[test]
    fn test_site_settings_field_order() {
        let json = serde_json::to_string(&SiteSettings::default()).unwrap();
        assert_eq!(
            json,
            r#"{"socialLinks":{"facebook":"","instagram":"","tiktok":"","youtube":"","whatsapp":""},"trustindexWidgetCode":""}"#
        );
    }
}
