//! The read-only content store contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::advisor::CatalogEntry;
use crate::error::Result;

/// Document types served by the CMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentType {
    HomePage,
    Service,
    AboutPage,
    ContactPage,
    SiteSettings,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        Self::HomePage,
        Self::Service,
        Self::AboutPage,
        Self::ContactPage,
        Self::SiteSettings,
    ];

    /// The CMS `_type` value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::HomePage => "homePage",
            Self::Service => "service",
            Self::AboutPage => "aboutPage",
            Self::ContactPage => "contactPage",
            Self::SiteSettings => "siteSettings",
        }
    }

    /// Fields projected for this type.
    fn projection(&self) -> &'static str {
        match self {
            Self::HomePage => {
                "_id, title, subtitle, description, heroImage, ctaText, ctaLink"
            }
            Self::Service => "_id, title, description, icon, image, slug",
            Self::AboutPage => "_id, title, content, image",
            Self::ContactPage => "_id, title, content, email, phone, address",
            Self::SiteSettings => "_id, title, description, logo, navigation { label, link }",
        }
    }

    /// GROQ query returning every document of this type. Services keep
    /// their editorial order.
    pub fn query(&self) -> String {
        let ordering = match self {
            Self::Service => " | order(order asc)",
            _ => "",
        };
        format!(
            "*[_type == \"{}\"]{} {{ {} }}",
            self.type_name(),
            ordering,
            self.projection()
        )
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Read-only fetch-by-type access to CMS documents.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Every document of the given type, in store order.
    async fn fetch(&self, content_type: ContentType) -> Result<Vec<Value>>;

    /// The service collection projected onto catalog entries.
    ///
    /// Documents lacking an id or title are skipped.
    async fn fetch_services(&self) -> Result<Vec<CatalogEntry>> {
        let documents = self.fetch(ContentType::Service).await?;
        let total = documents.len();
        let entries: Vec<CatalogEntry> = documents
            .iter()
            .filter_map(CatalogEntry::from_document)
            .collect();
        if entries.len() < total {
            debug!(
                skipped = total - entries.len(),
                "Skipped service documents without id or title"
            );
        }
        Ok(entries)
    }
}
