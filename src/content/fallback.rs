//! Offline content: built-in documents and primary/secondary fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::Result;

use super::store::{ContentStore, ContentType};

/// Content store serving built-in documents. Never fails.
#[derive(Debug, Clone)]
pub struct StaticContentStore {
    home_page: Value,
    services: Vec<Value>,
    about_page: Value,
    contact_page: Value,
}

impl Default for StaticContentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StaticContentStore {
    pub fn new() -> Self {
        Self {
            home_page: json!({
                "_id": "fallback-home",
                "title": "Welcome to Strategic Business Advisor",
                "subtitle": "Modern Web Development",
                "description": "Tell us about your project and get tailored service recommendations, a phased roadmap and clear next steps.",
                "ctaText": "Learn More",
                "ctaLink": "/advisor"
            }),
            services: vec![
                service(
                    "service-1",
                    "Web Development",
                    "Modern web applications built with React, TypeScript, and best practices.",
                    "💻",
                    "web-development",
                ),
                service(
                    "service-2",
                    "UI/UX Design",
                    "Beautiful and intuitive user interfaces designed for optimal user experience.",
                    "🎨",
                    "ui-ux-design",
                ),
                service(
                    "service-3",
                    "Mobile Development",
                    "Cross-platform mobile applications using React Native and modern frameworks.",
                    "📱",
                    "mobile-development",
                ),
                service(
                    "service-4",
                    "Consulting",
                    "Expert guidance on technology choices, architecture, and development strategies.",
                    "🤝",
                    "consulting",
                ),
            ],
            about_page: json!({
                "_id": "fallback-about",
                "title": "About Us",
                "content": [
                    block("We are a passionate team of developers and designers dedicated to creating exceptional digital experiences."),
                    block("Our approach combines current technology with timeless design principles."),
                ]
            }),
            contact_page: json!({
                "_id": "fallback-contact",
                "title": "Contact Us",
                "content": [
                    block("Get in touch with us to discuss your project or ask any questions."),
                ],
                "email": "hello@example.com",
                "phone": "+1 (555) 123-4567",
                "address": "123 Main Street, City, State 12345"
            }),
        }
    }

    /// Replace the built-in service documents.
    pub fn with_services(mut self, services: Vec<Value>) -> Self {
        self.services = services;
        self
    }
}

fn service(id: &str, title: &str, description: &str, icon: &str, slug: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "description": description,
        "icon": icon,
        "slug": { "current": slug }
    })
}

fn block(text: &str) -> Value {
    json!({ "_type": "block", "children": [{ "text": text }] })
}

#[async_trait]
impl ContentStore for StaticContentStore {
    async fn fetch(&self, content_type: ContentType) -> Result<Vec<Value>> {
        Ok(match content_type {
            ContentType::HomePage => vec![self.home_page.clone()],
            ContentType::Service => self.services.clone(),
            ContentType::AboutPage => vec![self.about_page.clone()],
            ContentType::ContactPage => vec![self.contact_page.clone()],
            ContentType::SiteSettings => Vec::new(),
        })
    }
}

/// Reads from a primary store, answering from a secondary one whenever the
/// primary fails for a given type.
pub struct FallbackContentStore {
    primary: Arc<dyn ContentStore>,
    secondary: Arc<dyn ContentStore>,
}

impl FallbackContentStore {
    pub fn new(primary: Arc<dyn ContentStore>, secondary: Arc<dyn ContentStore>) -> Self {
        Self { primary, secondary }
    }

    /// Primary store backed by the built-in documents.
    pub fn with_static(primary: Arc<dyn ContentStore>) -> Self {
        Self::new(primary, Arc::new(StaticContentStore::new()))
    }
}

#[async_trait]
impl ContentStore for FallbackContentStore {
    async fn fetch(&self, content_type: ContentType) -> Result<Vec<Value>> {
        match self.primary.fetch(content_type).await {
            Ok(docs) => Ok(docs),
            Err(e) => {
                warn!(
                    content_type = %content_type,
                    error = %e,
                    "Failed to fetch from CMS, using fallback data"
                );
                self.secondary.fetch(content_type).await
            }
        }
    }
}
