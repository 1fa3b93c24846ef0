//! Wikipedia articles via the REST page-summary endpoint.

use super::{clean_title, failure, wrong_project, ProjectResolver};
use crate::config::{fill, EmbedConfig};
use crate::fetch::{FetchCache, ResponseFormat};
use crate::render::{summary_block, SummaryView, Thumbnail};
use crate::types::{
    is_language_code, EmbedResult, EntityReference, ErrorKind, Project, RenderAttributes,
};
use crate::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::sync::Arc;

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://([a-z]+)\.wikipedia\.org/wiki/(.*)").expect("static regex")
});

const DEFAULT_LANG: &str = "en";

#[derive(Debug, Deserialize)]
struct PageSummary {
    displaytitle: String,
    extract_html: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    thumbnail: Option<SummaryThumbnail>,
    content_urls: ContentUrls,
}

#[derive(Debug, Deserialize)]
struct SummaryThumbnail {
    source: String,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ContentUrls {
    desktop: PlatformUrls,
}

#[derive(Debug, Deserialize)]
struct PlatformUrls {
    page: String,
}

impl From<PageSummary> for SummaryView {
    fn from(summary: PageSummary) -> Self {
        SummaryView {
            title_html: summary.displaytitle,
            extract_html: summary.extract_html,
            page_url: summary.content_urls.desktop.page,
            description: summary.description.unwrap_or_default(),
            thumbnail: summary.thumbnail.map(|t| Thumbnail {
                source: t.source,
                width: t.width,
                height: t.height,
            }),
        }
    }
}

pub struct Wikipedia {
    fetch: Arc<FetchCache>,
    config: Arc<EmbedConfig>,
}

impl Wikipedia {
    pub fn new(fetch: Arc<FetchCache>, config: Arc<EmbedConfig>) -> Self {
        Self { fetch, config }
    }

    /// Page-summary endpoint for `title` on the `lang` wiki.
    pub fn summary_url(&self, lang: &str, title: &str) -> String {
        fill(
            &self.config.endpoints.wikipedia_summary,
            &[("lang", lang), ("title", title)],
        )
    }

    async fn summary(&self, lang: &str, title: &str) -> Result<SummaryView> {
        let url = self.summary_url(lang, title);
        let summary: PageSummary = self.fetch.fetch_as(&url, ResponseFormat::Json).await?;
        Ok(summary.into())
    }
}

#[async_trait]
impl ProjectResolver for Wikipedia {
    fn project(&self) -> Project {
        Project::Wikipedia
    }

    fn pattern(&self) -> &'static Regex {
        &PATTERN
    }

    fn reference(&self, caps: &Captures<'_>) -> Option<EntityReference> {
        Some(EntityReference::Wikipedia {
            lang: caps[1].to_ascii_lowercase(),
            title: clean_title(&caps[2])?,
        })
    }

    async fn embed(&self, reference: &EntityReference, attrs: &RenderAttributes) -> EmbedResult {
        match reference {
            EntityReference::Wikipedia { lang, title } => {
                let attrs = attrs.clone().with_lang(lang.clone());
                self.render(title, &attrs).await
            }
            other => wrong_project(Project::Wikipedia, other),
        }
    }

    async fn render(&self, title: &str, attrs: &RenderAttributes) -> EmbedResult {
        let Some(title) = clean_title(title) else {
            return wrong_title(title);
        };
        let lang = attrs.lang.as_deref().unwrap_or(DEFAULT_LANG);
        if !is_language_code(lang) {
            return EmbedResult::error(
                ErrorKind::MissingData,
                format!("Not a Wikipedia language code: {}", lang),
            );
        }
        match self.summary(lang, &title).await {
            Ok(view) => EmbedResult::Html(summary_block(&view)),
            Err(e) => failure(Project::Wikipedia, e),
        }
    }
}

fn wrong_title(title: &str) -> EmbedResult {
    EmbedResult::error(
        ErrorKind::MissingData,
        format!("Not a Wikipedia article title: {}", title),
    )
}
