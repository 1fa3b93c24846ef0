//! Wikidata items.

use super::{clean_title, failure, wrong_project, ProjectResolver, WikibaseEntity};
use crate::config::{fill, EmbedConfig};
use crate::fetch::{FetchCache, ResponseFormat};
use crate::lang::LanguageChain;
use crate::render::{wikidata_legend, WikidataView};
use crate::types::{EmbedResult, EntityReference, Project, RenderAttributes};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?wikidata\.org/wiki/(.*)").expect("static regex")
});

#[derive(Debug, Deserialize)]
struct EntityData {
    #[serde(default)]
    entities: HashMap<String, WikibaseEntity>,
}

/// `42` and `q42` become `Q42`; anything already starting with `Q` is kept.
pub fn normalize_item_id(raw: &str) -> String {
    let id = raw.trim();
    match id.chars().next() {
        Some('Q') => id.to_string(),
        Some('q') => format!("Q{}", &id[1..]),
        _ => format!("Q{}", id),
    }
}

pub struct Wikidata {
    fetch: Arc<FetchCache>,
    config: Arc<EmbedConfig>,
}

impl Wikidata {
    pub fn new(fetch: Arc<FetchCache>, config: Arc<EmbedConfig>) -> Self {
        Self { fetch, config }
    }

    pub fn entity_url(&self, item_id: &str) -> String {
        fill(&self.config.endpoints.wikidata_entity, &[("id", item_id)])
    }

    async fn view(&self, item_id: &str, chain: &LanguageChain) -> Result<WikidataView> {
        let url = self.entity_url(item_id);
        let mut data: EntityData = self.fetch.fetch_as(&url, ResponseFormat::Json).await?;
        // Redirected items are keyed by their target ID.
        let entity = match data.entities.remove(item_id) {
            Some(entity) => entity,
            None => data.entities.into_values().next().ok_or_else(|| {
                Error::missing_with_context(
                    format!("No Wikidata item found for: {}", item_id),
                    ErrorContext::new()
                        .with_field_path("entities")
                        .with_source("wikidata"),
                )
            })?,
        };
        Ok(WikidataView {
            page_url: fill(&self.config.endpoints.wikidata_page, &[("id", item_id)]),
            icon_url: self.config.endpoints.wikidata_icon.clone(),
            label: chain.resolve(&entity.labels),
            description: chain.resolve(&entity.descriptions),
        })
    }
}

#[async_trait]
impl ProjectResolver for Wikidata {
    fn project(&self) -> Project {
        Project::Wikidata
    }

    fn pattern(&self) -> &'static Regex {
        &PATTERN
    }

    fn reference(&self, caps: &Captures<'_>) -> Option<EntityReference> {
        Some(EntityReference::Wikidata {
            item_id: normalize_item_id(&clean_title(&caps[2])?),
        })
    }

    async fn embed(&self, reference: &EntityReference, attrs: &RenderAttributes) -> EmbedResult {
        match reference {
            EntityReference::Wikidata { item_id } => self.render(item_id, attrs).await,
            other => wrong_project(Project::Wikidata, other),
        }
    }

    async fn render(&self, title: &str, attrs: &RenderAttributes) -> EmbedResult {
        let Some(title) = clean_title(title) else {
            return EmbedResult::from(Error::missing_with_context(
                "No Wikidata item ID given",
                ErrorContext::new().with_source("wikidata"),
            ));
        };
        let item_id = normalize_item_id(&title);
        let chain = LanguageChain::new(
            attrs
                .lang
                .as_deref()
                .unwrap_or(&self.config.host_language),
        );
        match self.view(&item_id, &chain).await {
            Ok(view) => EmbedResult::Html(wikidata_legend(&view)),
            Err(e) => failure(Project::Wikidata, e),
        }
    }
}
