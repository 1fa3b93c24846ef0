//! Wikimedia Commons files.
//!
//! Three sequential calls, each depending on the previous one:
//!
//! 1. `action=query&prop=info` for the canonical URL and page ID,
//! 2. the commonsapi tool (XML) for thumbnail, author, date and license,
//! 3. `wbgetentities` on `M<pageid>` for a structured caption.
//!
//! The caption lookup is optional; when it fails the tool's free-text
//! description is used instead.

use super::{clean_title, failure, wrong_project, ProjectResolver, WikibaseEntity};
use crate::config::{fill, EmbedConfig};
use crate::fetch::{decode, FetchCache, ResponseFormat};
use crate::lang::LanguageChain;
use crate::render::{commons_figure, CommonsView};
use crate::types::{Align, EmbedResult, EntityReference, Project, RenderAttributes};
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, warn};

static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://commons\.wikimedia\.org/wiki/(.*)").expect("static regex")
});

// action=query&prop=info&inprop=url

#[derive(Debug, Deserialize)]
struct FileInfoResponse {
    #[serde(default)]
    query: Option<FileInfoQuery>,
}

#[derive(Debug, Deserialize)]
struct FileInfoQuery {
    #[serde(default)]
    pages: BTreeMap<String, FileInfoPage>,
}

#[derive(Debug, Deserialize)]
struct FileInfoPage {
    #[serde(default)]
    pageid: Option<u64>,
    title: String,
    #[serde(default)]
    canonicalurl: Option<String>,
}

// commonsapi.php (XML, converted)

#[derive(Debug, Deserialize)]
struct ToolResponse {
    file: ToolFile,
    #[serde(default)]
    licenses: Option<ToolLicenses>,
    #[serde(default)]
    description: Option<ToolDescription>,
}

#[derive(Debug, Deserialize)]
struct ToolFile {
    urls: ToolUrls,
    #[serde(default)]
    date: XmlText,
    #[serde(default)]
    author: XmlText,
}

#[derive(Debug, Deserialize)]
struct ToolUrls {
    thumbnail: String,
}

#[derive(Debug, Deserialize)]
struct ToolLicenses {
    #[serde(default)]
    license: Option<OneOrMany<ToolLicense>>,
}

#[derive(Debug, Deserialize)]
struct ToolLicense {
    #[serde(default)]
    name: XmlText,
}

#[derive(Debug, Deserialize)]
struct ToolDescription {
    #[serde(default)]
    language: XmlText,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn first(self) -> Option<T> {
        match self {
            OneOrMany::One(item) => Some(item),
            OneOrMany::Many(items) => items.into_iter().next(),
        }
    }
}

/// A leaf converted from XML: text, or something else when the element was
/// empty, attributed or repeated.
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum XmlText {
    Text(String),
    Other(Value),
    #[default]
    Absent,
}

impl XmlText {
    fn into_text(self) -> String {
        match self {
            XmlText::Text(text) => text,
            XmlText::Other(value) => value_text(&value),
            XmlText::Absent => String::new(),
        }
    }
}

impl XmlText {
    /// Text of the repeated element whose `code` attribute comes first in
    /// `chain`, falling back to the first element.
    fn into_localized(self, chain: &LanguageChain) -> String {
        let items = match self {
            XmlText::Other(Value::Array(items)) => items,
            other => return other.into_text(),
        };
        let code_of = |item: &Value| {
            item.pointer("/@attributes/code")
                .and_then(Value::as_str)
                .map(str::to_ascii_lowercase)
        };
        chain
            .codes()
            .iter()
            .find_map(|code| {
                items
                    .iter()
                    .find(|item| code_of(item).as_deref() == Some(code.as_str()))
            })
            .or_else(|| items.first())
            .map(value_text)
            .unwrap_or_default()
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Object(fields) => fields
            .get(crate::transport::xml::TEXT_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Value::Array(items) => items.first().map(value_text).unwrap_or_default(),
        _ => String::new(),
    }
}

// wbgetentities

#[derive(Debug, Deserialize)]
struct EntitiesResponse {
    #[serde(default)]
    entities: HashMap<String, WikibaseEntity>,
}

struct FileInfo {
    page_id: u64,
    file_url: String,
    file_title: String,
}

pub struct Commons {
    fetch: Arc<FetchCache>,
    config: Arc<EmbedConfig>,
}

impl Commons {
    pub fn new(fetch: Arc<FetchCache>, config: Arc<EmbedConfig>) -> Self {
        Self { fetch, config }
    }

    pub fn file_info_url(&self, title: &str) -> String {
        fill(&self.config.endpoints.commons_file_info, &[("title", title)])
    }

    pub fn tool_url(&self, file_name: &str, width: u32) -> String {
        fill(
            &self.config.endpoints.commons_tool,
            &[("image", file_name), ("width", &width.to_string())],
        )
    }

    pub fn entities_url(&self, page_id: u64) -> String {
        fill(
            &self.config.endpoints.commons_entities,
            &[("ids", &format!("M{}", page_id))],
        )
    }

    async fn file_info(&self, title: &str) -> Result<FileInfo> {
        let url = self.file_info_url(title);
        let response: FileInfoResponse = self.fetch.fetch_as(&url, ResponseFormat::Json).await?;
        let page = response
            .query
            .and_then(|q| q.pages.into_values().next())
            .ok_or_else(|| unable_to_fetch(title, "query.pages"))?;
        let (Some(page_id), Some(file_url)) = (page.pageid, page.canonicalurl) else {
            // Missing and invalid titles come back without a page ID.
            return Err(unable_to_fetch(title, "query.pages.pageid"));
        };
        let file_title = page
            .title
            .split_once(':')
            .map(|(_, name)| name)
            .unwrap_or(&page.title)
            .to_string();
        Ok(FileInfo {
            page_id,
            file_url,
            file_title,
        })
    }

    async fn tool_data(&self, file_name: &str, width: u32) -> Result<ToolResponse> {
        let url = self.tool_url(file_name, width);
        let value = self.fetch.fetch(&url, ResponseFormat::Xml).await?;
        if let Some(error) = value.get("error") {
            let message = value_text(error);
            return Err(Error::upstream(if message.is_empty() {
                format!("The Commons tool reported an error for: {}", file_name)
            } else {
                message
            }));
        }
        decode(&url, value)
    }

    /// Structured caption in the preferred language, escaped, if one exists.
    async fn caption(&self, page_id: u64, chain: &LanguageChain) -> Option<String> {
        let url = self.entities_url(page_id);
        match self
            .fetch
            .fetch_as::<EntitiesResponse>(&url, ResponseFormat::Json)
            .await
        {
            // Captions are plain text typed by users; the caption block is markup.
            Ok(response) => response
                .entities
                .into_values()
                .next()
                .and_then(|entity| chain.pick(&entity.labels))
                .map(|label| html_escape::encode_text(&label).into_owned()),
            Err(e) => {
                warn!(url = %url, error = %e, "caption lookup failed");
                None
            }
        }
    }

    async fn view(&self, title: &str, width: u32, chain: &LanguageChain) -> Result<CommonsView> {
        let info = self.file_info(title).await?;
        let file_name = info.file_title.replace(' ', "_");
        let tool = self.tool_data(&file_name, width).await?;

        let description = match self.caption(info.page_id, chain).await {
            Some(caption) => caption,
            None => {
                debug!(file = %file_name, "no structured caption, using tool description");
                tool.description
                    .map(|d| d.language.into_localized(chain))
                    .unwrap_or_default()
            }
        };
        let license = tool
            .licenses
            .and_then(|l| l.license)
            .and_then(OneOrMany::first)
            .map(|l| l.name.into_text())
            .unwrap_or_default();

        Ok(CommonsView {
            file_url: info.file_url,
            thumbnail_url: tool.file.urls.thumbnail,
            file_name,
            file_title: info.file_title,
            description,
            date: tool.file.date.into_text(),
            author: tool.file.author.into_text(),
            license,
        })
    }
}

fn unable_to_fetch(title: &str, field: &str) -> Error {
    Error::missing_with_context(
        format!("Unable to fetch file information for: {}", title),
        ErrorContext::new()
            .with_field_path(field)
            .with_source("commons"),
    )
}

#[async_trait]
impl ProjectResolver for Commons {
    fn project(&self) -> Project {
        Project::Commons
    }

    fn pattern(&self) -> &'static Regex {
        &PATTERN
    }

    fn reference(&self, caps: &Captures<'_>) -> Option<EntityReference> {
        Some(EntityReference::Commons {
            file_title: clean_title(&caps[1])?,
        })
    }

    async fn embed(&self, reference: &EntityReference, attrs: &RenderAttributes) -> EmbedResult {
        match reference {
            EntityReference::Commons { file_title } => self.render(file_title, attrs).await,
            other => wrong_project(Project::Commons, other),
        }
    }

    async fn render(&self, title: &str, attrs: &RenderAttributes) -> EmbedResult {
        let Some(title) = clean_title(title) else {
            return EmbedResult::from(unable_to_fetch(title, "title"));
        };
        let width = attrs.width.unwrap_or(self.config.default_commons_width);
        let align = attrs.align.unwrap_or(Align::Center);
        let chain = LanguageChain::new(
            attrs
                .lang
                .as_deref()
                .unwrap_or(&self.config.host_language),
        );
        match self.view(&title, width, &chain).await {
            Ok(view) => EmbedResult::Html(commons_figure(&view, width, align)),
            Err(e) => failure(Project::Commons, e),
        }
    }
}
