//! Per-project resolvers.
//!
//! Each resolver recognizes one URL shape, calls its upstream APIs through the
//! shared [`FetchCache`](crate::fetch::FetchCache) and renders the result.
//! Failures never escape: they come back as [`EmbedResult::Error`].

pub mod commons;
pub mod wikidata;
pub mod wikipedia;

pub use commons::Commons;
pub use wikidata::Wikidata;
pub use wikipedia::Wikipedia;

use crate::lang::TermMap;
use crate::types::{EmbedResult, EntityReference, ErrorKind, Project, RenderAttributes};
use crate::Error;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;
use tracing::warn;

/// Capability shared by every project.
#[async_trait]
pub trait ProjectResolver: Send + Sync {
    fn project(&self) -> Project;

    /// Case-insensitive pattern for embeddable URLs of this project.
    fn pattern(&self) -> &'static Regex;

    /// Reference built from a successful [`pattern`](Self::pattern) match.
    fn reference(&self, captures: &Captures<'_>) -> Option<EntityReference>;

    /// Reference for `url`, or `None` when the URL is not this project's.
    fn match_url(&self, url: &str) -> Option<EntityReference> {
        let captures = self.pattern().captures(url.trim())?;
        self.reference(&captures)
    }

    /// Render the entity behind `reference`.
    async fn embed(&self, reference: &EntityReference, attrs: &RenderAttributes) -> EmbedResult;

    /// Render by title directly (inline links and the lookup-by-title flow).
    async fn render(&self, title: &str, attrs: &RenderAttributes) -> EmbedResult;
}

/// Labels and descriptions of a Wikibase entity (Wikidata item or Commons
/// media info).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WikibaseEntity {
    #[serde(default)]
    pub labels: TermMap,
    #[serde(default)]
    pub descriptions: TermMap,
}

/// Title portion of a captured URL path: query string and fragment removed.
pub(crate) fn clean_title(raw: &str) -> Option<String> {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let title = raw[..end].trim().trim_end_matches('/');
    if title.is_empty() {
        None
    } else {
        Some(title.replace(' ', "_"))
    }
}

pub(crate) fn wrong_project(expected: Project, reference: &EntityReference) -> EmbedResult {
    EmbedResult::error(
        ErrorKind::MissingData,
        format!(
            "{} cannot embed a {} reference",
            expected,
            reference.project()
        ),
    )
}

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"));
static SCRIPT_OR_STYLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>").expect("static regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("static regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

const MAX_MESSAGE_CHARS: usize = 200;

/// Human-readable text of an HTML error page.
///
/// Uses the `<title>` when present, otherwise the visible text.
pub(crate) fn markup_error_text(body: &str) -> Option<String> {
    if !body.contains('<') {
        return None;
    }
    let raw = match TITLE_TAG.captures(body) {
        Some(caps) => caps[1].to_string(),
        None => {
            let without_code = SCRIPT_OR_STYLE.replace_all(body, " ");
            TAG.replace_all(&without_code, " ").into_owned()
        }
    };
    let decoded = html_escape::decode_html_entities(&raw);
    let collapsed = WHITESPACE.replace_all(decoded.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(MAX_MESSAGE_CHARS).collect())
}

/// Message carried by a JSON error body (`detail`, `title`, `error.info` or
/// a string `error`).
pub(crate) fn json_error_text(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let candidates = [
        value.pointer("/error/info"),
        value.get("detail"),
        value.get("error"),
        value.get("title"),
    ];
    let text = candidates
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);
    text
}

/// Convert a pipeline error into the fragment the host shows.
///
/// When the upstream sent an explanatory body, its message wins over the
/// generic transport message.
pub(crate) fn failure(project: Project, err: Error) -> EmbedResult {
    warn!(project = %project, error = %err, "embed degraded to error fragment");
    let explained = err
        .body()
        .and_then(|body| json_error_text(body).or_else(|| markup_error_text(body)));
    match explained {
        Some(message) => EmbedResult::error(ErrorKind::Upstream, message),
        None => EmbedResult::from(err),
    }
}
