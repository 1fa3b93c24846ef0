//! Values that flow between the host, the resolvers and the renderer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The Wikimedia projects this crate can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Project {
    Wikipedia,
    Commons,
    Wikidata,
}

impl Project {
    pub fn name(&self) -> &'static str {
        match self {
            Project::Wikipedia => "wikipedia",
            Project::Commons => "commons",
            Project::Wikidata => "wikidata",
        }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Project {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wikipedia" => Ok(Project::Wikipedia),
            "commons" | "wikimedia_commons" => Ok(Project::Commons),
            "wikidata" => Ok(Project::Wikidata),
            other => Err(format!("unknown project: {}", other)),
        }
    }
}

/// Normalized identifier of an embeddable entity, derived from a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "project", rename_all = "lowercase")]
pub enum EntityReference {
    Wikipedia { lang: String, title: String },
    Commons { file_title: String },
    Wikidata { item_id: String },
}

impl EntityReference {
    pub fn project(&self) -> Project {
        match self {
            EntityReference::Wikipedia { .. } => Project::Wikipedia,
            EntityReference::Commons { .. } => Project::Commons,
            EntityReference::Wikidata { .. } => Project::Wikidata,
        }
    }

    /// The title-like part handed to a resolver's `render`.
    pub fn title(&self) -> &str {
        match self {
            EntityReference::Wikipedia { title, .. } => title,
            EntityReference::Commons { file_title } => file_title,
            EntityReference::Wikidata { item_id } => item_id,
        }
    }
}

/// Caption alignment keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
    None,
}

impl Align {
    pub fn class(&self) -> &'static str {
        match self {
            Align::Left => "alignleft",
            Align::Center => "aligncenter",
            Align::Right => "alignright",
            Align::None => "alignnone",
        }
    }
}

impl FromStr for Align {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.strip_prefix("align").unwrap_or(&s) {
            "left" => Ok(Align::Left),
            "center" | "centre" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            "none" => Ok(Align::None),
            other => Err(format!("unknown alignment: {}", other)),
        }
    }
}

static LANGUAGE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-z]{2,}(-[a-z0-9]+)*$").expect("static regex"));

/// BCP-47-like code such as `en`, `de-ch` or `zh-min-nan`.
///
/// The Wikipedia language becomes part of the request host, so nothing else
/// is accepted.
pub fn is_language_code(code: &str) -> bool {
    LANGUAGE_CODE.is_match(code)
}

/// Optional display parameters supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderAttributes {
    pub width: Option<u32>,
    pub align: Option<Align>,
    pub lang: Option<String>,
}

impl RenderAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width).filter(|w| *w > 0);
        self
    }

    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set the language; values that are not language codes are ignored.
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        if is_language_code(&lang) {
            self.lang = Some(lang);
        }
        self
    }

    /// Build from the host's string attribute bag.
    ///
    /// Unknown keys, non-positive widths, unknown alignments and malformed
    /// language codes are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut attrs = Self::default();
        for (key, value) in pairs {
            match key.trim().to_ascii_lowercase().as_str() {
                "width" => {
                    attrs.width = value
                        .trim()
                        .trim_end_matches("px")
                        .parse::<u32>()
                        .ok()
                        .filter(|w| *w > 0)
                }
                "align" => attrs.align = value.parse().ok(),
                "lang" => {
                    let lang = value.trim();
                    if is_language_code(lang) {
                        attrs.lang = Some(lang.to_string());
                    }
                }
                _ => {}
            }
        }
        attrs
    }
}

/// Classification of a failed embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Fetch,
    Upstream,
    MissingData,
}

/// Outcome of an embed: markup, or a reason it could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedResult {
    Html(String),
    Error { kind: ErrorKind, message: String },
}

impl EmbedResult {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        EmbedResult::Error {
            kind,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EmbedResult::Error { .. })
    }

    /// Markup to put in the page; errors become an inline paragraph.
    pub fn to_html(&self) -> String {
        match self {
            EmbedResult::Html(html) => html.clone(),
            EmbedResult::Error { message, .. } => crate::render::error_paragraph(message),
        }
    }
}

impl From<crate::Error> for EmbedResult {
    fn from(err: crate::Error) -> Self {
        EmbedResult::error(err.kind(), err.user_message())
    }
}

/// Body of the lookup-by-title endpoint used by the block editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupResponse {
    Found { embed_html: String },
    Failed { error: String },
}

impl From<EmbedResult> for LookupResponse {
    fn from(result: EmbedResult) -> Self {
        match result {
            EmbedResult::Html(embed_html) => LookupResponse::Found { embed_html },
            EmbedResult::Error { message, .. } => LookupResponse::Failed { error: message },
        }
    }
}
