//! Runtime configuration.
//!
//! Defaults reproduce the public Wikimedia endpoints; every value can be
//! overridden from the environment, a YAML document, or the builder.

use crate::{Error, ErrorContext, Result};
use serde::Deserialize;
use url::form_urlencoded;
use std::env;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
pub const DEFAULT_COMMONS_WIDTH: u32 = 300;

/// Upstream URL templates.
///
/// Placeholders: `{lang}` and `{title}` (Wikipedia), `{title}` (Commons
/// file info), `{ids}` (Commons entities), `{image}` and `{width}`
/// (commonsapi tool), `{id}` (Wikidata).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub wikipedia_summary: String,
    pub commons_file_info: String,
    pub commons_entities: String,
    pub commons_tool: String,
    pub wikidata_entity: String,
    pub wikidata_page: String,
    pub wikidata_icon: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            wikipedia_summary: "https://{lang}.wikipedia.org/api/rest_v1/page/summary/{title}"
                .into(),
            commons_file_info: "https://commons.wikimedia.org/w/api.php?action=query&format=json&prop=info&inprop=url&titles={title}".into(),
            commons_entities:
                "https://commons.wikimedia.org/w/api.php?action=wbgetentities&format=json&ids={ids}"
                    .into(),
            commons_tool: "https://tools.wmflabs.org/magnus-toolserver/commonsapi.php?image={image}&thumbwidth={width}".into(),
            wikidata_entity: "https://www.wikidata.org/wiki/Special:EntityData/{id}.json".into(),
            wikidata_page: "https://www.wikidata.org/wiki/{id}".into(),
            wikidata_icon:
                "https://upload.wikimedia.org/wikipedia/commons/thumb/f/ff/Wikidata-logo.svg/20px-Wikidata-logo.svg.png"
                    .into(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at `base` (mock servers, mirrors).
    ///
    /// Wikipedia keeps its language as the first path segment.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            wikipedia_summary: format!("{base}/{{lang}}/api/rest_v1/page/summary/{{title}}"),
            commons_file_info: format!(
                "{base}/commons/w/api.php?action=query&format=json&prop=info&inprop=url&titles={{title}}"
            ),
            commons_entities: format!(
                "{base}/commons/w/api.php?action=wbgetentities&format=json&ids={{ids}}"
            ),
            commons_tool: format!(
                "{base}/magnus-toolserver/commonsapi.php?image={{image}}&thumbwidth={{width}}"
            ),
            wikidata_entity: format!("{base}/wikidata/wiki/Special:EntityData/{{id}}.json"),
            wikidata_page: format!("{base}/wikidata/wiki/{{id}}"),
            wikidata_icon: format!("{base}/static/wikidata.png"),
        }
    }

    fn templates(&self) -> [(&'static str, &str); 7] {
        [
            ("endpoints.wikipedia_summary", &self.wikipedia_summary),
            ("endpoints.commons_file_info", &self.commons_file_info),
            ("endpoints.commons_entities", &self.commons_entities),
            ("endpoints.commons_tool", &self.commons_tool),
            ("endpoints.wikidata_entity", &self.wikidata_entity),
            ("endpoints.wikidata_page", &self.wikidata_page),
            ("endpoints.wikidata_icon", &self.wikidata_icon),
        ]
    }
}

/// Fill `{name}` placeholders in an endpoint template.
///
/// Values are percent-encoded so a title can neither end a query parameter
/// (`&`, `#`, `+`) nor add path segments (`/`, `?`). `:` stays literal for
/// namespaced titles such as `File:…`; `_` is never encoded.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| {
            acc.replace(&format!("{{{}}}", name), &encode_value(value))
        })
}

fn encode_value(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace("%3A", ":")
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbedConfig {
    pub cache_ttl_secs: u64,
    /// Debug mode: cache reads are bypassed, writes still happen.
    pub debug: bool,
    /// Preferred language for labels and captions (BCP-47-like, e.g. "de-CH").
    pub host_language: String,
    pub default_commons_width: u32,
    pub http_timeout_secs: u64,
    pub user_agent: String,
    pub proxy_url: Option<String>,
    pub max_cache_entries: usize,
    pub endpoints: Endpoints,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            debug: false,
            host_language: "en".into(),
            default_commons_width: DEFAULT_COMMONS_WIDTH,
            http_timeout_secs: 30,
            user_agent: format!("embed-wikimedia/{}", env!("CARGO_PKG_VERSION")),
            proxy_url: None,
            max_cache_entries: 1024,
            endpoints: Endpoints::default(),
        }
    }
}

impl EmbedConfig {
    pub fn builder() -> EmbedConfigBuilder {
        EmbedConfigBuilder::new()
    }

    /// Defaults overlaid with `EMBED_WIKIMEDIA_*` environment variables.
    ///
    /// Unparsable numeric values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = env::var("EMBED_WIKIMEDIA_DEBUG") {
            config.debug = matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        if let Ok(lang) = env::var("EMBED_WIKIMEDIA_LANG") {
            if !lang.trim().is_empty() {
                config.host_language = lang.trim().to_string();
            }
        }
        if let Some(ttl) = env_parse::<u64>("EMBED_WIKIMEDIA_CACHE_TTL_SECS") {
            config.cache_ttl_secs = ttl;
        }
        if let Some(secs) = env_parse::<u64>("EMBED_WIKIMEDIA_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = secs;
        }
        if let Some(width) = env_parse::<u32>("EMBED_WIKIMEDIA_COMMONS_WIDTH") {
            config.default_commons_width = width;
        }
        if let Ok(proxy) = env::var("EMBED_WIKIMEDIA_PROXY_URL") {
            config.proxy_url = Some(proxy);
        }
        if let Ok(agent) = env::var("EMBED_WIKIMEDIA_USER_AGENT") {
            config.user_agent = agent;
        }
        config
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            Error::configuration_with_context(
                e.to_string(),
                ErrorContext::new().with_source("yaml"),
            )
        })
    }

    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration_with_context(
                e.to_string(),
                ErrorContext::new().with_details(path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_ttl_secs == 0 {
            return Err(Error::configuration_with_context(
                "cache TTL must be positive",
                ErrorContext::new().with_field_path("cache_ttl_secs"),
            ));
        }
        if self.default_commons_width == 0 {
            return Err(Error::configuration_with_context(
                "default Commons width must be positive",
                ErrorContext::new().with_field_path("default_commons_width"),
            ));
        }
        if self.max_cache_entries == 0 {
            return Err(Error::configuration_with_context(
                "cache capacity must be positive",
                ErrorContext::new().with_field_path("max_cache_entries"),
            ));
        }
        let sample = [
            ("lang", "en"),
            ("title", "Example"),
            ("ids", "M1"),
            ("image", "Example.jpg"),
            ("width", "300"),
            ("id", "Q1"),
        ];
        for (field, template) in self.endpoints.templates() {
            let filled = fill(template, &sample);
            url::Url::parse(&filled).map_err(|e| {
                Error::configuration_with_context(
                    format!("endpoint is not an absolute URL: {}", e),
                    ErrorContext::new()
                        .with_field_path(field)
                        .with_details(template.to_string()),
                )
            })?;
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse::<T>().ok())
}

#[derive(Debug, Clone, Default)]
pub struct EmbedConfigBuilder {
    config: EmbedConfig,
}

impl EmbedConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: EmbedConfig) -> Self {
        Self { config }
    }

    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.cache_ttl_secs = secs;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    pub fn host_language(mut self, lang: impl Into<String>) -> Self {
        self.config.host_language = lang.into();
        self
    }

    pub fn default_commons_width(mut self, width: u32) -> Self {
        self.config.default_commons_width = width;
        self
    }

    pub fn http_timeout_secs(mut self, secs: u64) -> Self {
        self.config.http_timeout_secs = secs;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn proxy_url(mut self, url: impl Into<String>) -> Self {
        self.config.proxy_url = Some(url.into());
        self
    }

    pub fn max_cache_entries(mut self, entries: usize) -> Self {
        self.config.max_cache_entries = entries;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.config.endpoints = endpoints;
        self
    }

    pub fn build(self) -> Result<EmbedConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
