//! Entry point for hosts: wires configuration, transport, cache and
//! resolvers together.

use std::sync::Arc;

use crate::cache::{CacheBackend, CacheConfig, CacheManager, CacheStats, MemoryCache};
use crate::config::EmbedConfig;
use crate::fetch::FetchCache;
use crate::registry::ProjectRegistry;
use crate::transport::{HttpTransport, Transport};
use crate::types::{
    EmbedResult, EntityReference, ErrorKind, LookupResponse, Project, RenderAttributes,
};
use crate::Result;

pub struct Embedder {
    config: Arc<EmbedConfig>,
    fetch: Arc<FetchCache>,
    registry: ProjectRegistry,
}

impl Embedder {
    pub fn builder() -> EmbedderBuilder {
        EmbedderBuilder::new()
    }

    /// Embedder with configuration from the environment and an in-memory cache.
    pub fn from_env() -> Result<Self> {
        EmbedderBuilder::new().config(EmbedConfig::from_env()).build()
    }

    pub fn config(&self) -> &EmbedConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    /// Project and reference for `url`, or `None` if it is not embeddable.
    pub fn match_url(&self, url: &str) -> Option<EntityReference> {
        self.registry.match_url(url).map(|(_, reference)| reference)
    }

    /// Embed `url`, or `None` when no project recognizes it.
    pub async fn embed_url(&self, url: &str, attrs: &RenderAttributes) -> Option<EmbedResult> {
        self.registry.embed_url(url, attrs).await
    }

    pub async fn embed(&self, reference: &EntityReference, attrs: &RenderAttributes) -> EmbedResult {
        match self.registry.get(reference.project()) {
            Some(resolver) => resolver.embed(reference, attrs).await,
            None => not_registered(reference.project()),
        }
    }

    pub async fn render(&self, project: Project, title: &str, attrs: &RenderAttributes) -> EmbedResult {
        self.registry
            .render(project, title, attrs)
            .await
            .unwrap_or_else(|| not_registered(project))
    }

    /// Lookup-by-title as served to the block editor.
    ///
    /// `project` is a name such as `"commons"`; unknown names are reported in
    /// the response body.
    pub async fn lookup(&self, project: &str, title: &str, attrs: &RenderAttributes) -> LookupResponse {
        match project.parse::<Project>() {
            Ok(project) => self.render(project, title, attrs).await.into(),
            Err(message) => LookupResponse::Failed { error: message },
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.fetch.cache_stats()
    }
}

fn not_registered(project: Project) -> EmbedResult {
    EmbedResult::error(
        ErrorKind::MissingData,
        format!("No resolver registered for {}", project),
    )
}

#[derive(Default)]
pub struct EmbedderBuilder {
    config: Option<EmbedConfig>,
    backend: Option<Arc<dyn CacheBackend>>,
    transport: Option<Arc<dyn Transport>>,
}

impl EmbedderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: EmbedConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use the host's key/value store instead of the in-memory default.
    pub fn cache_backend(mut self, backend: Arc<dyn CacheBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<Embedder> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };
        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(MemoryCache::new(config.max_cache_entries)));
        let cache = CacheManager::new(CacheConfig::from(&config), backend);
        let fetch = Arc::new(FetchCache::new(transport, cache));

        let config = Arc::new(config);
        let registry = ProjectRegistry::with_defaults(fetch.clone(), config.clone());
        Ok(Embedder {
            config,
            fetch,
            registry,
        })
    }
}
