//! Dispatch table from URL patterns to resolvers.
//!
//! Resolvers are tried in registration order and the first match wins. A URL
//! nobody matches is not embeddable; the host leaves it alone.

use std::sync::Arc;

use crate::config::EmbedConfig;
use crate::fetch::FetchCache;
use crate::projects::{Commons, ProjectResolver, Wikidata, Wikipedia};
use crate::types::{EmbedResult, EntityReference, Project, RenderAttributes};

/// Ordered `(pattern, resolver)` list; no dynamic lookup by name.
pub struct ProjectRegistry {
    resolvers: Vec<Arc<dyn ProjectResolver>>,
}

impl ProjectRegistry {
    /// Create an empty registry with no resolvers.
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Wikipedia, Commons and Wikidata, in that order, sharing one fetch cache.
    pub fn with_defaults(fetch: Arc<FetchCache>, config: Arc<EmbedConfig>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Wikipedia::new(fetch.clone(), config.clone())));
        registry.register(Arc::new(Commons::new(fetch.clone(), config.clone())));
        registry.register(Arc::new(Wikidata::new(fetch, config)));
        registry
    }

    /// Append a resolver; it is tried after all earlier ones.
    pub fn register(&mut self, resolver: Arc<dyn ProjectResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Registered projects in dispatch order.
    pub fn projects(&self) -> Vec<Project> {
        self.resolvers.iter().map(|r| r.project()).collect()
    }

    /// Resolver registered for `project`, if any.
    pub fn get(&self, project: Project) -> Option<&dyn ProjectResolver> {
        self.resolvers
            .iter()
            .find(|r| r.project() == project)
            .map(|r| r.as_ref())
    }

    /// First resolver whose pattern accepts `url`, with the reference it built.
    pub fn match_url(&self, url: &str) -> Option<(&dyn ProjectResolver, EntityReference)> {
        self.resolvers
            .iter()
            .find_map(|r| r.match_url(url).map(|reference| (r.as_ref(), reference)))
    }

    /// Embed `url`, or `None` when it is not an embeddable Wikimedia link.
    pub async fn embed_url(&self, url: &str, attrs: &RenderAttributes) -> Option<EmbedResult> {
        let (resolver, reference) = self.match_url(url)?;
        Some(resolver.embed(&reference, attrs).await)
    }

    /// Render by title on a named project.
    pub async fn render(
        &self,
        project: Project,
        title: &str,
        attrs: &RenderAttributes,
    ) -> Option<EmbedResult> {
        let resolver = self.get(project)?;
        Some(resolver.render(title, attrs).await)
    }
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}
