//! # embed-wikimedia
//!
//! 根据公开 URL 或标题，为 Wikipedia 条目、Wikimedia Commons 文件和 Wikidata 条目生成嵌入预览。
//!
//! Rich previews (image, summary, caption) of Wikimedia content for host
//! documents, given only a public URL or a title.
//!
//! ## Overview
//!
//! A URL is matched against each project's pattern in a fixed order. The
//! matching resolver calls one or more upstream APIs through a shared
//! fetch cache and renders the result into an HTML fragment. Upstream
//! failures never escape: they render as a short `<p class="error">`
//! paragraph in place of the preview.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use embed_wikimedia::{Embedder, RenderAttributes};
//!
//! #[tokio::main]
//! async fn main() -> embed_wikimedia::Result<()> {
//!     let embedder = Embedder::from_env()?;
//!     let attrs = RenderAttributes::new().with_width(400);
//!
//!     if let Some(result) = embedder
//!         .embed_url("https://en.wikipedia.org/wiki/Albert_Einstein", &attrs)
//!         .await
//!     {
//!         println!("{}", result.to_html());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Configuration, endpoint templates, environment/YAML loading |
//! | [`transport`] | HTTP transport and XML conversion |
//! | [`cache`] | Host-provided key/value store, keys, TTL management |
//! | [`fetch`] | Fetch+Cache service shared by all resolvers |
//! | [`projects`] | Wikipedia, Commons and Wikidata resolvers |
//! | [`render`] | Pure HTML rendering |
//! | [`registry`] | URL dispatch table |
//! | [`lang`] | Language fallback for labels |

pub mod cache;
pub mod config;
pub mod embedder;
pub mod fetch;
pub mod lang;
pub mod projects;
pub mod registry;
pub mod render;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use config::{EmbedConfig, Endpoints};
pub use embedder::{Embedder, EmbedderBuilder};
pub use fetch::{FetchCache, ResponseFormat};
pub use projects::ProjectResolver;
pub use registry::ProjectRegistry;
pub use types::{
    Align, EmbedResult, EntityReference, ErrorKind, LookupResponse, Project, RenderAttributes,
};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
