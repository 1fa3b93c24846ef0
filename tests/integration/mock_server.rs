//! Mock HTTP server setup for integration tests

use embed_wikimedia::{EmbedConfig, Embedder, Endpoints};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::path::Path;

/// Read a file from `tests/fixtures`.
pub fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

/// Test fixture that owns a mock server standing in for every upstream
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Configuration with every endpoint pointed at the mock server
    pub fn config(&self) -> EmbedConfig {
        EmbedConfig::builder()
            .endpoints(Endpoints::with_base(&self.base_url))
            .http_timeout_secs(5)
            .build()
            .expect("valid test config")
    }

    pub fn embedder(&self) -> Embedder {
        self.embedder_with(self.config())
    }

    pub fn embedder_with(&self, config: EmbedConfig) -> Embedder {
        Embedder::builder()
            .config(config)
            .build()
            .expect("failed to build embedder")
    }

    /// Mock a GET on an exact path (no query string)
    pub async fn mock_json(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock a GET on the Commons action API for one `action`
    pub async fn mock_commons_api(&mut self, action: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", Matcher::Regex(r"^/commons/w/api\.php".to_string()))
            .match_query(Matcher::UrlEncoded("action".into(), action.into()))
            .with_status(status)
            .with_header("content-type", "application/json; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock the commonsapi tool for one image and thumbnail width
    pub async fn mock_commons_tool(&mut self, image: &str, width: u32, body: &str) -> Mock {
        self.server
            .mock(
                "GET",
                Matcher::Regex(r"^/magnus-toolserver/commonsapi\.php".to_string()),
            )
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("image".into(), image.into()),
                Matcher::UrlEncoded("thumbwidth".into(), width.to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/xml; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }

    /// Mock an HTML error page
    pub async fn mock_html(&mut self, path: &str, status: usize, body: &str) -> Mock {
        self.server
            .mock("GET", path)
            .with_status(status)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await
    }
}
