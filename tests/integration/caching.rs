//! Upstream responses are fetched once per URL while the entry is live

use super::mock_server::{fixture, MockServerFixture};
use embed_wikimedia::{EmbedConfig, Project, RenderAttributes};

const URL: &str = "https://en.wikipedia.org/wiki/Albert_Einstein";
const PATH: &str = "/en/api/rest_v1/page/summary/Albert_Einstein";

#[tokio::test]
async fn test_second_embed_is_served_from_cache() {
    let mut server = MockServerFixture::new().await;
    let mock = server
        .server
        .mock("GET", PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(fixture("wikipedia_einstein.json"))
        .expect(1)
        .create_async()
        .await;
    let embedder = server.embedder();
    let attrs = RenderAttributes::default();

    let first = embedder.embed_url(URL, &attrs).await.unwrap();
    let second = embedder.embed_url(URL, &attrs).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert!(!first.is_error());
    let stats = embedder.cache_stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.sets, 1);
}

#[tokio::test]
async fn test_commons_calls_share_the_cache() {
    let mut server = MockServerFixture::new().await;
    let info = server
        .server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/commons/w/api\.php".to_string()),
        )
        .match_query(mockito::Matcher::UrlEncoded(
            "action".into(),
            "query".into(),
        ))
        .with_status(200)
        .with_body(fixture("commons_file_info.json"))
        .expect(1)
        .create_async()
        .await;
    let _tool = server
        .mock_commons_tool("Felis_catus.jpg", 300, &fixture("commons_tool.xml"))
        .await;
    let _entities = server
        .mock_commons_api("wbgetentities", 200, &fixture("commons_entities.json"))
        .await;
    let embedder = server.embedder();
    let attrs = RenderAttributes::default();

    for _ in 0..3 {
        let result = embedder
            .render(Project::Commons, "File:Felis_catus.jpg", &attrs)
            .await;
        assert!(!result.is_error(), "{:?}", result);
    }

    info.assert_async().await;
}

#[tokio::test]
async fn test_debug_mode_always_refetches() {
    let mut server = MockServerFixture::new().await;
    let mock = server
        .server
        .mock("GET", PATH)
        .with_status(200)
        .with_body(fixture("wikipedia_einstein.json"))
        .expect(2)
        .create_async()
        .await;
    let config = EmbedConfig::builder()
        .endpoints(embed_wikimedia::Endpoints::with_base(&server.base_url))
        .debug(true)
        .build()
        .unwrap();
    let embedder = server.embedder_with(config);
    let attrs = RenderAttributes::default();

    embedder.embed_url(URL, &attrs).await.unwrap();
    embedder.embed_url(URL, &attrs).await.unwrap();

    mock.assert_async().await;
    assert_eq!(embedder.cache_stats().hits, 0);
}
