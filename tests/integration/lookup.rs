//! Lookup-by-title responses as returned to the block editor

use super::mock_server::{fixture, MockServerFixture};
use embed_wikimedia::{LookupResponse, RenderAttributes};
use serde_json::json;

#[tokio::test]
async fn test_lookup_success_body() {
    let mut server = MockServerFixture::new().await;
    let _mock = server
        .mock_json(
            "/wikidata/wiki/Special:EntityData/Q42.json",
            200,
            &fixture("wikidata_q42.json"),
        )
        .await;
    let embedder = server.embedder();

    let response = embedder
        .lookup("wikidata", "Q42", &RenderAttributes::default())
        .await;

    let body = serde_json::to_value(&response).unwrap();
    let html = body["embed_html"].as_str().expect("embed_html present");
    assert!(html.starts_with(r#"<blockquote class="embed-wikimedia wikidata">"#));
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_lookup_failure_body() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let _tool = server
        .mock_commons_tool(
            "Felis_catus.jpg",
            300,
            "<response><error>File not found</error></response>",
        )
        .await;
    let embedder = server.embedder();

    let response = embedder
        .lookup(
            "wikimedia_commons",
            "File:Felis_catus.jpg",
            &RenderAttributes::default(),
        )
        .await;

    assert_eq!(
        response,
        LookupResponse::Failed {
            error: "File not found".into()
        }
    );
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"error": "File not found"})
    );
}

#[tokio::test]
async fn test_malformed_lang_attribute_keeps_default_wiki() {
    let mut server = MockServerFixture::new().await;
    let mock = server
        .mock_json(
            "/en/api/rest_v1/page/summary/Cat",
            200,
            r#"{"displaytitle":"Cat","extract_html":"<p>Cat.</p>","content_urls":{"desktop":{"page":"https://en.wikipedia.org/wiki/Cat"}}}"#,
        )
        .await;
    let embedder = server.embedder();

    let attrs = RenderAttributes::from_pairs([("lang", "attacker.example/x?")]);
    let response = embedder.lookup("wikipedia", "Cat", &attrs).await;

    mock.assert_async().await;
    assert!(matches!(response, LookupResponse::Found { .. }));
}
