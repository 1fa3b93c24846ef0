//! Wikidata items against the mock server

use super::mock_server::{fixture, MockServerFixture};
use embed_wikimedia::{EmbedResult, ErrorKind, Project, RenderAttributes};

const Q42_PATH: &str = "/wikidata/wiki/Special:EntityData/Q42.json";

#[tokio::test]
async fn test_bare_number_is_normalized() {
    let mut server = MockServerFixture::new().await;
    let mock = server
        .mock_json(Q42_PATH, 200, &fixture("wikidata_q42.json"))
        .await;
    let embedder = server.embedder();

    let html = embedder
        .render(Project::Wikidata, "42", &RenderAttributes::default())
        .await
        .to_html();

    mock.assert_async().await;
    assert_eq!(
        html,
        format!(
            concat!(
                r#"<blockquote class="embed-wikimedia wikidata"><strong>"#,
                r#"<a href="{base}/wikidata/wiki/Q42"><img src="{base}/static/wikidata.png" alt="Wikidata logo" /> Douglas Adams</a>:"#,
                r#"</strong> English writer and humorist (1952–2001)</blockquote>"#
            ),
            base = server.base_url
        )
    );
}

#[tokio::test]
async fn test_url_with_lowercase_id_and_label_language() {
    let mut server = MockServerFixture::new().await;
    let mock = server
        .mock_json(Q42_PATH, 200, &fixture("wikidata_q42.json"))
        .await;
    let embedder = server.embedder();

    let result = embedder
        .embed_url(
            "https://www.wikidata.org/wiki/q42",
            &RenderAttributes::new().with_lang("fr"),
        )
        .await
        .expect("wikidata URL should match");

    mock.assert_async().await;
    assert!(result
        .to_html()
        .ends_with("Douglas Adams</a>:</strong> écrivain et humoriste anglais</blockquote>"));
}

#[tokio::test]
async fn test_redirected_item_uses_target_entity() {
    let mut server = MockServerFixture::new().await;
    let _mock = server
        .mock_json(
            "/wikidata/wiki/Special:EntityData/Q100.json",
            200,
            r#"{"entities":{"Q200":{"id":"Q200","labels":{"en":{"language":"en","value":"Merged item"}},"descriptions":{}}}}"#,
        )
        .await;
    let embedder = server.embedder();

    let html = embedder
        .render(Project::Wikidata, "Q100", &RenderAttributes::default())
        .await
        .to_html();

    assert!(html.contains("Merged item</a>:</strong> </blockquote>"));
}

#[tokio::test]
async fn test_invalid_id_shows_html_error_title() {
    let mut server = MockServerFixture::new().await;
    let _mock = server
        .mock_html(
            "/wikidata/wiki/Special:EntityData/Qfoo.json",
            400,
            &fixture("wikidata_invalid_id.html"),
        )
        .await;
    let embedder = server.embedder();

    let result = embedder
        .render(Project::Wikidata, "Qfoo", &RenderAttributes::default())
        .await;

    assert_eq!(result, EmbedResult::error(ErrorKind::Upstream, "Invalid ID"));
    assert_eq!(result.to_html(), r#"<p class="error">Invalid ID</p>"#);
}

#[tokio::test]
async fn test_empty_entities_is_missing_data() {
    let mut server = MockServerFixture::new().await;
    let _mock = server
        .mock_json(
            "/wikidata/wiki/Special:EntityData/Q7.json",
            200,
            r#"{"entities":{}}"#,
        )
        .await;
    let embedder = server.embedder();

    let result = embedder
        .render(Project::Wikidata, "7", &RenderAttributes::default())
        .await;

    assert_eq!(
        result,
        EmbedResult::error(ErrorKind::MissingData, "No Wikidata item found for: Q7")
    );
}
