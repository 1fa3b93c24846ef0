//! Commons files: file info, commonsapi tool and structured caption

use super::mock_server::{fixture, MockServerFixture};
use embed_wikimedia::{Align, EmbedResult, ErrorKind, Project, RenderAttributes};
use mockito::Matcher;

const FILE_URL: &str = "https://commons.wikimedia.org/wiki/File:Felis_catus.jpg";
const THUMB_URL: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/a/a1/Felis_catus.jpg/300px-Felis_catus.jpg";

#[tokio::test]
async fn test_embed_with_structured_caption() {
    let mut server = MockServerFixture::new().await;
    let info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let tool = server
        .mock_commons_tool("Felis_catus.jpg", 300, &fixture("commons_tool.xml"))
        .await;
    let entities = server
        .mock_commons_api("wbgetentities", 200, &fixture("commons_entities.json"))
        .await;
    let embedder = server.embedder();

    let result = embedder
        .embed_url(FILE_URL, &RenderAttributes::default())
        .await
        .expect("commons URL should match");

    info.assert_async().await;
    tool.assert_async().await;
    entities.assert_async().await;
    assert_eq!(
        result.to_html(),
        format!(
            concat!(
                r#"<figure style="width: 300px" class="wp-caption aligncenter">"#,
                r#"<a href="{file}"><img src="{thumb}" alt="Felis_catus.jpg" /></a>"#,
                r#"<figcaption class="wp-caption-text">Tabby cat resting in the sun &mdash; "#,
                r#"<a href="{file}">Felis catus.jpg</a> (2008-05-12) by Jo Smith, CC-BY-SA-3.0.</figcaption>"#,
                r#"</figure>"#
            ),
            file = FILE_URL,
            thumb = THUMB_URL
        )
    );
}

#[tokio::test]
async fn test_caption_language_follows_attribute() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let _tool = server
        .mock_commons_tool("Felis_catus.jpg", 500, &fixture("commons_tool.xml"))
        .await;
    let _entities = server
        .mock_commons_api("wbgetentities", 200, &fixture("commons_entities.json"))
        .await;
    let embedder = server.embedder();

    let attrs = RenderAttributes::new()
        .with_width(500)
        .with_align(Align::Right)
        .with_lang("de-AT");
    let html = embedder
        .render(Project::Commons, "File:Felis_catus.jpg", &attrs)
        .await
        .to_html();

    assert!(html.starts_with(r#"<figure style="width: 500px" class="wp-caption alignright">"#));
    assert!(html.contains("Getigerte Katze in der Sonne &mdash; "));
}

#[tokio::test]
async fn test_caption_failure_falls_back_to_tool_description() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let _tool = server
        .mock_commons_tool("Felis_catus.jpg", 300, &fixture("commons_tool.xml"))
        .await;
    let _entities = server
        .mock_commons_api(
            "wbgetentities",
            500,
            r#"{"error":{"code":"no-such-entity","info":"Could not find an entity with the ID \"M5234161\"."}}"#,
        )
        .await;
    let embedder = server.embedder();

    let html = embedder
        .render(Project::Commons, "File:Felis_catus.jpg", &RenderAttributes::default())
        .await
        .to_html();

    assert!(html.contains(
        r#"<figcaption class="wp-caption-text">A domestic cat on a fence &mdash; "#
    ));
}

#[tokio::test]
async fn test_tool_error_is_shown_verbatim() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let _tool = server
        .mock_commons_tool(
            "Felis_catus.jpg",
            300,
            "<?xml version=\"1.0\"?><response><error>File not found</error></response>",
        )
        .await;
    let entities = server
        .mock_commons_api("wbgetentities", 200, &fixture("commons_entities.json"))
        .await;
    let embedder = server.embedder();

    let result = embedder
        .render(Project::Commons, "File:Felis_catus.jpg", &RenderAttributes::default())
        .await;

    assert!(!entities.matched_async().await);
    assert_eq!(result, EmbedResult::error(ErrorKind::Upstream, "File not found"));
    assert_eq!(result.to_html(), r#"<p class="error">File not found</p>"#);
}

#[tokio::test]
async fn test_missing_file_stops_after_first_call() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_missing.json"))
        .await;
    let embedder = server.embedder();

    let result = embedder
        .render(
            Project::Commons,
            "File:Does not exist.jpg",
            &RenderAttributes::default(),
        )
        .await;

    assert_eq!(
        result,
        EmbedResult::error(
            ErrorKind::MissingData,
            "Unable to fetch file information for: File:Does_not_exist.jpg"
        )
    );
}

#[tokio::test]
async fn test_structured_caption_is_escaped() {
    let mut server = MockServerFixture::new().await;
    let _info = server
        .mock_commons_api("query", 200, &fixture("commons_file_info.json"))
        .await;
    let _tool = server
        .mock_commons_tool("Felis_catus.jpg", 300, &fixture("commons_tool.xml"))
        .await;
    let _entities = server
        .mock_commons_api(
            "wbgetentities",
            200,
            r#"{"entities":{"M5234161":{"labels":{"en":{"language":"en","value":"<script>alert(1)</script>"}}}}}"#,
        )
        .await;
    let embedder = server.embedder();

    let html = embedder
        .render(Project::Commons, "File:Felis_catus.jpg", &RenderAttributes::default())
        .await
        .to_html();

    assert!(!html.contains("<script>"));
    assert!(html.contains(
        r#"<figcaption class="wp-caption-text">&lt;script&gt;alert(1)&lt;/script&gt; &mdash; "#
    ));
}

#[tokio::test]
async fn test_reserved_characters_in_file_name_are_encoded() {
    let mut server = MockServerFixture::new().await;
    let info = server
        .server
        .mock("GET", Matcher::Regex(r"^/commons/w/api\.php".to_string()))
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "query".into()),
            Matcher::UrlEncoded("titles".into(), "File:Tom_&_Jerry.jpg".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"query":{"pages":{"77":{"pageid":77,"ns":6,"title":"File:Tom & Jerry.jpg","canonicalurl":"https://commons.wikimedia.org/wiki/File:Tom_%26_Jerry.jpg"}}}}"#,
        )
        .create_async()
        .await;
    let tool = server
        .mock_commons_tool(
            "Tom_&_Jerry.jpg",
            300,
            "<response><file><urls><thumbnail>https://upload.wikimedia.org/tj.jpg</thumbnail></urls></file></response>",
        )
        .await;
    let _entities = server
        .mock_commons_api("wbgetentities", 200, r#"{"entities":{}}"#)
        .await;
    let embedder = server.embedder();

    let result = embedder
        .render(Project::Commons, "File:Tom & Jerry.jpg", &RenderAttributes::default())
        .await;

    info.assert_async().await;
    tool.assert_async().await;
    assert!(!result.is_error(), "{:?}", result);
    assert!(result
        .to_html()
        .contains(r#"<img src="https://upload.wikimedia.org/tj.jpg" alt="Tom_&amp;_Jerry.jpg" />"#));
}
