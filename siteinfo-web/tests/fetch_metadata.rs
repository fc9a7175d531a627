mod common;

use siteinfo_common::FetchConfig;
use siteinfo_web::{MetadataExtractor, PageLoader, SiteInfo};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTICLE: &str = include_str!("fixtures/article.html");

async fn serve(route: &str, status: u16, body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(status)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(&server)
        .await;
    server
}

fn loader() -> PageLoader {
    PageLoader::new(&FetchConfig::default()).expect("loader builds")
}

#[tokio::test]
async fn extracts_every_field_from_a_served_page() {
    common::init_test_tracing();
    let server = serve("/post", 200, ARTICLE).await;
    let url = format!("{}/post", server.uri());

    let page = MetadataExtractor::fetch(&loader(), &url).await;
    let info = page.summary().expect("page URL is valid");

    assert_eq!(
        info,
        SiteInfo {
            url: url.clone(),
            title: "Shipping a Link Unfurler".into(),
            description: "Notes on building link previews.".into(),
            keywords: "html, metadata, previews".into(),
            icon: format!("{}/static/favicon.ico", server.uri()),
            image: format!("{}/static/touch-120.png", server.uri()),
        }
    );
}

#[tokio::test]
async fn server_error_degrades_to_empty_fields() {
    common::init_test_tracing();
    let server = serve("/broken", 500, ARTICLE).await;

    let page = MetadataExtractor::fetch(&loader(), &format!("{}/broken", server.uri())).await;

    assert_eq!(page.title(), "");
    assert_eq!(page.description(), "");
    assert_eq!(page.keywords(), "");
    assert_eq!(page.icon().unwrap(), "");
    assert_eq!(page.image().unwrap(), "");
}

#[tokio::test]
async fn unreachable_host_degrades_to_empty_fields() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    let url = format!("{}/gone", server.uri());
    drop(server);

    let page = MetadataExtractor::fetch(&loader(), &url).await;

    let info = page.summary().unwrap();
    assert_eq!(info.title, "");
    assert_eq!(info.image, "");
}

#[tokio::test]
async fn relative_links_resolve_against_the_requested_url() {
    common::init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/short"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("Location", format!("{}/long", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/long"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<title>Landed</title><link rel="icon" href="favicon.png">"#,
        ))
        .mount(&server)
        .await;

    let requested = format!("{}/short", server.uri());
    let page = MetadataExtractor::fetch(&loader(), &requested).await;

    assert_eq!(page.url(), requested);
    assert_eq!(page.title(), "Landed");
    assert_eq!(page.icon().unwrap(), format!("{}/favicon.png", server.uri()));
}

#[tokio::test]
async fn summary_serializes_for_api_callers() {
    common::init_test_tracing();
    let server = serve("/", 200, "<title>Home</title>").await;

    let page = MetadataExtractor::fetch(&loader(), &format!("{}/", server.uri())).await;
    let json = serde_json::to_value(page.summary().unwrap()).unwrap();

    assert_eq!(json["title"], "Home");
    assert_eq!(json["icon"], "");
}
