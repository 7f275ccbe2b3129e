//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to serve a small catalog and run the whole
//! pipeline end-to-end against it.

use catalog_harvest::config::Config;
use catalog_harvest::crawler::{harvest, merge_fragments, Harvester};
use catalog_harvest::model::ListingEntry;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing below `root`
fn create_test_config(listing_url: String, root: &Path) -> Config {
    let mut config = Config::default();
    config.source.listing_url = listing_url;
    config.crawler.workers = 4;
    config.output.markdown_dir = root.join("markdown").display().to_string();
    config.output.image_dir = root.join("images").display().to_string();
    config.output.failure_log = root.join("markdown/could-not-parse.txt").display().to_string();
    config
}

fn listing_page(items: &[(&str, &str)]) -> String {
    let items: String = items
        .iter()
        .map(|(href, label)| {
            format!(
                r#"<li class="az-listing__item"><a href="{}">{}</a></li>"#,
                href, label
            )
        })
        .collect();
    format!("<html><body><ul>{}</ul></body></html>", items)
}

fn detail_page(masthead: Option<&str>, image: Option<&str>, rows: &[(&str, &str)]) -> String {
    let masthead = masthead
        .map(|h2| {
            format!(
                r#"<div class="creditCard__desktopInfo mastheadGrid__main"><h2>{}</h2></div>"#,
                h2
            )
        })
        .unwrap_or_default();
    let image = image
        .map(|src| format!(r#"<img class="productImage" src="{}">"#, src))
        .unwrap_or_default();
    let rows: String = rows
        .iter()
        .map(|(th, td)| format!("<tr><th>{}</th><td>{}</td></tr>", th, td))
        .collect();
    format!(
        r#"<html><body>{}{}<div class="luna-tabpanel"><table>{}</table></div></body></html>"#,
        masthead, image, rows
    )
}

async fn serve_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

fn read_failure_log(root: &Path) -> String {
    std::fs::read_to_string(root.join("markdown/could-not-parse.txt")).expect("failure log exists")
}

#[tokio::test]
async fn test_full_harvest() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[
            ("/providers/amex", "American Express"),
            ("/providers/chase", "Chase"),
            ("/providers/ghost", "   "),
        ]),
    )
    .await;
    serve_html(
        &server,
        "/providers/amex",
        listing_page(&[("/cards/gold", "Gold Card"), ("/cards/legacy", "Legacy Card")]),
    )
    .await;
    serve_html(
        &server,
        "/providers/chase",
        listing_page(&[("/cards/freedom", "Freedom")]),
    )
    .await;

    serve_html(
        &server,
        "/cards/gold",
        detail_page(
            None,
            Some("/img/gold.png"),
            &[
                ("Product Name", "American Express® Gold Card"),
                ("Annual fee", "$250"),
            ],
        ),
    )
    .await;
    serve_html(
        &server,
        "/cards/legacy",
        detail_page(
            Some("Discontinued"),
            None,
            &[("Product Name", "Legacy Rewards Card")],
        ),
    )
    .await;
    // No Product Name row
    serve_html(
        &server,
        "/cards/freedom",
        detail_page(None, None, &[("Annual fee", "$0")]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/img/gold.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![7u8, 7, 7], "image/png"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.providers, 2);
    assert_eq!(summary.providers_with_products, 2);
    assert_eq!(summary.product_urls, 3);
    assert_eq!(summary.records_written, 2);
    assert_eq!(summary.images_saved, 1);
    assert_eq!(summary.images_missing, 1);
    assert_eq!(summary.failures, 1);

    let markdown = root.path().join("markdown");
    let gold = std::fs::read_to_string(markdown.join("american-express-gold-card.md"))
        .expect("gold card written");
    assert!(gold.starts_with("---\nCard-Name: \"american-express-gold-card\"\n"));
    assert!(gold.contains("Bank: \"American Express\"\n"));
    assert!(gold.contains(&format!("Url: \"{}/cards/gold\"\n", server.uri())));
    assert!(gold.contains("Discontinued: \"false\"\n"));
    assert!(gold.contains("Image: \"/img/gold.png\"\n"));
    assert!(gold.contains("Annual-fee: \"$250\"\n"));
    assert!(gold.ends_with("---\n"));

    let image = std::fs::read(root.path().join("images/american-express-gold-card.png"))
        .expect("image saved");
    assert_eq!(image, vec![7u8, 7, 7]);

    let legacy = std::fs::read_to_string(markdown.join("legacy-rewards-card.md"))
        .expect("legacy card written");
    assert!(legacy.contains("Discontinued: \"true\"\n"));
    assert!(legacy.contains("Image: \"No image found\"\n"));

    // The record without a product name produced no markdown, only a log entry
    let written: Vec<_> = std::fs::read_dir(&markdown)
        .expect("markdown dir")
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".md"))
        .collect();
    assert_eq!(written.len(), 2);

    let log = read_failure_log(root.path());
    assert_eq!(log.matches("could not parse for bank").count(), 1);
    assert!(log.contains(&format!(
        "could not parse for bank Chase, {}/cards/freedom\n",
        server.uri()
    )));
    assert!(log.contains("Discontinued: false\n"));
    assert!(log.contains("Record has no 'Product Name' field\n"));
}

#[tokio::test]
async fn test_shared_url_goes_to_last_completed_provider() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    // Both providers list the same card; Citi answers late so it finishes last
    Mock::given(method("GET"))
        .and(path("/providers/citi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(listing_page(&[("/cards/shared", "Shared Card")]), "text/html")
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    serve_html(
        &server,
        "/providers/costco",
        listing_page(&[("/cards/shared", "Shared Card")]),
    )
    .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let harvester = Harvester::new(config).expect("harvester");

    let providers = vec![
        ListingEntry {
            label: "Citi".to_string(),
            link: format!("{}/providers/citi", server.uri()),
        },
        ListingEntry {
            label: "Costco".to_string(),
            link: format!("{}/providers/costco", server.uri()),
        },
    ];
    let url_map = merge_fragments(harvester.resolve_providers(providers).await);

    assert_eq!(url_map.len(), 1);
    assert_eq!(
        url_map.get(&format!("{}/cards/shared", server.uri())),
        Some(&"Citi".to_string())
    );
}

#[tokio::test]
async fn test_failed_provider_contributes_nothing() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[("/providers/down", "Down Bank"), ("/providers/up", "Up Bank")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/providers/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    serve_html(
        &server,
        "/providers/up",
        listing_page(&[("/cards/up", "Up Card")]),
    )
    .await;
    serve_html(
        &server,
        "/cards/up",
        detail_page(None, None, &[("Product Name", "Up Card")]),
    )
    .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.providers, 2);
    assert_eq!(summary.providers_with_products, 1);
    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.failures, 0);
    assert!(root.path().join("markdown/up-card.md").is_file());
    assert_eq!(read_failure_log(root.path()), "");
}

#[tokio::test]
async fn test_unavailable_detail_page_is_logged() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[("/providers/amex", "American Express")]),
    )
    .await;
    serve_html(
        &server,
        "/providers/amex",
        listing_page(&[("/cards/missing", "Missing Card"), ("/cards/green", "Green")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cards/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    serve_html(
        &server,
        "/cards/green",
        detail_page(None, None, &[("Product Name", "Green Card")]),
    )
    .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.failures, 1);

    let log = read_failure_log(root.path());
    assert!(log.contains(&format!(
        "could not parse for bank American Express, {}/cards/missing\n",
        server.uri()
    )));
    assert!(log.contains("Discontinued: unknown\n"));
    assert!(log.contains("HTTP 404"));
}

#[tokio::test]
async fn test_failed_image_download_is_logged() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[("/providers/amex", "American Express")]),
    )
    .await;
    serve_html(
        &server,
        "/providers/amex",
        listing_page(&[("/cards/platinum", "Platinum")]),
    )
    .await;
    serve_html(
        &server,
        "/cards/platinum",
        detail_page(
            Some("The Platinum Card® (discontinued)"),
            Some("/img/platinum.png"),
            &[("Product Name", "The Platinum Card®")],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/platinum.png"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.records_written, 0);
    assert_eq!(summary.failures, 1);

    // Markdown is written before the image is fetched
    assert!(root.path().join("markdown/the-platinum-card.md").is_file());
    assert!(!root.path().join("images/the-platinum-card.png").exists());

    let log = read_failure_log(root.path());
    assert!(log.contains("Discontinued: true\n"));
    assert!(log.contains("Image download failed"));
}

#[tokio::test]
async fn test_unreachable_listing_produces_nothing() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    Mock::given(method("GET"))
        .and(path("/providers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.providers, 0);
    assert_eq!(summary.product_urls, 0);
    assert_eq!(summary.records_written, 0);
    assert_eq!(
        std::fs::read_dir(root.path().join("markdown"))
            .expect("markdown dir")
            .count(),
        1,
        "only the failure log should exist"
    );
}

#[tokio::test]
async fn test_redirected_pages_resolve_relative_links() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[("/providers/chase", "Chase")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/providers/chase"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/providers/chase/", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    serve_html(
        &server,
        "/providers/chase/",
        listing_page(&[("freedom", "Freedom")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/providers/chase/freedom"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/cards/v2/freedom", server.uri()).as_str()),
        )
        .mount(&server)
        .await;
    serve_html(
        &server,
        "/cards/v2/freedom",
        detail_page(
            None,
            Some("img/freedom.jpg"),
            &[("Product Name", "Chase Freedom")],
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cards/v2/img/freedom.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![1u8, 2], "image/jpeg"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.product_urls, 1);
    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.images_saved, 1);
    assert_eq!(summary.failures, 0);

    let md = std::fs::read_to_string(root.path().join("markdown/chase-freedom.md"))
        .expect("record written");
    assert!(md.contains(&format!("Url: \"{}/providers/chase/freedom\"\n", server.uri())));
    assert_eq!(
        std::fs::read(root.path().join("images/chase-freedom.jpg")).expect("image saved"),
        vec![1u8, 2]
    );
}

#[tokio::test]
async fn test_blank_image_source_is_not_downloaded() {
    let server = MockServer::start().await;
    let root = tempfile::tempdir().expect("tempdir");

    serve_html(
        &server,
        "/providers",
        listing_page(&[("/providers/amex", "American Express")]),
    )
    .await;
    serve_html(
        &server,
        "/providers/amex",
        listing_page(&[("/cards/x", "X Card")]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/cards/x"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                detail_page(None, Some(""), &[("Product Name", "X Card")]),
                "text/html",
            ),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(format!("{}/providers", server.uri()), root.path());
    let summary = harvest(config).await.expect("harvest failed");

    assert_eq!(summary.records_written, 1);
    assert_eq!(summary.images_saved, 0);
    assert_eq!(summary.images_missing, 1);

    let md = std::fs::read_to_string(root.path().join("markdown/x-card.md")).expect("record written");
    assert!(md.contains("Image: \"No image found\"\n"));
    assert_eq!(
        std::fs::read_dir(root.path().join("images"))
            .expect("image dir")
            .count(),
        0,
        "no image file should be written"
    );
}
