use std::path::PathBuf;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const CATEGORY_PATH: &str = "/de/c/gesicht/gesichtsmasken/feuchtigkeitsmasken/120308";

fn test_config(server: &MockServer, output_path: PathBuf) -> AppConfig {
    AppConfig {
        env: douglas_core::Environment::Test,
        log_level: "debug".to_string(),
        base_url: server.uri(),
        home_path: "/de".to_string(),
        category_path: CATEGORY_PATH.to_string(),
        product_api_url: format!("{}/api/v2/products/", server.uri()),
        product_link_selector: "a.link.link--no-decoration.product-tile__main-link".to_string(),
        pagination_selector: "a.link.link--no-decoration.pagination-title__option-link.active"
            .to_string(),
        render_url: None,
        render_max_timeout_ms: 60_000,
        output_path,
        sheet_name: "gesichtsmasken_products".to_string(),
        request_timeout_secs: 5,
        user_agent: "douglas-test/0.1".to_string(),
        inter_request_delay_ms: 0,
    }
}

fn temp_output(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("douglas-collect-{name}-{}.xlsx", std::process::id()))
}

fn category_html(hrefs: &[&str]) -> String {
    let tiles: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<a class="link link--no-decoration product-tile__main-link" href="{href}">x</a>"#
            )
        })
        .collect();
    format!("<html><body>{tiles}</body></html>")
}

async fn mount_site(server: &MockServer, hrefs: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/de"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(category_html(hrefs), "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, number: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/products/{number}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn scrape_maps_every_fetched_record() {
    let server = MockServer::start().await;
    mount_site(&server, &["/de/p/1001", "/de/p/1002"]).await;
    mount_detail(
        &server,
        "1001",
        ResponseTemplate::new(200).set_body_json(json!({
            "ean": "3614273069243",
            "brandLine": { "name": "Lancôme" },
            "baseProductName": "Hydra Zen Maske",
            "stock": { "stockLevel": 5 },
            "price": { "formattedValue": "39,95\u{a0}€" }
        })),
    )
    .await;
    mount_detail(
        &server,
        "1002",
        ResponseTemplate::new(200).set_body_json(json!({ "ean": "4005900000001" })),
    )
    .await;

    let config = test_config(&server, temp_output("unused"));
    let (rows, summary) = scrape_rows(&config).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(summary.links_found, 2);
    assert_eq!(summary.records_fetched, 2);
    assert_eq!(rows[0].is_available, Some(true));
    assert_eq!(rows[0].product_name.as_deref(), Some("LancômeHydra Zen Maske"));
    assert_eq!(rows[0].final_price.as_deref(), Some("39,95€"));
    assert_eq!(rows[1].is_available, None);
    assert!(rows.iter().all(|row| !row.is_out_of_stock()));
}

#[tokio::test]
async fn failed_and_empty_records_are_skipped() {
    let server = MockServer::start().await;
    mount_site(&server, &["/de/p/1001", "/de/p/1002", "/de/p/1003", "/impressum"]).await;
    mount_detail(&server, "1001", ResponseTemplate::new(404)).await;
    mount_detail(&server, "1002", ResponseTemplate::new(200).set_body_json(json!({}))).await;
    mount_detail(
        &server,
        "1003",
        ResponseTemplate::new(200).set_body_json(json!({ "stock": { "stockLevel": 0 } })),
    )
    .await;

    let config = test_config(&server, temp_output("unused"));
    let (rows, summary) = scrape_rows(&config).await.unwrap();

    assert_eq!(summary.links_found, 4);
    assert_eq!(summary.records_fetched, 1);
    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_out_of_stock());
}

#[tokio::test]
async fn invalid_detail_json_aborts_the_run() {
    let server = MockServer::start().await;
    mount_site(&server, &["/de/p/1001"]).await;
    mount_detail(
        &server,
        "1001",
        ResponseTemplate::new(200).set_body_string("<html>Access denied</html>"),
    )
    .await;

    let config = test_config(&server, temp_output("unused"));
    let err = scrape_rows(&config).await.unwrap_err();
    assert!(
        format!("{err:#}").contains("1001"),
        "error should name the product, got: {err:#}"
    );
}

#[tokio::test]
async fn homepage_failure_does_not_stop_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/de"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(category_html(&["/de/p/1001"])))
        .mount(&server)
        .await;
    mount_detail(
        &server,
        "1001",
        ResponseTemplate::new(200).set_body_json(json!({ "ean": "1" })),
    )
    .await;

    let config = test_config(&server, temp_output("unused"));
    let (rows, _) = scrape_rows(&config).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn invalid_selector_fails_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = test_config(&server, temp_output("unused"));
    config.product_link_selector = "a[".to_string();

    assert!(scrape_rows(&config).await.is_err());
}

#[tokio::test]
async fn run_collect_writes_workbook() {
    let server = MockServer::start().await;
    mount_site(&server, &["/de/p/1001"]).await;
    mount_detail(
        &server,
        "1001",
        ResponseTemplate::new(200).set_body_json(json!({
            "ean": "3614273069243",
            "stock": { "stockLevel": 0 }
        })),
    )
    .await;

    let output = temp_output("write");
    let config = test_config(&server, output.clone());
    let summary = run_collect(&config, false).await.unwrap();

    let bytes = std::fs::read(&output).expect("workbook should exist");
    std::fs::remove_file(&output).ok();
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(
        summary,
        CollectSummary {
            links_found: 1,
            records_fetched: 1,
            rows_written: 1,
        }
    );
}

#[tokio::test]
async fn empty_category_writes_header_only_workbook() {
    let server = MockServer::start().await;
    mount_site(&server, &[]).await;

    let output = temp_output("empty");
    let config = test_config(&server, output.clone());
    let summary = run_collect(&config, false).await.unwrap();

    let bytes = std::fs::read(&output).expect("workbook should exist");
    std::fs::remove_file(&output).ok();
    assert!(bytes.starts_with(b"PK"));
    assert_eq!(summary.rows_written, 0);
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let server = MockServer::start().await;
    mount_site(&server, &["/de/p/1001"]).await;
    mount_detail(
        &server,
        "1001",
        ResponseTemplate::new(200).set_body_json(json!({ "ean": "1" })),
    )
    .await;

    let output = temp_output("dry");
    let config = test_config(&server, output.clone());
    let summary = run_collect(&config, true).await.unwrap();

    assert!(!output.exists());
    assert_eq!(summary.records_fetched, 1);
    assert_eq!(summary.rows_written, 0);
}
