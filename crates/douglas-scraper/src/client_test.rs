use super::*;

fn test_client() -> DouglasClient {
    DouglasClient::new(
        "https://www.douglas.de",
        "https://www.douglas.de/api/v2/products/",
        5,
        "douglas-test/0.1",
    )
    .unwrap()
}

#[test]
fn new_rejects_relative_base_url() {
    let result = DouglasClient::new("www.douglas.de", "https://www.douglas.de/api/", 5, "ua");
    assert!(
        matches!(result, Err(ScraperError::InvalidUrl { ref url, .. }) if url == "www.douglas.de"),
        "expected InvalidUrl"
    );
}

#[test]
fn new_rejects_non_http_product_api_url() {
    let result = DouglasClient::new(
        "https://www.douglas.de",
        "ftp://www.douglas.de/api/v2/products/",
        5,
        "ua",
    );
    assert!(matches!(result, Err(ScraperError::InvalidUrl { .. })));
}

#[test]
fn page_url_joins_absolute_path() {
    let client = test_client();
    assert_eq!(
        client.page_url("/de").unwrap().as_str(),
        "https://www.douglas.de/de"
    );
    assert_eq!(
        client
            .page_url("/de/c/gesicht/gesichtsmasken/feuchtigkeitsmasken/120308")
            .unwrap()
            .as_str(),
        "https://www.douglas.de/de/c/gesicht/gesichtsmasken/feuchtigkeitsmasken/120308"
    );
}

#[test]
fn page_url_accepts_absolute_url() {
    let client = test_client();
    assert_eq!(
        client
            .page_url("https://www.douglas.de/de/c/parfum/01")
            .unwrap()
            .as_str(),
        "https://www.douglas.de/de/c/parfum/01"
    );
}

#[test]
fn product_detail_url_appends_number_and_fields() {
    let client = test_client();
    assert_eq!(
        client.product_detail_url("5010123456").unwrap().as_str(),
        "https://www.douglas.de/api/v2/products/5010123456?fields=FULL"
    );
}

#[test]
fn check_status_maps_404_and_5xx() {
    let url = Url::parse("https://www.douglas.de/de").unwrap();
    assert!(check_status(reqwest::StatusCode::OK, &url).is_ok());
    assert!(matches!(
        check_status(reqwest::StatusCode::NOT_FOUND, &url),
        Err(ScraperError::NotFound { .. })
    ));
    assert!(matches!(
        check_status(reqwest::StatusCode::BAD_GATEWAY, &url),
        Err(ScraperError::UnexpectedStatus { status: 502, .. })
    ));
}
