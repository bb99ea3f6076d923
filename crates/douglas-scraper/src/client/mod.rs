//! HTTP session for douglas.de listing pages and the product detail API.

mod listing;
mod render;

use std::time::Duration;

use douglas_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::types::ProductDetail;

pub use render::RenderService;

const CONNECT_TIMEOUT_SECS: u64 = 10;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const JSON_ACCEPT: &str = "application/json,text/plain;q=0.9,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "de-DE,de;q=0.9,en;q=0.8";

/// One cookie-carrying session against douglas.de.
///
/// The homepage is fetched first to pick up session cookies; listing pages
/// and detail records are then requested on the same session. Listing pages
/// go through a [`RenderService`] when one is configured.
pub struct DouglasClient {
    client: Client,
    base_url: Url,
    product_api_url: String,
    renderer: Option<RenderService>,
}

impl DouglasClient {
    /// Creates a client with a cookie store, request timeout, and `User-Agent`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `base_url` or `product_api_url` is not
    ///   an absolute URL.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        base_url: &str,
        product_api_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScraperError> {
        let base_url = parse_absolute_url(base_url)?;
        parse_absolute_url(product_api_url)?;

        let client = Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            product_api_url: product_api_url.to_owned(),
            renderer: None,
        })
    }

    /// Builds a client from loaded configuration, attaching the render
    /// service when `render_url` is set.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`], plus [`ScraperError::InvalidUrl`] for a
    /// malformed `render_url`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let client = Self::new(
            &config.base_url,
            &config.product_api_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        match config.render_url.as_deref() {
            Some(render_url) => Ok(client.with_renderer(RenderService::new(
                render_url,
                config.render_max_timeout_ms,
            )?)),
            None => Ok(client),
        }
    }

    /// Routes listing page fetches through `renderer`.
    #[must_use]
    pub fn with_renderer(mut self, renderer: RenderService) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Resolves a site path (or absolute URL) against the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the result is not a valid URL.
    pub fn page_url(&self, path: &str) -> Result<Url, ScraperError> {
        join_url(&self.base_url, path)
    }

    /// Requests the homepage so the session picks up its cookies.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `home_path` does not resolve.
    /// - [`ScraperError::UnexpectedStatus`] for a non-2xx response.
    /// - [`ScraperError::Http`] on network failure.
    pub async fn fetch_homepage(&self, home_path: &str) -> Result<(), ScraperError> {
        let url = self.page_url(home_path)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, HTML_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .send()
            .await?;
        check_status(response.status(), &url)?;
        tracing::debug!(url = %url, "session primed from homepage");
        Ok(())
    }

    /// Returns the HTML of a listing page, rendered when a render service is
    /// configured and fetched directly otherwise.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Render`] if the render service fails.
    /// - [`ScraperError::NotFound`] / [`ScraperError::UnexpectedStatus`] for a
    ///   non-2xx response.
    /// - [`ScraperError::Http`] on network failure.
    pub async fn fetch_page_html(&self, url: &Url) -> Result<String, ScraperError> {
        if let Some(renderer) = &self.renderer {
            return renderer.render(&self.client, url).await;
        }

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, HTML_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::REFERER, self.base_url.as_str())
            .send()
            .await?;
        check_status(response.status(), url)?;
        Ok(response.text().await?)
    }

    /// Builds `<product_api_url><number>?fields=FULL`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the concatenation is not a
    /// valid URL.
    pub fn product_detail_url(&self, product_number: &str) -> Result<Url, ScraperError> {
        let raw = format!("{}{product_number}", self.product_api_url);
        let mut url = parse_absolute_url(&raw)?;
        url.query_pairs_mut().append_pair("fields", "FULL");
        Ok(url)
    }

    /// Fetches the full detail record for one product number.
    ///
    /// Returns `Ok(None)` when the endpoint answers with `null`, `{}`, or any
    /// other non-object JSON document.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::NotFound`] for HTTP 404.
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status.
    /// - [`ScraperError::Http`] on network failure.
    /// - [`ScraperError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_product_detail(
        &self,
        product_number: &str,
    ) -> Result<Option<ProductDetail>, ScraperError> {
        let url = self.product_detail_url(product_number)?;
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, JSON_ACCEPT)
            .header(reqwest::header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(reqwest::header::REFERER, self.base_url.as_str())
            .send()
            .await?;
        check_status(response.status(), &url)?;

        let body = response.text().await?;
        let value = serde_json::from_str::<serde_json::Value>(&body).map_err(|e| {
            ScraperError::Deserialize {
                context: format!("product detail {product_number}"),
                source: e,
            }
        })?;

        Ok(ProductDetail::from_value(value))
    }
}

fn check_status(status: reqwest::StatusCode, url: &Url) -> Result<(), ScraperError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ScraperError::NotFound {
            url: url.to_string(),
        });
    }
    if !status.is_success() {
        return Err(ScraperError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(())
}

fn parse_absolute_url(raw: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(raw).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}

fn join_url(base: &Url, path: &str) -> Result<Url, ScraperError> {
    base.join(path).map_err(|e| ScraperError::InvalidUrl {
        url: path.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
