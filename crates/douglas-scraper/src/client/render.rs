//! Client for a FlareSolverr-compatible render service.
//!
//! Category listings are filled in by client-side scripts, so a plain GET
//! returns an empty product grid. The render service loads the page in a
//! headless browser and hands back the resulting HTML.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ScraperError;

use super::parse_absolute_url;

/// Extra time allowed on top of `maxTimeout` for the service to answer.
const RESPONSE_GRACE_MS: u64 = 10_000;

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    cmd: &'a str,
    url: &'a str,
    #[serde(rename = "maxTimeout")]
    max_timeout: u64,
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    solution: Option<RenderSolution>,
}

#[derive(Debug, Deserialize)]
struct RenderSolution {
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    response: Option<String>,
}

/// Endpoint and page-load budget for the render service.
#[derive(Debug, Clone)]
pub struct RenderService {
    endpoint: Url,
    max_timeout_ms: u64,
}

impl RenderService {
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `endpoint` is not an absolute
    /// http(s) URL.
    pub fn new(endpoint: &str, max_timeout_ms: u64) -> Result<Self, ScraperError> {
        Ok(Self {
            endpoint: parse_absolute_url(endpoint)?,
            max_timeout_ms,
        })
    }

    /// Renders `page_url` and returns the page HTML.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::Render`] if the service answers with a non-2xx
    ///   status, an unreadable body, a non-`"ok"` status, or no HTML.
    /// - [`ScraperError::UnexpectedStatus`] if the rendered page itself
    ///   answered with a non-2xx status.
    /// - [`ScraperError::Http`] on network failure.
    pub(super) async fn render(
        &self,
        client: &Client,
        page_url: &Url,
    ) -> Result<String, ScraperError> {
        let render_error = |reason: String| ScraperError::Render {
            url: page_url.to_string(),
            reason,
        };

        let request = RenderRequest {
            cmd: "request.get",
            url: page_url.as_str(),
            max_timeout: self.max_timeout_ms,
        };

        let response = client
            .post(self.endpoint.clone())
            .timeout(Duration::from_millis(
                self.max_timeout_ms.saturating_add(RESPONSE_GRACE_MS),
            ))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(render_error(format!("render service returned HTTP {status}")));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<RenderResponse>(&body)
            .map_err(|e| render_error(format!("unreadable render response: {e}")))?;

        if parsed.status != "ok" {
            let message = parsed.message.unwrap_or_default();
            return Err(render_error(format!(
                "render status \"{}\": {message}",
                parsed.status
            )));
        }

        let solution = parsed
            .solution
            .ok_or_else(|| render_error("render response has no solution".to_owned()))?;

        if let Some(page_status) = solution.status.filter(|s| !(200..300).contains(s)) {
            return Err(ScraperError::UnexpectedStatus {
                status: page_status,
                url: page_url.to_string(),
            });
        }

        let html = solution
            .response
            .filter(|html| !html.is_empty())
            .ok_or_else(|| render_error("render response has no HTML".to_owned()))?;

        tracing::debug!(url = %page_url, bytes = html.len(), "page rendered");
        Ok(html)
    }
}
