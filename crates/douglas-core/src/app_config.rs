use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime configuration for one scrape run.
///
/// Every value has a default matching the douglas.de moisturizing face mask
/// category, so an empty environment produces a working run.
#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Scheme + host that relative listing paths are resolved against.
    pub base_url: String,
    /// Homepage path requested once to prime session cookies.
    pub home_path: String,
    pub category_path: String,
    /// Product detail endpoint; the product number is appended verbatim.
    pub product_api_url: String,
    pub product_link_selector: String,
    pub pagination_selector: String,
    /// FlareSolverr-compatible render endpoint. `None` fetches raw HTML.
    pub render_url: Option<String>,
    pub render_max_timeout_ms: u64,
    pub output_path: PathBuf,
    pub sheet_name: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub inter_request_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("base_url", &self.base_url)
            .field("home_path", &self.home_path)
            .field("category_path", &self.category_path)
            .field("product_api_url", &self.product_api_url)
            .field("product_link_selector", &self.product_link_selector)
            .field("pagination_selector", &self.pagination_selector)
            // Render endpoints are often deployed with credentials in the URL.
            .field(
                "render_url",
                &self.render_url.as_ref().map(|_| "[redacted]"),
            )
            .field("render_max_timeout_ms", &self.render_max_timeout_ms)
            .field("output_path", &self.output_path)
            .field("sheet_name", &self.sheet_name)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("inter_request_delay_ms", &self.inter_request_delay_ms)
            .finish()
    }
}
