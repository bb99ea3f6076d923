use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://www.douglas.de";
pub const DEFAULT_HOME_PATH: &str = "/de";
pub const DEFAULT_CATEGORY_PATH: &str = "/de/c/gesicht/gesichtsmasken/feuchtigkeitsmasken/120308";
pub const DEFAULT_PRODUCT_API_URL: &str = "https://www.douglas.de/api/v2/products/";
pub const DEFAULT_PRODUCT_LINK_SELECTOR: &str =
    "a.link.link--no-decoration.product-tile__main-link";
pub const DEFAULT_PAGINATION_SELECTOR: &str =
    "a.link.link--no-decoration.pagination-title__option-link.active";
pub const DEFAULT_OUTPUT_PATH: &str = "douglas_product_details.xlsx";
pub const DEFAULT_SHEET_NAME: &str = "gesichtsmasken_products";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Excel rejects worksheet names longer than this.
const MAX_SHEET_NAME_LEN: usize = 31;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("DOUGLAS_ENV", "development"))?;
    let log_level = or_default("DOUGLAS_LOG_LEVEL", "info");

    let base_url = or_default("DOUGLAS_BASE_URL", DEFAULT_BASE_URL);
    let home_path = or_default("DOUGLAS_HOME_PATH", DEFAULT_HOME_PATH);
    let category_path = or_default("DOUGLAS_CATEGORY_PATH", DEFAULT_CATEGORY_PATH);
    let product_api_url = or_default("DOUGLAS_PRODUCT_API_URL", DEFAULT_PRODUCT_API_URL);
    let product_link_selector = or_default(
        "DOUGLAS_PRODUCT_LINK_SELECTOR",
        DEFAULT_PRODUCT_LINK_SELECTOR,
    );
    let pagination_selector =
        or_default("DOUGLAS_PAGINATION_SELECTOR", DEFAULT_PAGINATION_SELECTOR);

    let render_url = lookup("DOUGLAS_RENDER_URL")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let render_max_timeout_ms = parse_u64("DOUGLAS_RENDER_MAX_TIMEOUT_MS", "60000")?;

    let output_path = PathBuf::from(or_default("DOUGLAS_OUTPUT_PATH", DEFAULT_OUTPUT_PATH));
    let sheet_name = parse_sheet_name(&or_default("DOUGLAS_SHEET_NAME", DEFAULT_SHEET_NAME))?;

    let request_timeout_secs = parse_u64("DOUGLAS_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("DOUGLAS_USER_AGENT", DEFAULT_USER_AGENT);
    let inter_request_delay_ms = parse_u64("DOUGLAS_INTER_REQUEST_DELAY_MS", "0")?;

    Ok(AppConfig {
        env,
        log_level,
        base_url,
        home_path,
        category_path,
        product_api_url,
        product_link_selector,
        pagination_selector,
        render_url,
        render_max_timeout_ms,
        output_path,
        sheet_name,
        request_timeout_secs,
        user_agent,
        inter_request_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "DOUGLAS_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

fn parse_sheet_name(raw: &str) -> Result<String, ConfigError> {
    let name = raw.trim();
    if name.is_empty() || name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(ConfigError::InvalidEnvVar {
            var: "DOUGLAS_SHEET_NAME".to_string(),
            reason: format!("sheet name must be 1-{MAX_SHEET_NAME_LEN} characters, got {raw:?}"),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
