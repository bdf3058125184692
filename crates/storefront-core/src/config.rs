use crate::app_config::{AppConfig, Environment, QueryLimits, UpstreamConfig};
use crate::ConfigError;

/// Upper bound the Storefront API accepts for `first:` on a connection.
const MAX_PAGE_SIZE: u32 = 250;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
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
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Upstream credentials are read but not required here; their absence is
/// reported by the Shopify client as a configuration error before any
/// network call. Empty or whitespace-only values count as absent.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let or_default =
        |var: &str, default: &str| -> String { optional(var).unwrap_or_else(|| default.to_string()) };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_page_size = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 || value > MAX_PAGE_SIZE {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be between 1 and {MAX_PAGE_SIZE}, got {value}"),
            });
        }
        Ok(value)
    };

    let env = parse_environment(&or_default("STOREFRONT_ENV", "development"))?;

    let bind_raw = or_default("STOREFRONT_BIND_ADDR", "0.0.0.0:3000");
    let bind_addr = bind_raw
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "STOREFRONT_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("STOREFRONT_LOG_LEVEL", "info");

    let store_domain = optional("SHOPIFY_STORE_DOMAIN").map(|d| strip_scheme(&d));
    let access_token = optional("SHOPIFY_STOREFRONT_TOKEN");
    let api_version = or_default("SHOPIFY_API_VERSION", "2024-07");

    let request_timeout_secs = parse_u64("STOREFRONT_REQUEST_TIMEOUT_SECS", "15")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "timeout must be at least one second".to_string(),
        });
    }
    let user_agent = or_default("STOREFRONT_USER_AGENT", "storefront/0.1");

    let limits = QueryLimits {
        catalog_products: parse_page_size("STOREFRONT_CATALOG_PAGE_SIZE", "30")?,
        catalog_images: parse_page_size("STOREFRONT_CATALOG_IMAGE_LIMIT", "1")?,
        catalog_variants: parse_page_size("STOREFRONT_CATALOG_VARIANT_LIMIT", "1")?,
        detail_images: parse_page_size("STOREFRONT_DETAIL_IMAGE_LIMIT", "8")?,
        detail_variants: parse_page_size("STOREFRONT_DETAIL_VARIANT_LIMIT", "20")?,
    };

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        upstream: UpstreamConfig {
            store_domain,
            access_token,
            api_version,
            request_timeout_secs,
            user_agent,
            limits,
        },
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for unrecognized values.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFRONT_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

/// Accepts `"https://shop.example.com/"` as well as `"shop.example.com"`.
fn strip_scheme(domain: &str) -> String {
    domain
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
