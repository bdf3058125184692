use std::net::SocketAddr;

use crate::ConfigError;

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

/// Page sizes requested from the upstream GraphQL API.
///
/// The storefront never paginates past these bounds: a catalog snapshot is
/// whatever the upstream returns for one query of `catalog_products` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryLimits {
    pub catalog_products: u32,
    pub catalog_images: u32,
    pub catalog_variants: u32,
    pub detail_images: u32,
    pub detail_variants: u32,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            catalog_products: 30,
            catalog_images: 1,
            catalog_variants: 1,
            detail_images: 8,
            detail_variants: 20,
        }
    }
}

/// Connection settings for the upstream Storefront API.
///
/// Credentials are optional here so the configuration can be loaded (and
/// reported on) even when they are absent; the client refuses to build
/// without them.
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Store domain without scheme, e.g. `"boombapbars.myshopify.com"`.
    pub store_domain: Option<String>,
    pub access_token: Option<String>,
    /// API version path segment, e.g. `"2024-07"`.
    pub api_version: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub limits: QueryLimits,
}

impl UpstreamConfig {
    /// Builds a config with default version, timeout, and limits.
    #[must_use]
    pub fn new(store_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_domain: Some(store_domain.into()),
            access_token: Some(access_token.into()),
            api_version: "2024-07".to_string(),
            request_timeout_secs: 15,
            user_agent: "storefront/0.1".to_string(),
            limits: QueryLimits::default(),
        }
    }

    /// `true` when both the store domain and the access token are set.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.require_store_domain().is_ok() && self.require_access_token().is_ok()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the domain is unset or blank.
    pub fn require_store_domain(&self) -> Result<&str, ConfigError> {
        required(self.store_domain.as_deref(), "SHOPIFY_STORE_DOMAIN")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if the token is unset or blank.
    pub fn require_access_token(&self) -> Result<&str, ConfigError> {
        required(self.access_token.as_deref(), "SHOPIFY_STOREFRONT_TOKEN")
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("store_domain", &self.store_domain)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("api_version", &self.api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("limits", &self.limits)
            .finish()
    }
}

fn required<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub upstream: UpstreamConfig,
}
