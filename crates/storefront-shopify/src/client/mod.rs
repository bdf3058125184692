//! HTTP client for the Shopify Storefront GraphQL API.

mod catalog;
mod checkout;
mod endpoint;

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use storefront_core::{QueryLimits, UpstreamConfig};

use crate::error::StorefrontError;
use crate::types::GraphqlResponse;

pub use catalog::ShopProbe;
pub use checkout::{quantity_from_json, CheckoutLine, CheckoutSession};
// Re-export for test visibility via `use super::*`
#[cfg(test)]
use checkout::validate_lines;
#[cfg(test)]
use endpoint::{graphql_endpoint, store_origin};

pub(super) const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Client for one store's Storefront API.
///
/// Holds only an immutable connection pool and settings, so it is cheap to
/// share behind an `Arc`. Every call is a fresh upstream request: nothing is
/// cached and nothing is retried.
pub struct StorefrontClient {
    pub(super) client: Client,
    pub(super) endpoint: Url,
    pub(super) access_token: String,
    pub(super) limits: QueryLimits,
}

impl StorefrontClient {
    /// Creates a client for `https://{store_domain}/api/{api_version}/graphql.json`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Configuration`] if the store domain or access
    ///   token is missing, or the endpoint cannot be built from them.
    /// - [`StorefrontError::Http`] if the underlying `reqwest::Client` cannot
    ///   be constructed.
    pub fn new(config: &UpstreamConfig) -> Result<Self, StorefrontError> {
        let store_domain = config.require_store_domain()?;
        Self::with_base_url(config, &endpoint::store_origin(store_domain))
    }

    /// Creates a client against a custom origin (for testing with wiremock).
    /// The configured store domain is ignored; the token is still required.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::new`].
    pub fn with_base_url(config: &UpstreamConfig, base_url: &str) -> Result<Self, StorefrontError> {
        let access_token = config.require_access_token()?;
        let endpoint = endpoint::graphql_endpoint(base_url, &config.api_version)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint,
            access_token: access_token.to_owned(),
            limits: config.limits,
        })
    }

    /// The GraphQL endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Posts one GraphQL operation and decodes its `data` member into `T`.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Http`] on network, TLS, or timeout failure.
    /// - [`StorefrontError::UnexpectedStatus`] on any non-2xx status.
    /// - [`StorefrontError::Deserialize`] if the body is not a GraphQL
    ///   response or `data` does not have the expected shape.
    /// - [`StorefrontError::Upstream`] if the response carries a non-empty
    ///   `errors` array. `data` is ignored in that case, even if partial.
    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, StorefrontError> {
        let body = serde_json::json!({ "query": query, "variables": variables });

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(
                operation,
                status = status.as_u16(),
                "storefront request failed"
            );
            return Err(StorefrontError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        let envelope = serde_json::from_str::<GraphqlResponse>(&text).map_err(|e| {
            StorefrontError::Deserialize {
                context: format!("{operation} response"),
                source: e,
            }
        })?;

        if envelope.has_errors() {
            tracing::warn!(operation, "storefront reported GraphQL errors");
            return Err(StorefrontError::Upstream {
                operation,
                errors: envelope.errors.unwrap_or_default(),
            });
        }

        serde_json::from_value(envelope.data.unwrap_or_default()).map_err(|e| {
            StorefrontError::Deserialize {
                context: format!("{operation} data"),
                source: e,
            }
        })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
