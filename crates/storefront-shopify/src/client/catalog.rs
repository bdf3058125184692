//! Catalog, product-detail, and diagnostics queries.

use serde::Serialize;
use storefront_core::CanonicalProduct;

use super::StorefrontClient;
use crate::error::StorefrontError;
use crate::normalize::{normalize_product, normalize_product_with_handle};
use crate::queries::{
    catalog_query, catalog_variables, product_query, product_variables, CATALOG_OPERATION,
    PROBE_OPERATION, PROBE_QUERY, PRODUCT_OPERATION,
};
use crate::types::{Connection, ProbeData, ProductData, ProductsData, RawProduct};

/// Result of a connectivity probe against the configured store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopProbe {
    pub shop_name: Option<String>,
    /// Handle of the most recently updated product, if the store has any.
    pub sample_handle: Option<String>,
}

impl StorefrontClient {
    /// Fetches one catalog snapshot as raw records, in upstream order
    /// (most recently updated first).
    ///
    /// Items whose JSON cannot be read as a product are skipped and logged;
    /// the rest of the batch is returned.
    ///
    /// # Errors
    ///
    /// Transport, status, decode, and GraphQL-level failures, as described on
    /// [`StorefrontClient::execute`]. An empty catalog is `Ok(vec![])`.
    pub async fn fetch_catalog(&self) -> Result<Vec<RawProduct>, StorefrontError> {
        let data: ProductsData = self
            .execute(
                CATALOG_OPERATION,
                &catalog_query(),
                catalog_variables(&self.limits),
            )
            .await?;

        let items = data
            .products
            .map(Connection::into_items)
            .unwrap_or_default();
        let received = items.len();

        let products: Vec<RawProduct> = items
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| match serde_json::from_value(item) {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(position, error = %e, "skipping unreadable catalog item");
                    None
                }
            })
            .collect();

        tracing::debug!(received, decoded = products.len(), "fetched catalog");
        Ok(products)
    }

    /// Fetches and normalizes the catalog. Items without an id or handle are
    /// dropped; order is preserved.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::fetch_catalog`].
    pub async fn list_catalog(&self) -> Result<Vec<CanonicalProduct>, StorefrontError> {
        let raw = self.fetch_catalog().await?;
        Ok(raw.iter().filter_map(normalize_product).collect())
    }

    /// Fetches one product by handle as a raw record.
    ///
    /// `Ok(None)` means the store has no product with this handle.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`] if `handle` is blank.
    /// - Otherwise as [`StorefrontClient::fetch_catalog`].
    pub async fn fetch_product(&self, handle: &str) -> Result<Option<RawProduct>, StorefrontError> {
        let handle = handle.trim();
        if handle.is_empty() {
            return Err(StorefrontError::validation("product handle must not be empty"));
        }

        let data: ProductData = self
            .execute(
                PRODUCT_OPERATION,
                &product_query(),
                product_variables(handle, &self.limits),
            )
            .await?;

        let Some(product) = data.product else {
            tracing::debug!(handle, "product not found");
            return Ok(None);
        };

        serde_json::from_value(product)
            .map(Some)
            .map_err(|e| StorefrontError::Deserialize {
                context: format!("product {handle}"),
                source: e,
            })
    }

    /// Fetches and normalizes one product by handle.
    ///
    /// The requested handle stands in when the record does not echo it back.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::fetch_product`].
    pub async fn get_product(
        &self,
        handle: &str,
    ) -> Result<Option<CanonicalProduct>, StorefrontError> {
        let raw = self.fetch_product(handle).await?;
        Ok(raw.and_then(|raw| normalize_product_with_handle(&raw, handle.trim())))
    }

    /// Checks credentials and connectivity with a minimal query.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::fetch_catalog`].
    pub async fn probe(&self) -> Result<ShopProbe, StorefrontError> {
        let data: ProbeData = self
            .execute(PROBE_OPERATION, PROBE_QUERY, serde_json::json!({}))
            .await?;

        let sample_handle = data
            .products
            .as_ref()
            .and_then(Connection::first)
            .and_then(|product| product.handle.clone());

        Ok(ShopProbe {
            shop_name: data.shop.and_then(|shop| shop.name),
            sample_handle,
        })
    }
}
