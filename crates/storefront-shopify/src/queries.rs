//! GraphQL documents sent to the Storefront API.
//!
//! Page sizes are passed as variables so that one document serves every
//! configured [`QueryLimits`].

use serde_json::{json, Value};
use storefront_core::QueryLimits;

/// Fields selected for every product, in catalog and detail queries alike.
///
/// Both price ranges are requested: stores on older API versions populate
/// only one of them.
const PRODUCT_FIELDS: &str = r"
      id
      handle
      title
      tags
      description
      productType
      featuredImage { url altText }
      images(first: $imageLimit) { edges { node { url altText } } }
      priceRange { minVariantPrice { amount currencyCode } }
      priceRangeV2 { minVariantPrice { amount currencyCode } }
      variants(first: $variantLimit) {
        edges { node { id title availableForSale price { amount currencyCode } } }
      }
";

pub const CATALOG_OPERATION: &str = "Catalog";
pub const PRODUCT_OPERATION: &str = "ProductByHandle";
pub const CART_CREATE_OPERATION: &str = "CartCreate";
pub const PROBE_OPERATION: &str = "Probe";

/// Most recently updated products first.
#[must_use]
pub fn catalog_query() -> String {
    format!(
        "query Catalog($first: Int!, $imageLimit: Int!, $variantLimit: Int!) {{
  products(first: $first, sortKey: UPDATED_AT, reverse: true) {{
    edges {{
      node {{{PRODUCT_FIELDS}    }}
    }}
  }}
}}"
    )
}

#[must_use]
pub fn catalog_variables(limits: &QueryLimits) -> Value {
    json!({
        "first": limits.catalog_products,
        "imageLimit": limits.catalog_images,
        "variantLimit": limits.catalog_variants,
    })
}

#[must_use]
pub fn product_query() -> String {
    format!(
        "query ProductByHandle($handle: String!, $imageLimit: Int!, $variantLimit: Int!) {{
  product(handle: $handle) {{{PRODUCT_FIELDS}  }}
}}"
    )
}

#[must_use]
pub fn product_variables(handle: &str, limits: &QueryLimits) -> Value {
    json!({
        "handle": handle,
        "imageLimit": limits.detail_images,
        "variantLimit": limits.detail_variants,
    })
}

pub const CART_CREATE_MUTATION: &str = r"
mutation CartCreate($lines: [CartLineInput!]!) {
  cartCreate(input: { lines: $lines }) {
    cart { id checkoutUrl }
    userErrors { field message }
  }
}
";

pub const PROBE_QUERY: &str = r"
query Probe {
  shop { name }
  products(first: 1, sortKey: UPDATED_AT, reverse: true) {
    edges { node { id title handle } }
  }
}
";
