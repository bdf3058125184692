//! Raw Shopify Storefront API response types.
//!
//! ## Observed shape drift
//!
//! The storefront has been pointed at several API versions and query shapes
//! over time. Every field here is optional and several are modeled as
//! untagged enums so that one struct reads all of them:
//!
//! ### Connections
//! Older queries select `images(first: n) { edges { node { .. } } }`; newer
//! ones select `{ nodes { .. } }`. [`Connection`] accepts either.
//!
//! ### Prices
//! Product-level prices arrive under `priceRangeV2.minVariantPrice` or the
//! legacy `priceRange.minVariantPrice`, both `{ amount, currencyCode }`.
//! Variant prices are a `MoneyV2` object on current API versions but a bare
//! decimal string (or number) on old ones, e.g. `"32.00"`.
//!
//! ### Tags
//! A JSON array of strings on the Storefront API; a comma-separated string
//! on payloads relayed from the legacy REST endpoint.
//!
//! ### Availability
//! `availableForSale` on the Storefront API, `available` on legacy payloads.
//! Either may be missing; absence is resolved optimistically to `true`.
//!
//! ### Identifiers
//! GID strings (`"gid://shopify/Product/123"`) today, bare numbers on
//! legacy payloads.
//!
//! ### Unexpected types
//! A field holding a value of the wrong type reads as absent (see
//! [`lenient`]) instead of failing the record it belongs to. Only the
//! normalizer decides which absences drop a product.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

/// Reads an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Reads an optional list element by element. Unreadable elements become
/// `None`; a non-list value reads as an absent list.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// A string-or-number leaf value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Text(String),
    Number(serde_json::Number),
}

impl RawScalar {
    /// Renders the value as text, unchanged. Numbers use their JSON rendering.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            RawScalar::Text(s) => s.clone(),
            RawScalar::Number(n) => n.to_string(),
        }
    }
}

/// A GraphQL connection in either `edges { node }` or `nodes` form.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Connection<T> {
    #[serde(default, deserialize_with = "lenient_list")]
    pub edges: Option<Vec<Option<Edge<T>>>>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub nodes: Option<Vec<Option<T>>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Edge<T> {
    #[serde(default, deserialize_with = "lenient")]
    pub node: Option<T>,
}

impl<T> Connection<T> {
    /// Items in upstream order. `edges` wins when both forms are present;
    /// null nodes are skipped.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let from_edges = self
            .edges
            .iter()
            .flatten()
            .flatten()
            .filter_map(|edge| edge.node.as_ref());
        let from_nodes = self
            .nodes
            .iter()
            .filter(|_| self.edges.is_none())
            .flatten()
            .filter_map(Option::as_ref);
        from_edges.chain(from_nodes)
    }

    /// First non-null item.
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Consumes the connection, returning items in upstream order.
    pub fn into_items(self) -> Vec<T> {
        match (self.edges, self.nodes) {
            (Some(edges), _) => edges.into_iter().flatten().filter_map(|e| e.node).collect(),
            (None, Some(nodes)) => nodes.into_iter().flatten().collect(),
            (None, None) => Vec::new(),
        }
    }
}

/// Tags as a list or as a legacy comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawTags {
    List(Vec<Option<String>>),
    Joined(String),
}

impl RawTags {
    /// Non-empty, trimmed tags in upstream order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        let clean = |s: &str| Some(s.trim().to_owned()).filter(|t| !t.is_empty());
        match self {
            RawTags::List(items) => items.iter().flatten().filter_map(|s| clean(s)).collect(),
            RawTags::Joined(joined) => joined.split(',').filter_map(clean).collect(),
        }
    }
}

/// A `MoneyV2`-shaped value: `{ amount, currencyCode }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMoney {
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub currency_code: Option<String>,
}

/// `{ minVariantPrice { .. } }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPriceRange {
    #[serde(default, deserialize_with = "lenient")]
    pub min_variant_price: Option<RawMoney>,
}

/// A variant price: `MoneyV2` object or a bare legacy decimal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Money(RawMoney),
    Scalar(RawScalar),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    #[serde(default, alias = "src", deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, alias = "alt", deserialize_with = "lenient")]
    pub alt_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawVariant {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub available_for_sale: Option<bool>,
    /// Legacy spelling of `availableForSale`.
    #[serde(default, deserialize_with = "lenient")]
    pub available: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<RawPrice>,
}

/// One catalog item as the upstream returned it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<RawScalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub handle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub product_type: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tags: Option<RawTags>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured_image: Option<RawImage>,
    #[serde(default, deserialize_with = "lenient")]
    pub images: Option<Connection<RawImage>>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_range_v2: Option<RawPriceRange>,
    #[serde(default, deserialize_with = "lenient")]
    pub price_range: Option<RawPriceRange>,
    #[serde(default, deserialize_with = "lenient")]
    pub variants: Option<Connection<RawVariant>>,
}

/// The GraphQL response envelope. `errors` is kept verbatim for diagnostics.
#[derive(Debug, Deserialize)]
pub struct GraphqlResponse {
    pub data: Option<serde_json::Value>,
    pub errors: Option<serde_json::Value>,
}

impl GraphqlResponse {
    /// `true` when the upstream reported at least one error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        match &self.errors {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        }
    }
}

/// `data` of the catalog query. Items stay as JSON values so that one
/// malformed product cannot fail the whole batch.
#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Option<Connection<serde_json::Value>>,
}

/// `data` of the product-by-handle query.
#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartCreatePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreatePayload {
    pub cart: Option<RawCart>,
    pub user_errors: Option<Vec<RawUserError>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCart {
    pub id: Option<String>,
    pub checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawUserError {
    pub field: Option<Vec<String>>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawShop {
    pub name: Option<String>,
}

/// `data` of the diagnostics probe query.
#[derive(Debug, Deserialize)]
pub struct ProbeData {
    pub shop: Option<RawShop>,
    pub products: Option<Connection<RawProduct>>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn connection_reads_edges_form() {
        let conn: Connection<RawImage> = serde_json::from_value(json!({
            "edges": [
                { "node": { "url": "https://cdn.example.com/a.jpg", "altText": "A" } },
                { "node": null },
                { "node": { "url": "https://cdn.example.com/b.jpg" } }
            ]
        }))
        .unwrap();
        let urls: Vec<_> = conn.iter().filter_map(|i| i.url.as_deref()).collect();
        assert_eq!(
            urls,
            vec!["https://cdn.example.com/a.jpg", "https://cdn.example.com/b.jpg"]
        );
    }

    #[test]
    fn connection_reads_nodes_form() {
        let conn: Connection<RawImage> = serde_json::from_value(json!({
            "nodes": [{ "url": "https://cdn.example.com/n.jpg" }]
        }))
        .unwrap();
        assert_eq!(
            conn.first().and_then(|i| i.url.as_deref()),
            Some("https://cdn.example.com/n.jpg")
        );
        assert_eq!(conn.into_items().len(), 1);
    }

    #[test]
    fn connection_prefers_edges_when_both_present() {
        let conn: Connection<RawImage> = serde_json::from_value(json!({
            "edges": [{ "node": { "url": "edge" } }],
            "nodes": [{ "url": "node" }]
        }))
        .unwrap();
        let urls: Vec<_> = conn.iter().filter_map(|i| i.url.as_deref()).collect();
        assert_eq!(urls, vec!["edge"]);
        let items = conn.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url.as_deref(), Some("edge"));
    }

    #[test]
    fn tags_accept_list_and_joined_string() {
        let list: RawTags = serde_json::from_value(json!(["Featured", " Deep Cut ", ""])).unwrap();
        assert_eq!(list.to_vec(), vec!["Featured", "Deep Cut"]);

        let joined: RawTags = serde_json::from_value(json!("Featured, Deep Cut,")).unwrap();
        assert_eq!(joined.to_vec(), vec!["Featured", "Deep Cut"]);
    }

    #[test]
    fn variant_price_accepts_money_object_and_scalar() {
        let money: RawPrice =
            serde_json::from_value(json!({ "amount": "19.99", "currencyCode": "USD" })).unwrap();
        assert!(matches!(money, RawPrice::Money(_)));

        let legacy: RawPrice = serde_json::from_value(json!("32.00")).unwrap();
        assert!(matches!(legacy, RawPrice::Scalar(RawScalar::Text(ref s)) if s == "32.00"));

        let number: RawPrice = serde_json::from_value(json!(32)).unwrap();
        assert!(matches!(number, RawPrice::Scalar(RawScalar::Number(_))));
    }

    #[test]
    fn legacy_image_field_names_are_aliased() {
        let image: RawImage =
            serde_json::from_value(json!({ "src": "https://cdn.example.com/x.jpg", "alt": "x" }))
                .unwrap();
        assert_eq!(image.url.as_deref(), Some("https://cdn.example.com/x.jpg"));
        assert_eq!(image.alt_text.as_deref(), Some("x"));
    }

    #[test]
    fn numeric_id_renders_as_text() {
        let id: RawScalar = serde_json::from_value(json!(6_789_012_345_678_i64)).unwrap();
        assert_eq!(id.to_text(), "6789012345678");
    }

    #[test]
    fn graphql_errors_detection() {
        let empty: GraphqlResponse =
            serde_json::from_value(json!({ "data": {}, "errors": [] })).unwrap();
        assert!(!empty.has_errors());

        let null: GraphqlResponse =
            serde_json::from_value(json!({ "data": {}, "errors": null })).unwrap();
        assert!(!null.has_errors());

        let some: GraphqlResponse = serde_json::from_value(json!({
            "errors": [{ "message": "Field 'priceRangeV2' doesn't exist on type 'Product'" }]
        }))
        .unwrap();
        assert!(some.has_errors());
    }
}
