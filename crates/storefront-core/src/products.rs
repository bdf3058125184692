use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Currency assumed when the upstream resolves an amount without a code.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Pseudo-category meaning "no tag filter".
pub const ALL_CATEGORY: &str = "All";

/// A currency-tagged decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Exact decimal, serialized as a string (e.g. `"19.99"`).
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 code, e.g. `"USD"`.
    pub currency_code: String,
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut amount = self.amount.round_dp(2);
        amount.rescale(2);
        write!(f, "{amount} {}", self.currency_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    pub url: String,
    pub alt_text: Option<String>,
}

/// A storefront product in the shape the presentation layer consumes,
/// independent of which upstream schema version produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalProduct {
    /// Opaque upstream identifier (a Shopify GID such as `"gid://shopify/Product/1"`).
    pub id: String,
    pub title: String,
    /// URL slug, unique per store; the lookup key for product detail.
    pub handle: String,
    pub description: Option<String>,
    pub product_type: Option<String>,
    /// Labels in upstream order.
    pub tags: Vec<String>,
    /// Image chosen by the image precedence rule, if any.
    pub featured_image: Option<ProductImage>,
    pub images: Vec<ProductImage>,
    pub variants: Vec<CanonicalVariant>,
    /// Minimum price resolved by the price precedence rule.
    pub price_display: Option<Money>,
}

impl CanonicalProduct {
    /// Returns the first variant available for sale, falling back to the
    /// first variant when none is.
    #[must_use]
    pub fn first_purchasable_variant(&self) -> Option<&CanonicalVariant> {
        self.variants
            .iter()
            .find(|v| v.available_for_sale)
            .or_else(|| self.variants.first())
    }

    /// Returns the featured image, or the first gallery image.
    #[must_use]
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.featured_image.as_ref().or_else(|| self.images.first())
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Returns `true` if at least one variant is available for sale.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }
}

/// A single purchasable variant of a [`CanonicalProduct`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalVariant {
    /// Opaque identifier, sent upstream as `merchandiseId` at checkout.
    pub id: String,
    pub title: Option<String>,
    /// Optimistic: `true` unless the upstream explicitly says otherwise.
    /// Stock is only confirmed when the checkout is created.
    pub available_for_sale: bool,
    pub price: Option<Money>,
}

/// Distinct tags across `products`, in first-seen order.
#[must_use]
pub fn tag_categories(products: &[CanonicalProduct]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    products
        .iter()
        .flat_map(|p| p.tags.iter())
        .filter(|tag| seen.insert(*tag))
        .cloned()
        .collect()
}

/// Products carrying `tag`. `None` or [`ALL_CATEGORY`] keeps everything.
#[must_use]
pub fn filter_by_tag(products: Vec<CanonicalProduct>, tag: Option<&str>) -> Vec<CanonicalProduct> {
    match tag {
        None | Some(ALL_CATEGORY) => products,
        Some(tag) => products.into_iter().filter(|p| p.has_tag(tag)).collect(),
    }
}
