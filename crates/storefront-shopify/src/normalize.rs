//! Normalization from raw Storefront API records to
//! [`storefront_core::CanonicalProduct`].
//!
//! Field lookups go through [`crate::resolve`]; this module handles the
//! structural conversion and the validation of mandatory identifiers.

use std::str::FromStr;

use rust_decimal::Decimal;
use storefront_core::{CanonicalProduct, CanonicalVariant, Money, ProductImage, DEFAULT_CURRENCY};

use crate::resolve::{
    has_url, resolve_availability, resolve_image, resolve_price, resolve_variant_price,
    PriceCandidate,
};
use crate::types::{RawImage, RawProduct, RawScalar, RawVariant};

/// Normalizes a raw catalog item into a [`CanonicalProduct`].
///
/// Returns `None` (and logs the skip) when the item has no usable `id` or
/// `handle`. Every other field is best-effort: missing collections become
/// empty, an unparseable price becomes `None`.
#[must_use]
pub fn normalize_product(raw: &RawProduct) -> Option<CanonicalProduct> {
    normalize(raw, None)
}

/// Like [`normalize_product`], but uses `handle` when the record itself does
/// not carry one. Product-detail queries look products up by handle and the
/// upstream does not echo it back on every API version.
#[must_use]
pub fn normalize_product_with_handle(raw: &RawProduct, handle: &str) -> Option<CanonicalProduct> {
    normalize(raw, Some(handle))
}

fn normalize(raw: &RawProduct, fallback_handle: Option<&str>) -> Option<CanonicalProduct> {
    let id = raw.id.as_ref().map(RawScalar::to_text).filter(|id| !is_blank(id));
    let handle = raw
        .handle
        .as_deref()
        .filter(|h| !is_blank(h))
        .or_else(|| fallback_handle.filter(|h| !is_blank(h)))
        .map(str::to_owned);

    let (Some(id), Some(handle)) = (id, handle) else {
        tracing::warn!(
            id = ?raw.id,
            handle = ?raw.handle,
            "skipping catalog item without an id or handle"
        );
        return None;
    };

    let title =
        non_blank(raw.title.as_deref()).map_or_else(|| handle.trim().to_owned(), str::to_owned);

    let featured_image = resolve_image(raw).map(to_image);
    let mut images: Vec<ProductImage> = raw
        .images
        .as_ref()
        .map(|images| images.iter().filter(|i| has_url(i)).map(to_image).collect())
        .unwrap_or_default();
    if images.is_empty() {
        images.extend(featured_image.clone());
    }

    let variants = raw
        .variants
        .as_ref()
        .map(|variants| {
            variants
                .iter()
                .filter_map(|variant| normalize_variant(variant, &id))
                .collect()
        })
        .unwrap_or_default();

    let price_display = resolve_price(raw).and_then(|(source, price)| {
        let money = to_money(price);
        if money.is_none() {
            tracing::debug!(
                product_id = %id,
                ?source,
                amount = %price.amount.to_text(),
                "price amount is not a decimal; leaving price unset"
            );
        }
        money
    });

    Some(CanonicalProduct {
        id,
        title,
        handle,
        description: non_blank(raw.description.as_deref()).map(str::to_owned),
        product_type: non_blank(raw.product_type.as_deref()).map(str::to_owned),
        tags: raw.tags.as_ref().map(|t| t.to_vec()).unwrap_or_default(),
        featured_image,
        images,
        variants,
        price_display,
    })
}

/// Normalizes one variant. Variants without an id cannot be checked out and
/// are dropped; the product keeps its other variants.
fn normalize_variant(variant: &RawVariant, product_id: &str) -> Option<CanonicalVariant> {
    let Some(id) = variant
        .id
        .as_ref()
        .map(RawScalar::to_text)
        .filter(|id| !is_blank(id))
    else {
        tracing::warn!(product_id, "dropping variant without an id");
        return None;
    };

    Some(CanonicalVariant {
        id,
        title: non_blank(variant.title.as_deref()).map(str::to_owned),
        available_for_sale: resolve_availability(variant),
        price: resolve_variant_price(variant).and_then(to_money),
    })
}

/// Validates a price candidate into [`Money`].
///
/// The upstream currency passes through unchanged; [`DEFAULT_CURRENCY`] is
/// used only when an amount parsed but no currency accompanied it.
fn to_money(price: PriceCandidate<'_>) -> Option<Money> {
    let amount = parse_amount(price.amount)?;
    let currency_code = non_blank(price.currency_code).unwrap_or(DEFAULT_CURRENCY);
    Some(Money {
        amount,
        currency_code: currency_code.to_owned(),
    })
}

/// Parses a decimal amount such as `"19.99"` or `19.99`.
///
/// Returns `None` for anything that is not a plain decimal (`"N/A"`, `""`).
#[must_use]
pub fn parse_amount(amount: &RawScalar) -> Option<Decimal> {
    let text = amount.to_text();
    let text = text.trim();
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn to_image(image: &RawImage) -> ProductImage {
    ProductImage {
        url: image.url.as_deref().unwrap_or_default().trim().to_owned(),
        alt_text: non_blank(image.alt_text.as_deref()).map(str::to_owned),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
