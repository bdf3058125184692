//! Field resolution across upstream schema versions.
//!
//! Each logical field the storefront needs (price, image, availability) can
//! live at several paths depending on the API version and query shape that
//! produced the record. Every field has one ordered rule table below; the
//! first source that yields a non-null value wins. Sources are never merged
//! or averaged.
//!
//! Resolution never fails: absence is `None` (or the documented default).

use crate::types::{RawImage, RawMoney, RawPrice, RawProduct, RawScalar, RawVariant};

/// Where a product-level price can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// `priceRangeV2.minVariantPrice`
    PriceRangeV2,
    /// `priceRange.minVariantPrice` (legacy)
    PriceRange,
    /// `price` of the first variant in the variants connection
    FirstVariant,
}

/// Product price precedence.
pub const PRICE_PRECEDENCE: &[PriceSource] = &[
    PriceSource::PriceRangeV2,
    PriceSource::PriceRange,
    PriceSource::FirstVariant,
];

/// Where a display image can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// `featuredImage`
    FeaturedImage,
    /// First entry of the `images` connection
    FirstImage,
}

/// Display image precedence. No match means the caller shows a placeholder.
pub const IMAGE_PRECEDENCE: &[ImageSource] = &[ImageSource::FeaturedImage, ImageSource::FirstImage];

/// Where a variant's availability flag can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilitySource {
    /// `availableForSale`
    AvailableForSale,
    /// `available` (legacy)
    Available,
}

/// Availability precedence. No match resolves to [`DEFAULT_AVAILABILITY`].
pub const AVAILABILITY_PRECEDENCE: &[AvailabilitySource] = &[
    AvailabilitySource::AvailableForSale,
    AvailabilitySource::Available,
];

/// Availability when no source reports it. Unknown stock must not hide a
/// sellable item; the upstream confirms stock when the cart is created.
pub const DEFAULT_AVAILABILITY: bool = true;

/// A price as found in the record, before the amount is validated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceCandidate<'a> {
    pub amount: &'a RawScalar,
    pub currency_code: Option<&'a str>,
}

impl<'a> PriceCandidate<'a> {
    fn from_money(money: &'a RawMoney) -> Option<Self> {
        money.amount.as_ref().map(|amount| Self {
            amount,
            currency_code: money.currency_code.as_deref(),
        })
    }

    fn from_price(price: &'a RawPrice) -> Option<Self> {
        match price {
            RawPrice::Money(money) => Self::from_money(money),
            RawPrice::Scalar(amount) => Some(Self {
                amount,
                currency_code: None,
            }),
        }
    }
}

impl PriceSource {
    fn lookup(self, product: &RawProduct) -> Option<PriceCandidate<'_>> {
        match self {
            PriceSource::PriceRangeV2 => product
                .price_range_v2
                .as_ref()
                .and_then(|range| range.min_variant_price.as_ref())
                .and_then(PriceCandidate::from_money),
            PriceSource::PriceRange => product
                .price_range
                .as_ref()
                .and_then(|range| range.min_variant_price.as_ref())
                .and_then(PriceCandidate::from_money),
            PriceSource::FirstVariant => product
                .variants
                .as_ref()
                .and_then(|variants| variants.first())
                .and_then(resolve_variant_price),
        }
    }
}

impl ImageSource {
    fn lookup(self, product: &RawProduct) -> Option<&RawImage> {
        let candidate = match self {
            ImageSource::FeaturedImage => product.featured_image.as_ref(),
            ImageSource::FirstImage => product.images.as_ref().and_then(|images| images.first()),
        };
        candidate.filter(|image| has_url(image))
    }
}

impl AvailabilitySource {
    fn lookup(self, variant: &RawVariant) -> Option<bool> {
        match self {
            AvailabilitySource::AvailableForSale => variant.available_for_sale,
            AvailabilitySource::Available => variant.available,
        }
    }
}

/// Resolves the product-level price, reporting which source matched.
#[must_use]
pub fn resolve_price(product: &RawProduct) -> Option<(PriceSource, PriceCandidate<'_>)> {
    PRICE_PRECEDENCE
        .iter()
        .find_map(|&source| source.lookup(product).map(|price| (source, price)))
}

/// Resolves a single variant's price from either price shape.
#[must_use]
pub fn resolve_variant_price(variant: &RawVariant) -> Option<PriceCandidate<'_>> {
    variant.price.as_ref().and_then(PriceCandidate::from_price)
}

/// Resolves the display image. `None` means "use a placeholder".
#[must_use]
pub fn resolve_image(product: &RawProduct) -> Option<&RawImage> {
    IMAGE_PRECEDENCE
        .iter()
        .find_map(|&source| source.lookup(product))
}

/// Resolves availability, defaulting to [`DEFAULT_AVAILABILITY`].
#[must_use]
pub fn resolve_availability(variant: &RawVariant) -> bool {
    AVAILABILITY_PRECEDENCE
        .iter()
        .find_map(|&source| source.lookup(variant))
        .unwrap_or(DEFAULT_AVAILABILITY)
}

/// An image is usable only if it has a non-blank URL.
pub(crate) fn has_url(image: &RawImage) -> bool {
    image.url.as_deref().is_some_and(|url| !url.trim().is_empty())
}
