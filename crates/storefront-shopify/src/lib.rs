pub mod client;
pub mod error;
pub mod normalize;
pub mod queries;
pub mod resolve;
pub mod types;

pub use client::{
    quantity_from_json, CheckoutLine, CheckoutSession, ShopProbe, StorefrontClient,
};
pub use error::{ErrorKind, StorefrontError};
pub use normalize::{normalize_product, normalize_product_with_handle};
pub use types::{RawProduct, RawVariant};
