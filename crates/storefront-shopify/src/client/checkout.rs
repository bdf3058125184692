//! Cart creation and hand-off to the hosted checkout.

use reqwest::Url;
use serde_json::{json, Value};

use super::StorefrontClient;
use crate::error::StorefrontError;
use crate::queries::{CART_CREATE_MUTATION, CART_CREATE_OPERATION};
use crate::types::{CartCreateData, RawUserError};

/// Largest quantity the upstream `Int` type can carry (`i32::MAX`).
const MAX_QUANTITY: i64 = 2_147_483_647;

/// One line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutLine {
    /// Variant identifier, sent upstream as `merchandiseId`.
    pub variant_id: String,
    pub quantity: i64,
}

impl CheckoutLine {
    #[must_use]
    pub fn new(variant_id: impl Into<String>, quantity: i64) -> Self {
        Self {
            variant_id: variant_id.into(),
            quantity,
        }
    }
}

/// A created cart and the hosted checkout URL to redirect the shopper to.
///
/// The URL is a per-shopper credential; `Debug` does not print it.
#[derive(Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub cart_id: Option<String>,
    pub checkout_url: String,
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("cart_id", &self.cart_id.as_ref().map(|_| "[redacted]"))
            .field("checkout_url", &"[redacted]")
            .finish()
    }
}

impl StorefrontClient {
    /// Creates a cart for `lines` and returns its checkout URL.
    ///
    /// Input is validated before any network call. The call is made once;
    /// a failed attempt is reported, never retried.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::Validation`] for an empty line list, a blank
    ///   variant id, or a quantity outside `1..=i32::MAX`.
    /// - [`StorefrontError::Rejection`] if the upstream returns `userErrors`,
    ///   whether or not a cart came back with them.
    /// - [`StorefrontError::MissingCheckoutUrl`] if the cart has no absolute
    ///   `http(s)` checkout URL.
    /// - Transport and GraphQL-level failures as for catalog queries.
    pub async fn create_checkout(
        &self,
        lines: &[CheckoutLine],
    ) -> Result<CheckoutSession, StorefrontError> {
        validate_lines(lines)?;

        let lines_json: Vec<Value> = lines
            .iter()
            .map(|line| {
                json!({
                    "merchandiseId": line.variant_id.trim(),
                    "quantity": line.quantity,
                })
            })
            .collect();

        let data: CartCreateData = self
            .execute(
                CART_CREATE_OPERATION,
                CART_CREATE_MUTATION,
                json!({ "lines": lines_json }),
            )
            .await?;

        let Some(payload) = data.cart_create else {
            return Err(StorefrontError::MissingCheckoutUrl);
        };

        let user_errors = payload.user_errors.unwrap_or_default();
        if !user_errors.is_empty() {
            let messages: Vec<String> = user_errors.iter().map(user_error_message).collect();
            let fields: Vec<String> = user_errors
                .iter()
                .filter_map(|e| e.field.as_ref().map(|path| path.join(".")))
                .collect();
            tracing::warn!(
                lines = lines.len(),
                errors = ?messages,
                ?fields,
                "storefront rejected checkout"
            );
            return Err(StorefrontError::Rejection { messages });
        }

        let cart = payload.cart.ok_or(StorefrontError::MissingCheckoutUrl)?;
        let checkout_url = cart
            .checkout_url
            .as_deref()
            .and_then(absolute_http_url)
            .ok_or(StorefrontError::MissingCheckoutUrl)?;

        tracing::info!(lines = lines.len(), "checkout created");
        Ok(CheckoutSession {
            cart_id: cart.id,
            checkout_url,
        })
    }

    /// Single-line convenience over [`StorefrontClient::create_checkout`].
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontClient::create_checkout`].
    pub async fn start_checkout(
        &self,
        variant_id: &str,
        quantity: i64,
    ) -> Result<CheckoutSession, StorefrontError> {
        self.create_checkout(&[CheckoutLine::new(variant_id, quantity)])
            .await
    }
}

/// Checks every line before the upstream sees it.
pub(super) fn validate_lines(lines: &[CheckoutLine]) -> Result<(), StorefrontError> {
    if lines.is_empty() {
        return Err(StorefrontError::validation(
            "checkout needs at least one line item",
        ));
    }
    for line in lines {
        if line.variant_id.trim().is_empty() {
            return Err(StorefrontError::validation("variant id must not be empty"));
        }
        if line.quantity < 1 {
            return Err(StorefrontError::validation(format!(
                "quantity must be at least 1, got {}",
                line.quantity
            )));
        }
        if line.quantity > MAX_QUANTITY {
            return Err(StorefrontError::validation(format!(
                "quantity must not exceed {MAX_QUANTITY}, got {}",
                line.quantity
            )));
        }
    }
    Ok(())
}

/// Reads a quantity from loosely-typed JSON input.
///
/// Only JSON integers are accepted; range checks happen at checkout.
///
/// # Errors
///
/// Returns [`StorefrontError::Validation`] for fractions, strings, `null`,
/// and integers beyond `i64`.
pub fn quantity_from_json(value: &Value) -> Result<i64, StorefrontError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            StorefrontError::validation(format!("quantity must be a whole number, got {n}"))
        }),
        other => Err(StorefrontError::validation(format!(
            "quantity must be a whole number, got {other}"
        ))),
    }
}

fn user_error_message(error: &RawUserError) -> String {
    error
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or("checkout was rejected")
        .to_owned()
}

fn absolute_http_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let url = Url::parse(raw).ok()?;
    let usable = matches!(url.scheme(), "http" | "https") && url.host_str().is_some();
    usable.then(|| raw.to_owned())
}
