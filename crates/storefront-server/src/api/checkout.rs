use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_shopify::{quantity_from_json, CheckoutLine, StorefrontError};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Accepts either a single variant or a list of cart lines:
///
/// - `{ "variantId": "gid://...", "quantity": 2 }` (quantity defaults to 1)
/// - `{ "lines": [{ "merchandiseId": "gid://...", "quantity": 1 }] }`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutRequest {
    variant_id: Option<String>,
    quantity: Option<Value>,
    lines: Option<Vec<CheckoutLineRequest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutLineRequest {
    merchandise_id: Option<String>,
    quantity: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CheckoutData {
    checkout_url: String,
}

pub(super) async fn create_checkout(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<CheckoutData>>, ApiError> {
    let Json(request) = body.map_err(|rejection| {
        ApiError::new(
            req_id.0.clone(),
            "validation_error",
            rejection.body_text(),
        )
    })?;
    let lines =
        checkout_lines(request).map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let client = state.client(&req_id.0)?;
    let session = client
        .create_checkout(&lines)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: CheckoutData {
            checkout_url: session.checkout_url,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Converts either request shape into checkout lines. Missing quantities
/// default to 1; range checks are left to the checkout itself.
fn checkout_lines(request: CheckoutRequest) -> Result<Vec<CheckoutLine>, StorefrontError> {
    if let Some(lines) = request.lines {
        return lines
            .into_iter()
            .map(|line| {
                Ok(CheckoutLine::new(
                    line.merchandise_id.unwrap_or_default(),
                    quantity_or_default(line.quantity.as_ref())?,
                ))
            })
            .collect();
    }

    match request.variant_id {
        Some(variant_id) => Ok(vec![CheckoutLine::new(
            variant_id,
            quantity_or_default(request.quantity.as_ref())?,
        )]),
        None => Err(StorefrontError::Validation {
            reason: "provide either variantId or lines".to_string(),
        }),
    }
}

fn quantity_or_default(quantity: Option<&Value>) -> Result<i64, StorefrontError> {
    match quantity {
        None | Some(Value::Null) => Ok(1),
        Some(value) => quantity_from_json(value),
    }
}
