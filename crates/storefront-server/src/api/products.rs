use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_core::{filter_by_tag, tag_categories, CanonicalProduct, ALL_CATEGORY};

use crate::middleware::RequestId;

use super::{map_storefront_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct CatalogData {
    products: Vec<CanonicalProduct>,
    /// `"All"` followed by every tag in the unfiltered catalog, first-seen order.
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CatalogQuery {
    pub tag: Option<String>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogData>>, ApiError> {
    let client = state.client(&req_id.0)?;
    let products = client
        .list_catalog()
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let categories = std::iter::once(ALL_CATEGORY.to_string())
        .chain(tag_categories(&products))
        .collect();
    let tag = query.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let products = filter_by_tag(products, tag);

    Ok(Json(ApiResponse {
        data: CatalogData {
            products,
            categories,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<CanonicalProduct>>, ApiError> {
    let client = state.client(&req_id.0)?;
    let product = client
        .get_product(&handle)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product {handle} not found"),
            )
        })?;

    Ok(Json(ApiResponse {
        data: product,
        meta: ResponseMeta::new(req_id.0),
    }))
}
