mod checkout;
mod diag;
mod products;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::UpstreamConfig;
use storefront_shopify::{ErrorKind, StorefrontClient, StorefrontError};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared handler state.
///
/// The server starts even without upstream credentials so that `/api/health`
/// and `/api/diag` can report the problem; storefront routes then answer
/// `configuration_error`.
#[derive(Clone)]
pub struct AppState {
    pub storefront: Result<Arc<StorefrontClient>, Arc<str>>,
    pub upstream: Arc<UpstreamConfig>,
}

impl AppState {
    pub fn from_config(upstream: &UpstreamConfig) -> Self {
        let storefront = match StorefrontClient::new(upstream) {
            Ok(client) => {
                tracing::info!(endpoint = %client.endpoint(), "storefront client ready");
                Ok(Arc::new(client))
            }
            Err(e) => {
                tracing::warn!(error = %e, "storefront client unavailable");
                Err(Arc::from(e.to_string()))
            }
        };
        Self {
            storefront,
            upstream: Arc::new(upstream.clone()),
        }
    }

    /// Returns the upstream client, or a `configuration_error` response.
    pub(super) fn client(&self, request_id: &str) -> Result<&StorefrontClient, ApiError> {
        match &self.storefront {
            Ok(client) => Ok(client.as_ref()),
            Err(reason) => Err(ApiError::new(
                request_id,
                "configuration_error",
                reason.to_string(),
            )),
        }
    }

    fn is_configured(&self) -> bool {
        self.storefront.is_ok()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    upstream: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

/// HTTP status for an error code.
pub(super) fn status_for(code: &str) -> StatusCode {
    match code {
        "not_found" => StatusCode::NOT_FOUND,
        "validation_error" => StatusCode::BAD_REQUEST,
        "checkout_rejected" => StatusCode::UNPROCESSABLE_ENTITY,
        "upstream_unavailable" | "upstream_error" => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (status_for(&self.error.code), Json(self)).into_response()
    }
}

/// Maps an upstream failure onto the error code and message shown to callers.
///
/// Upstream payloads and transport details are logged, never returned.
pub(super) fn error_body(error: &StorefrontError) -> ErrorBody {
    let (code, message) = match error.kind() {
        ErrorKind::Configuration => {
            tracing::error!(error = %error, "storefront is misconfigured");
            ("configuration_error", error.to_string())
        }
        ErrorKind::Transport => {
            tracing::warn!(error = %error, "storefront upstream unavailable");
            (
                "upstream_unavailable",
                "storefront upstream is unavailable, try again later".to_string(),
            )
        }
        ErrorKind::Upstream => {
            tracing::warn!(error = %error, "storefront upstream reported an error");
            (
                "upstream_error",
                "storefront upstream reported an error".to_string(),
            )
        }
        ErrorKind::Rejection => (
            "checkout_rejected",
            format!("could not start checkout: {error}"),
        ),
        ErrorKind::Validation => ("validation_error", error.to_string()),
    };
    ErrorBody {
        code: code.to_string(),
        message,
    }
}

pub(super) fn map_storefront_error(request_id: String, error: &StorefrontError) -> ApiError {
    let body = error_body(error);
    ApiError::new(request_id, body.code, body.message)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{handle}", get(products::get_product))
        .route("/api/checkout", post(checkout::create_checkout))
        .route("/api/diag", get(diag::diagnostics))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                ))
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            upstream: if state.is_configured() {
                "configured"
            } else {
                "unconfigured"
            },
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use storefront_core::UpstreamConfig;
    use storefront_shopify::StorefrontClient;
    use tower::ServiceExt;
    use wiremock::MockServer;

    use super::{build_app, AppState};

    pub(crate) const GRAPHQL_PATH: &str = "/api/2024-07/graphql.json";

    /// State whose client talks to `server`.
    pub(crate) fn mock_state(server: &MockServer) -> AppState {
        let mut config = UpstreamConfig::new("boombapbars.myshopify.com", "test-token");
        config.request_timeout_secs = 5;
        let client = StorefrontClient::with_base_url(&config, &server.uri())
            .expect("failed to build test StorefrontClient");
        AppState {
            storefront: Ok(Arc::new(client)),
            upstream: Arc::new(config),
        }
    }

    /// State as the server builds it with no credentials configured.
    pub(crate) fn unconfigured_state() -> AppState {
        let mut config = UpstreamConfig::new("", "");
        config.store_domain = None;
        config.access_token = None;
        AppState::from_config(&config)
    }

    pub(crate) async fn send(
        state: AppState,
        request: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let response = build_app(state).oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).expect("json parse")
        };
        (status, headers, json)
    }

    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    pub(crate) fn post_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }
}
