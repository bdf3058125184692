use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Serialize;
use storefront_shopify::ShopProbe;

use crate::middleware::RequestId;

use super::{error_body, status_for, ApiResponse, AppState, ErrorBody, ResponseMeta};

/// Upstream connectivity report. Credentials are reported by presence only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DiagData {
    store_domain: Option<String>,
    token_present: bool,
    api_version: String,
    configured: bool,
    probe: Option<ShopProbe>,
    error: Option<ErrorBody>,
}

/// Always returns the report. The status follows the error code when the
/// probe failed or credentials are missing.
pub(super) async fn diagnostics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<DiagData>>) {
    let upstream = &state.upstream;
    let (probe, error) = match state.client(&req_id.0) {
        Ok(client) => match client.probe().await {
            Ok(probe) => (Some(probe), None),
            Err(e) => (None, Some(error_body(&e))),
        },
        Err(api_error) => (None, Some(api_error.error)),
    };

    let status = error
        .as_ref()
        .map_or(StatusCode::OK, |body| status_for(&body.code));

    let body = Json(ApiResponse {
        data: DiagData {
            store_domain: upstream.store_domain.clone(),
            token_present: upstream.access_token.is_some(),
            api_version: upstream.api_version.clone(),
            configured: state.storefront.is_ok(),
            probe,
            error,
        },
        meta: ResponseMeta::new(req_id.0),
    });
    (status, body)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::test_support::{get, mock_state, send, unconfigured_state};

    #[tokio::test]
    async fn diag_reports_probe_without_leaking_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("X-Shopify-Storefront-Access-Token", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "shop": { "name": "Boom Bap Bars" },
                    "products": { "edges": [{ "node": { "id": "gid://shopify/Product/1", "title": "Tee", "handle": "facts-tee" } }] }
                }
            })))
            .mount(&server)
            .await;

        let (status, _, json) = send(mock_state(&server), get("/api/diag")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["configured"], true);
        assert_eq!(json["data"]["tokenPresent"], true);
        assert_eq!(json["data"]["probe"]["shopName"], "Boom Bap Bars");
        assert_eq!(json["data"]["probe"]["sampleHandle"], "facts-tee");
        assert!(json["data"]["error"].is_null());
        assert!(!json.to_string().contains("test-token"));
    }

    #[tokio::test]
    async fn diag_reports_upstream_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let (status, _, json) = send(mock_state(&server), get("/api/diag")).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(json["data"]["probe"].is_null());
        assert_eq!(json["data"]["error"]["code"], "upstream_unavailable");
    }

    #[tokio::test]
    async fn diag_reports_missing_credentials() {
        let (status, _, json) = send(unconfigured_state(), get("/api/diag")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["data"]["configured"], false);
        assert_eq!(json["data"]["tokenPresent"], false);
        assert_eq!(json["data"]["error"]["code"], "configuration_error");
    }
}
