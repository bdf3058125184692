//! Storefront API endpoint construction.

use reqwest::Url;

use crate::error::StorefrontError;

/// Builds `{base}/api/{api_version}/graphql.json`.
///
/// `base` is a scheme+host origin; a trailing slash is tolerated.
pub(super) fn graphql_endpoint(base: &str, api_version: &str) -> Result<Url, StorefrontError> {
    let api_version = api_version.trim();
    if api_version.is_empty() || api_version.contains('/') {
        return Err(StorefrontError::configuration(format!(
            "invalid API version \"{api_version}\""
        )));
    }

    let raw = format!(
        "{}/api/{api_version}/graphql.json",
        base.trim().trim_end_matches('/')
    );
    let url = Url::parse(&raw).map_err(|e| {
        StorefrontError::configuration(format!("invalid storefront endpoint \"{raw}\": {e}"))
    })?;
    if url.host_str().is_none() {
        return Err(StorefrontError::configuration(format!(
            "storefront endpoint \"{raw}\" has no host"
        )));
    }
    Ok(url)
}

/// Turns a configured store domain into an `https://` origin.
///
/// Accepts `"shop.example.com"` as well as `"https://shop.example.com/"`.
pub(super) fn store_origin(store_domain: &str) -> String {
    let host = store_domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');
    format!("https://{host}")
}
