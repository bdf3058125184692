use serde_json::json;
use storefront_core::UpstreamConfig;

use super::*;

#[test]
fn graphql_endpoint_from_origin() {
    let url = graphql_endpoint("https://boombapbars.myshopify.com", "2024-07").unwrap();
    assert_eq!(
        url.as_str(),
        "https://boombapbars.myshopify.com/api/2024-07/graphql.json"
    );
}

#[test]
fn graphql_endpoint_strips_trailing_slash() {
    let url = graphql_endpoint("http://127.0.0.1:4321/", "2024-07").unwrap();
    assert_eq!(url.as_str(), "http://127.0.0.1:4321/api/2024-07/graphql.json");
}

#[test]
fn graphql_endpoint_rejects_blank_version() {
    let err = graphql_endpoint("https://shop.example.com", " ").unwrap_err();
    assert!(
        matches!(err, StorefrontError::Configuration { .. }),
        "expected Configuration, got: {err:?}"
    );
}

#[test]
fn graphql_endpoint_rejects_relative_origin() {
    assert!(graphql_endpoint("not a url", "2024-07").is_err());
    assert!(graphql_endpoint("", "2024-07").is_err());
}

#[test]
fn store_origin_accepts_bare_and_schemed_domains() {
    assert_eq!(store_origin("shop.example.com"), "https://shop.example.com");
    assert_eq!(store_origin("https://shop.example.com/"), "https://shop.example.com");
    assert_eq!(store_origin(" http://shop.example.com "), "https://shop.example.com");
}

#[test]
fn new_builds_https_endpoint_from_store_domain() {
    let config = UpstreamConfig::new("boombapbars.myshopify.com", "token");
    let client = StorefrontClient::new(&config).unwrap();
    assert_eq!(
        client.endpoint().as_str(),
        "https://boombapbars.myshopify.com/api/2024-07/graphql.json"
    );
}

#[test]
fn new_without_domain_is_configuration_error() {
    let mut config = UpstreamConfig::new("shop.example.com", "token");
    config.store_domain = None;
    let err = StorefrontClient::new(&config).err().expect("should fail");
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
}

#[test]
fn new_without_token_is_configuration_error() {
    let mut config = UpstreamConfig::new("shop.example.com", "token");
    config.access_token = Some("   ".to_string());
    let err = StorefrontClient::new(&config).err().expect("should fail");
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    assert!(err.to_string().contains("SHOPIFY_STOREFRONT_TOKEN"));
}

#[test]
fn validate_lines_rejects_empty_list() {
    let err = validate_lines(&[]).unwrap_err();
    assert!(matches!(err, StorefrontError::Validation { .. }));
}

#[test]
fn validate_lines_rejects_out_of_range_quantities() {
    for quantity in [0, -1, i64::from(i32::MAX) + 1] {
        let lines = [CheckoutLine::new("gid://shopify/ProductVariant/1", quantity)];
        let err = validate_lines(&lines).unwrap_err();
        assert!(
            matches!(err, StorefrontError::Validation { .. }),
            "quantity {quantity} should be rejected, got: {err:?}"
        );
    }
}

#[test]
fn validate_lines_accepts_bounds() {
    let lines = [
        CheckoutLine::new("gid://shopify/ProductVariant/1", 1),
        CheckoutLine::new("gid://shopify/ProductVariant/2", i64::from(i32::MAX)),
    ];
    assert!(validate_lines(&lines).is_ok());
}

#[test]
fn validate_lines_rejects_blank_variant() {
    let lines = [CheckoutLine::new("  ", 1)];
    let err = validate_lines(&lines).unwrap_err();
    assert!(err.to_string().contains("variant id"));
}

#[test]
fn quantity_from_json_accepts_integers_only() {
    assert_eq!(quantity_from_json(&json!(3)).unwrap(), 3);
    assert_eq!(quantity_from_json(&json!(-1)).unwrap(), -1);
    assert!(quantity_from_json(&json!(1.5)).is_err());
    assert!(quantity_from_json(&json!("2")).is_err());
    assert!(quantity_from_json(&json!(null)).is_err());
    assert!(quantity_from_json(&json!(u64::MAX)).is_err());
}

#[test]
fn checkout_session_debug_redacts_url_and_cart() {
    let session = CheckoutSession {
        cart_id: Some("gid://shopify/Cart/c1-abc".to_string()),
        checkout_url: "https://shop.example.com/cart/c/c1-abc?key=secret".to_string(),
    };
    let rendered = format!("{session:?}");
    assert!(!rendered.contains("secret"));
    assert!(!rendered.contains("c1-abc"));
    assert!(rendered.contains("[redacted]"));
}
