//! Command handlers for the CLI.
//!
//! Every handler builds a fresh [`StorefrontClient`] from the loaded
//! configuration, so missing credentials fail here with a configuration
//! error before any request is made.

use anyhow::Context;
use storefront_core::{filter_by_tag, tag_categories, CanonicalProduct, UpstreamConfig};
use storefront_shopify::StorefrontClient;

const TITLE_WIDTH: usize = 40;

fn client(config: &UpstreamConfig) -> anyhow::Result<StorefrontClient> {
    StorefrontClient::new(config).context("failed to build storefront client")
}

/// Print the catalog, optionally filtered by tag.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the catalog fetch fails.
pub(crate) async fn run_catalog(
    config: &UpstreamConfig,
    tag: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let products = client(config)?.list_catalog().await?;
    let categories = tag_categories(&products);
    let products = filter_by_tag(products, tag);

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!(
            "no products found{}",
            tag.map(|t| format!(" tagged {t}")).unwrap_or_default()
        );
        return Ok(());
    }

    println!("{}", catalog_header());
    for product in &products {
        println!("{}", catalog_row(product));
    }
    println!();
    println!("categories: {}", categories.join(", "));

    Ok(())
}

/// Print one product by handle.
///
/// # Errors
///
/// Returns an error if the product does not exist or the fetch fails.
pub(crate) async fn run_product(
    config: &UpstreamConfig,
    handle: &str,
    json: bool,
) -> anyhow::Result<()> {
    let product = client(config)?
        .get_product(handle)
        .await?
        .ok_or_else(|| anyhow::anyhow!("product '{handle}' not found"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }

    println!("{} ({})", product.title, product.handle);
    println!("Price: {}", price_text(&product));
    if !product.tags.is_empty() {
        println!("Tags: {}", product.tags.join(", "));
    }
    if let Some(image) = product.primary_image() {
        println!("Image: {}", image.url);
    }
    println!();
    println!("{:<48}{:<20}{:<12}PRICE", "VARIANT", "TITLE", "AVAILABLE");
    for variant in &product.variants {
        println!(
            "{:<48}{:<20}{:<12}{}",
            variant.id,
            variant.title.as_deref().unwrap_or("\u{2014}"),
            if variant.available_for_sale { "yes" } else { "no" },
            variant
                .price
                .as_ref()
                .map_or_else(|| "\u{2014}".to_string(), ToString::to_string),
        );
    }

    Ok(())
}

/// Create a checkout and print its URL.
///
/// The URL is printed to stdout only; it is never logged.
///
/// # Errors
///
/// Returns an error if validation fails, the upstream rejects the cart, or
/// the request fails.
pub(crate) async fn run_checkout(
    config: &UpstreamConfig,
    variant_id: &str,
    quantity: i64,
) -> anyhow::Result<()> {
    let session = client(config)?
        .start_checkout(variant_id, quantity)
        .await
        .context("could not start checkout")?;
    println!("{}", session.checkout_url);
    Ok(())
}

/// Print configuration and connectivity status.
///
/// # Errors
///
/// Returns an error if the upstream probe fails.
pub(crate) async fn run_diag(config: &UpstreamConfig) -> anyhow::Result<()> {
    println!(
        "store domain: {}",
        config.store_domain.as_deref().unwrap_or("(not set)")
    );
    println!(
        "access token: {}",
        if config.access_token.is_some() {
            "present"
        } else {
            "missing"
        }
    );
    println!("api version:  {}", config.api_version);

    let client = client(config)?;
    println!("endpoint:     {}", client.endpoint());

    let probe = client.probe().await.context("upstream probe failed")?;
    println!(
        "shop:         {}",
        probe.shop_name.as_deref().unwrap_or("(unnamed)")
    );
    println!(
        "sample:       {}",
        probe.sample_handle.as_deref().unwrap_or("(no products)")
    );
    Ok(())
}

fn catalog_header() -> String {
    format!(
        "{:<40}{:<40}{:<14}{:<10}TAGS",
        "HANDLE", "TITLE", "PRICE", "IN STOCK"
    )
}

fn catalog_row(product: &CanonicalProduct) -> String {
    format!(
        "{:<40}{:<40}{:<14}{:<10}{}",
        product.handle,
        truncate(&product.title, TITLE_WIDTH - 2),
        price_text(product),
        if product.has_available_variants() || product.variants.is_empty() {
            "yes"
        } else {
            "no"
        },
        product.tags.join(", ")
    )
}

fn price_text(product: &CanonicalProduct) -> String {
    product
        .price_display
        .as_ref()
        .map_or_else(|| "\u{2014}".to_string(), ToString::to_string)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use storefront_core::{CanonicalVariant, Money};

    use super::*;

    fn product(price: Option<&str>, variants: Vec<CanonicalVariant>) -> CanonicalProduct {
        CanonicalProduct {
            id: "gid://shopify/Product/1".to_string(),
            title: "Boom Bap Nutrition Facts Tee".to_string(),
            handle: "boom-bap-nutrition-facts-tee".to_string(),
            description: None,
            product_type: None,
            tags: vec!["Featured".to_string(), "Shirts".to_string()],
            featured_image: None,
            images: vec![],
            variants,
            price_display: price.map(|p| Money {
                amount: Decimal::from_str(p).unwrap(),
                currency_code: "USD".to_string(),
            }),
        }
    }

    #[test]
    fn catalog_row_shows_price_and_tags() {
        let row = catalog_row(&product(Some("32.0"), vec![]));
        assert!(row.starts_with("boom-bap-nutrition-facts-tee"));
        assert!(row.contains("32.00 USD"));
        assert!(row.ends_with("Featured, Shirts"));
    }

    #[test]
    fn catalog_row_marks_missing_price_and_sold_out() {
        let sold_out = CanonicalVariant {
            id: "gid://shopify/ProductVariant/1".to_string(),
            title: None,
            available_for_sale: false,
            price: None,
        };
        let row = catalog_row(&product(None, vec![sold_out]));
        assert!(row.contains('\u{2014}'));
        assert!(row.contains(" no "));
    }

    #[test]
    fn truncate_long_titles() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long product title", 10), "a very ...");
    }
}
