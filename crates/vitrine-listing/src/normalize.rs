//! Normalization from listing-service wire shapes to `vitrine_core` types.
//!
//! Price strings are parsed into `Decimal` here, at the boundary, so the
//! rest of the crate never sees money as text.

use rust_decimal::Decimal;
use vitrine_core::{Category, Product};

use crate::types::{CategoryRecord, ProductRecord};

/// Converts a wire [`ProductRecord`] into a [`Product`].
///
/// # Errors
///
/// Returns a human-readable reason if a price string does not parse as a
/// decimal. Callers skip the record and keep the rest of the page.
pub fn normalize_product(record: ProductRecord) -> Result<Product, String> {
    let list_price: Decimal = record
        .list_price
        .parse()
        .map_err(|e| format!("list price \"{}\" is not a decimal: {e}", record.list_price))?;

    let sale_price = record
        .sale_price
        .as_deref()
        .map(|raw| {
            raw.parse::<Decimal>()
                .map_err(|e| format!("sale price \"{raw}\" is not a decimal: {e}"))
        })
        .transpose()?;

    Ok(Product {
        id: record.id,
        slug: record.slug,
        name: record.name,
        description: record.description,
        brand: record.brand,
        image_url: record.image_url,
        list_price,
        sale_price,
        created_at: record.created_at,
        variant_terms: record.variant_terms,
    })
}

/// Converts a wire [`CategoryRecord`] into a [`Category`].
#[must_use]
pub fn normalize_category(record: CategoryRecord) -> Category {
    Category {
        id: record.id,
        slug: record.slug,
        name: record.name,
        description: record.description,
        parent_slug: record.parent_slug,
        image_url: record.image_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(list_price: &str, sale_price: Option<&str>) -> ProductRecord {
        ProductRecord {
            id: "p-1".to_string(),
            slug: "oxford-shirt".to_string(),
            name: "Oxford Shirt".to_string(),
            description: None,
            brand: Some("Acme".to_string()),
            image_url: None,
            list_price: list_price.to_string(),
            sale_price: sale_price.map(str::to_string),
            created_at: None,
            variant_terms: vec!["White".to_string()],
        }
    }

    #[test]
    fn normalize_product_parses_prices() {
        let product = normalize_product(record("49.95", Some("39.95"))).expect("valid record");
        assert_eq!(product.list_price.to_string(), "49.95");
        assert_eq!(product.sale_price.map(|p| p.to_string()).as_deref(), Some("39.95"));
    }

    #[test]
    fn normalize_product_without_sale_price() {
        let product = normalize_product(record("10.00", None)).expect("valid record");
        assert!(product.sale_price.is_none());
    }

    #[test]
    fn normalize_product_rejects_malformed_list_price() {
        let err = normalize_product(record("free", None)).expect_err("should reject");
        assert!(err.contains("list price"), "unexpected reason: {err}");
    }

    #[test]
    fn normalize_product_rejects_malformed_sale_price() {
        let err = normalize_product(record("10.00", Some("cheap"))).expect_err("should reject");
        assert!(err.contains("sale price"), "unexpected reason: {err}");
    }

    #[test]
    fn normalize_category_maps_all_fields() {
        let category = normalize_category(CategoryRecord {
            id: "c-9".to_string(),
            slug: "mens-shirts".to_string(),
            name: "Shirts".to_string(),
            description: Some("All shirts".to_string()),
            parent_slug: Some("mens".to_string()),
            image_url: None,
        });
        assert_eq!(category.slug, "mens-shirts");
        assert_eq!(category.parent_slug.as_deref(), Some("mens"));
    }
}
