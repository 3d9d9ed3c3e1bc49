use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product as rendered in the listing grid, normalized from the listing
/// service's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Listing-service product ID, stored as a string to avoid precision loss.
    pub id: String,
    /// URL slug, e.g. `"oxford-shirt-white"`.
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub image_url: Option<String>,
    pub list_price: Decimal,
    /// Discounted price, if the product is currently on sale.
    pub sale_price: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
    /// Variant term names (color and size values) attached to the product.
    pub variant_terms: Vec<String>,
}

impl Product {
    /// The price a shopper pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.list_price)
    }

    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price.is_some_and(|sale| sale < self.list_price)
    }
}

/// One page of listing results together with the total match count the
/// service reports for the whole query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingPage {
    pub items: Vec<Product>,
    pub count: i64,
}
