//! Listing-service response types.
//!
//! The service returns camelCase JSON. Prices travel as decimal strings
//! (`"49.95"`), never floats; `createdAt` is RFC 3339. Product entries
//! inside the `items` array are kept as raw `serde_json::Value`s so one
//! malformed record can be skipped without failing the whole page —
//! callers deserialize each entry individually via [`ProductRecord`].

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Top-level envelope from `GET /products`.
#[derive(Debug, Deserialize)]
pub struct ProductsEnvelope {
    pub items: Vec<serde_json::Value>,
    /// Total number of products matching the query, across all pages.
    pub count: i64,
}

/// A single product entry from the listing grid.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Listing-service product ID; a string to avoid precision loss.
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Decimal string, e.g. `"49.95"`.
    pub list_price: String,
    /// Decimal string; `null` or absent when the product is not on sale.
    #[serde(default)]
    pub sale_price: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Variant term names (color and size values).
    #[serde(default)]
    pub variant_terms: Vec<String>,
}

/// Top-level envelope from `GET /categories`.
#[derive(Debug, Deserialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<serde_json::Value>,
}

/// A single category from the bulk category fetch.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Slug of the parent category; absent for roots.
    #[serde(default)]
    pub parent_slug: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}
