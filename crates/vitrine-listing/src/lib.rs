pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

mod retry;

pub use client::ListingClient;
pub use error::ListingError;
pub use normalize::{normalize_category, normalize_product};
pub use types::{CategoriesEnvelope, CategoryRecord, ProductRecord, ProductsEnvelope};
