pub mod config;
pub mod filter;
pub mod product;
pub mod query;
pub mod taxonomy;

mod app_config;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use filter::{parse_price_bound, Facet, FacetFilterSet, FacetSelection, FilterError, PriceRange};
pub use product::{ListingPage, Product};
pub use query::{build_params, CatalogQuery, Param, SortKey};
pub use taxonomy::{Breadcrumb, Category, CategoryGraph};
