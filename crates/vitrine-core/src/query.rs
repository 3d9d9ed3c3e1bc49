//! Deterministic construction of listing-service request parameters.
//!
//! [`build_params`] is a pure function over one immutable [`CatalogQuery`]
//! value. The emission order is fixed — pagination, sort, facets, price,
//! search — so two builds from the same logical state are byte-identical,
//! which callers rely on for caching and tests rely on for equality checks.

use serde::{Deserialize, Serialize};

use crate::filter::{FacetFilterSet, PriceRange};

/// Field names understood by the listing service.
pub mod fields {
    pub const LIMIT: &str = "limit";
    pub const PAGE: &str = "page";
    pub const SORT: &str = "sort";
    /// Brand facet filters match the manufacturer brand field.
    pub const MANUFACTURER_BRAND: &str = "manufacturer.brand";
    /// Color and size facet filters both match variant term names.
    pub const VARIANT_TERM: &str = "variants.term.name";
    pub const LIST_PRICE_GTE: &str = "listPrice.gte";
    pub const SALE_PRICE_GTE: &str = "salePrice.gte";
    pub const LIST_PRICE_LTE: &str = "listPrice.lte";
    pub const SALE_PRICE_LTE: &str = "salePrice.lte";
    pub const SEARCH: &str = "q";
}

/// One `key=value` request parameter. Keys are always static field names
/// from [`fields`]; values are owned strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: &'static str,
    pub value: String,
}

impl Param {
    #[must_use]
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for Param {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The closed set of sort orders the listing service understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NewestFirst,
    OldestFirst,
    PriceHighToLow,
    PriceLowToHigh,
}

impl SortKey {
    /// The sort expression sent on the wire.
    #[must_use]
    pub fn expression(self) -> &'static str {
        match self {
            SortKey::NewestFirst => "-createdAt",
            SortKey::OldestFirst => "createdAt",
            SortKey::PriceHighToLow => "-price",
            SortKey::PriceLowToHigh => "price",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::NewestFirst => write!(f, "newest"),
            SortKey::OldestFirst => write!(f, "oldest"),
            SortKey::PriceHighToLow => write!(f, "price-desc"),
            SortKey::PriceLowToHigh => write!(f, "price-asc"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortKey::NewestFirst),
            "oldest" => Ok(SortKey::OldestFirst),
            "price-desc" => Ok(SortKey::PriceHighToLow),
            "price-asc" => Ok(SortKey::PriceLowToHigh),
            other => Err(format!(
                "unknown sort key \"{other}\" (expected newest, oldest, price-desc, or price-asc)"
            )),
        }
    }
}

/// The complete, immutable query state of a catalog view.
///
/// Replaced wholesale on every change (facet toggle, price commit, sort or
/// page change, search edit) rather than mutated field by field, so any
/// parameter list can be traced back to exactly one state value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Route context; carried by the surrounding route, not emitted as a
    /// query parameter.
    pub category_slug: String,
    pub facets: FacetFilterSet,
    pub price: PriceRange,
    pub sort: SortKey,
    /// 1-based.
    pub page: u32,
    pub page_size: u32,
    /// Active free-text search, if any. `None` and `Some("")` both mean
    /// the default unfiltered listing.
    pub search: Option<String>,
}

impl CatalogQuery {
    /// A fresh first-page query for a category with no filters active.
    #[must_use]
    pub fn new(category_slug: impl Into<String>, page_size: u32) -> Self {
        Self {
            category_slug: category_slug.into(),
            facets: FacetFilterSet::default(),
            price: PriceRange::default(),
            sort: SortKey::default(),
            page: 1,
            page_size,
            search: None,
        }
    }
}

/// Builds the ordered parameter list for one listing request.
///
/// Emission order: `limit`, `page`, `sort`, facet parameters, price
/// parameters, then `q` when a non-empty search text is active. An empty
/// facet set and an unset price range still produce the pagination and sort
/// parameters — never an empty request.
#[must_use]
pub fn build_params(query: &CatalogQuery) -> Vec<Param> {
    let mut params = vec![
        Param::new(fields::LIMIT, query.page_size.to_string()),
        Param::new(fields::PAGE, query.page.to_string()),
        Param::new(fields::SORT, query.sort.expression()),
    ];
    params.extend(query.facets.to_params());
    params.extend(query.price.to_params());
    if let Some(text) = query.search.as_deref() {
        if !text.is_empty() {
            params.push(Param::new(fields::SEARCH, text));
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::filter::Facet;

    fn dec(s: &str) -> Decimal {
        s.parse().expect("test literal is a valid decimal")
    }

    fn full_query() -> CatalogQuery {
        let mut query = CatalogQuery::new("mens-shirts", 12);
        query.facets = query
            .facets
            .toggle(Facet::Color, "Red")
            .toggle(Facet::Brand, "Acme")
            .toggle(Facet::Size, "M");
        query.price = PriceRange::new(Some(dec("10")), Some(dec("80")));
        query.sort = SortKey::PriceLowToHigh;
        query.page = 3;
        query.search = Some("oxford".to_string());
        query
    }

    #[test]
    fn build_params_uses_the_fixed_emission_order() {
        let params = build_params(&full_query());
        let keys: Vec<&str> = params.iter().map(|p| p.key).collect();
        assert_eq!(
            keys,
            vec![
                fields::LIMIT,
                fields::PAGE,
                fields::SORT,
                fields::MANUFACTURER_BRAND,
                fields::VARIANT_TERM,
                fields::VARIANT_TERM,
                fields::LIST_PRICE_GTE,
                fields::SALE_PRICE_GTE,
                fields::LIST_PRICE_LTE,
                fields::SALE_PRICE_LTE,
                fields::SEARCH,
            ]
        );
    }

    #[test]
    fn build_params_is_deterministic() {
        let query = full_query();
        assert_eq!(build_params(&query), build_params(&query));
    }

    #[test]
    fn identical_logical_states_build_identical_params() {
        let a = full_query();
        let b = full_query();
        assert_eq!(build_params(&a), build_params(&b));
    }

    #[test]
    fn empty_filters_still_produce_pagination_and_sort() {
        let query = CatalogQuery::new("mens", 24);
        let params = build_params(&query);
        let pairs: Vec<(&str, &str)> = params.iter().map(|p| (p.key, p.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                (fields::LIMIT, "24"),
                (fields::PAGE, "1"),
                (fields::SORT, "-createdAt"),
            ]
        );
    }

    #[test]
    fn empty_search_text_is_treated_as_no_search() {
        let mut query = CatalogQuery::new("mens", 12);
        query.search = Some(String::new());
        assert!(build_params(&query).iter().all(|p| p.key != fields::SEARCH));
    }

    #[test]
    fn category_is_route_context_not_a_parameter() {
        let params = build_params(&CatalogQuery::new("mens-shirts", 12));
        assert!(params.iter().all(|p| p.value != "mens-shirts"));
    }

    #[test]
    fn sort_keys_round_trip_through_from_str() {
        for key in [
            SortKey::NewestFirst,
            SortKey::OldestFirst,
            SortKey::PriceHighToLow,
            SortKey::PriceLowToHigh,
        ] {
            let parsed: SortKey = key.to_string().parse().expect("display output parses");
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        assert!("cheapest".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_expressions_match_the_wire_contract() {
        assert_eq!(SortKey::NewestFirst.expression(), "-createdAt");
        assert_eq!(SortKey::OldestFirst.expression(), "createdAt");
        assert_eq!(SortKey::PriceHighToLow.expression(), "-price");
        assert_eq!(SortKey::PriceLowToHigh.expression(), "price");
    }
}
