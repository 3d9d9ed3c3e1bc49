//! Facet and price-range filters and their wire-parameter emission.
//!
//! A filter state is a value: `toggle` returns a new set rather than mutating
//! in place, so the surrounding session can swap its whole query state
//! wholesale on every change. Emission order is fixed (facet declaration
//! order, then insertion order within a facet) so that identical filter
//! states always serialize to byte-identical parameter lists.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::{fields, Param};

/// A named filter dimension offered by the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Brand,
    Color,
    Size,
}

impl Facet {
    /// Declaration order; drives parameter emission order.
    pub const ALL: [Facet; 3] = [Facet::Brand, Facet::Color, Facet::Size];

    /// The listing-service field this facet filters on.
    ///
    /// Color and size share one field: both are represented as variant
    /// "terms" server-side. That flattening is part of the wire contract,
    /// not a convenience.
    #[must_use]
    pub fn field(self) -> &'static str {
        match self {
            Facet::Brand => fields::MANUFACTURER_BRAND,
            Facet::Color | Facet::Size => fields::VARIANT_TERM,
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Facet::Brand => write!(f, "brand"),
            Facet::Color => write!(f, "color"),
            Facet::Size => write!(f, "size"),
        }
    }
}

/// One active `(facet, value)` selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetSelection {
    pub facet: Facet,
    pub value: String,
}

/// The ordered set of active facet selections.
///
/// Uniqueness is on the `(facet, value)` pair and is enforced by
/// [`FacetFilterSet::toggle`] itself; all facets are multi-select.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilterSet {
    selections: Vec<FacetSelection>,
}

impl FacetFilterSet {
    /// Flips membership of the `(facet, value)` pair: removes it when
    /// present, appends it otherwise. Two toggles of the same pair return
    /// the original set.
    #[must_use]
    pub fn toggle(mut self, facet: Facet, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(pos) = self
            .selections
            .iter()
            .position(|s| s.facet == facet && s.value == value)
        {
            self.selections.remove(pos);
        } else {
            self.selections.push(FacetSelection { facet, value });
        }
        self
    }

    #[must_use]
    pub fn contains(&self, facet: Facet, value: &str) -> bool {
        self.selections
            .iter()
            .any(|s| s.facet == facet && s.value == value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Active selections in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &FacetSelection> {
        self.selections.iter()
    }

    /// One parameter per active selection: brand selections first, then
    /// color, then size; insertion order within each facet.
    #[must_use]
    pub fn to_params(&self) -> Vec<Param> {
        let mut params = Vec::with_capacity(self.selections.len());
        for facet in Facet::ALL {
            for selection in self.selections.iter().filter(|s| s.facet == facet) {
                params.push(Param::new(facet.field(), selection.value.clone()));
            }
        }
        params
    }
}

/// Optional inclusive price interval, applied independently of facets.
///
/// Bounds are validated (decimal, non-negative) before they get here — see
/// [`parse_price_bound`]; emission trusts its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceRange {
    #[must_use]
    pub fn new(min: Option<Decimal>, max: Option<Decimal>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Emits each set bound against both the list-price and sale-price
    /// fields, so items on sale still match a shopper's list-price
    /// expectations. An unset bound emits nothing.
    #[must_use]
    pub fn to_params(&self) -> Vec<Param> {
        let mut params = Vec::with_capacity(4);
        if let Some(min) = self.min {
            params.push(Param::new(fields::LIST_PRICE_GTE, min.to_string()));
            params.push(Param::new(fields::SALE_PRICE_GTE, min.to_string()));
        }
        if let Some(max) = self.max {
            params.push(Param::new(fields::LIST_PRICE_LTE, max.to_string()));
            params.push(Param::new(fields::SALE_PRICE_LTE, max.to_string()));
        }
        params
    }
}

/// Rejected local input, caught before any request is built.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("price bound \"{raw}\" is not a decimal number")]
    NotANumber { raw: String },

    #[error("price bound \"{raw}\" is negative")]
    NegativePrice { raw: String },
}

/// Parses a user-entered price bound into a non-negative decimal.
///
/// # Errors
///
/// - [`FilterError::NotANumber`] if `raw` does not parse as a decimal.
/// - [`FilterError::NegativePrice`] if the parsed value is below zero.
pub fn parse_price_bound(raw: &str) -> Result<Decimal, FilterError> {
    let value: Decimal = raw.trim().parse().map_err(|_| FilterError::NotANumber {
        raw: raw.to_string(),
    })?;
    if value.is_sign_negative() {
        return Err(FilterError::NegativePrice {
            raw: raw.to_string(),
        });
    }
    Ok(value)
}
