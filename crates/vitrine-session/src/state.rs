//! Catalog query state transitions.
//!
//! All filter/sort/page/search state lives in one immutable
//! [`CatalogQuery`] value; every inbound UI event produces a fresh value via
//! [`apply_event`] and the old one is discarded. No field is ever mutated in
//! place, so any request the session dispatches can be traced back to
//! exactly one state value.

use rust_decimal::Decimal;
use vitrine_core::{CatalogQuery, Facet, SortKey};

/// An inbound event from the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The route moved to a category page. Filters and search belong to the
    /// previous browse context and are reset; the sort preference is kept.
    CategoryRouted { slug: String, page: u32 },
    FacetToggled { facet: Facet, value: String },
    /// Price bounds are already parsed and validated non-negative decimals;
    /// invalid input is rejected at the edge and never produces an event.
    PriceCommitted {
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    SortChanged(SortKey),
    /// Explicit page navigation, 1-based.
    PageChanged(u32),
    /// The search input changed (keystroke or clear).
    SearchEdited(String),
}

/// Builds the successor query state for `event`.
///
/// Any change that alters which products match (facet toggle, price
/// commit, sort change, search edit) resets the page to 1, since the old
/// page number referred to a listing that no longer exists. Explicit page
/// navigation and category routing carry their own page.
#[must_use]
pub fn apply_event(query: &CatalogQuery, event: &SessionEvent) -> CatalogQuery {
    let mut next = query.clone();
    match event {
        SessionEvent::CategoryRouted { slug, page } => {
            next = CatalogQuery::new(slug.clone(), query.page_size);
            next.sort = query.sort;
            next.page = (*page).max(1);
        }
        SessionEvent::FacetToggled { facet, value } => {
            next.facets = next.facets.toggle(*facet, value.clone());
            next.page = 1;
        }
        SessionEvent::PriceCommitted { min, max } => {
            next.price.min = *min;
            next.price.max = *max;
            next.page = 1;
        }
        SessionEvent::SortChanged(sort) => {
            next.sort = *sort;
            next.page = 1;
        }
        SessionEvent::PageChanged(page) => {
            next.page = (*page).max(1);
        }
        SessionEvent::SearchEdited(text) => {
            next.search = if text.is_empty() {
                None
            } else {
                Some(text.clone())
            };
            next.page = 1;
        }
    }
    next
}
