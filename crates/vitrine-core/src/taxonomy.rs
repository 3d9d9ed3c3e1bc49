//! Category taxonomy: a flat list of categories linked by parent slug.
//!
//! The category tree arrives from the listing service as a flat list where
//! each record names its parent by slug. Parent/child relationships are
//! resolved by lookup inside one owned collection — never by embedded
//! references between records — so the graph can be rebuilt wholesale from
//! any bulk fetch. Well-formed data is a forest, but every traversal is
//! bounded by a visited set so malformed data with a parent cycle still
//! terminates.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A single category in the storefront taxonomy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    /// URL-safe unique identifier, e.g. `"mens-shirts"`.
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    /// Slug of the parent category; `None` for root categories.
    pub parent_slug: Option<String>,
    pub image_url: Option<String>,
}

/// One-level navigation view around a category: parent, the category itself,
/// and its immediate children.
#[derive(Debug)]
pub struct Breadcrumb<'a> {
    /// `None` when the category is a root.
    pub parent: Option<&'a Category>,
    pub current: &'a Category,
    /// Every category whose parent is `current`, in load order.
    pub children: Vec<&'a Category>,
}

/// The loaded category set with slug-indexed hierarchy queries.
#[derive(Debug, Clone, Default)]
pub struct CategoryGraph {
    categories: Vec<Category>,
    by_slug: HashMap<String, usize>,
}

impl CategoryGraph {
    /// Builds a graph from a bulk-fetched category list.
    ///
    /// Load order is preserved; it determines the discovery order of
    /// [`CategoryGraph::descendants_of`] and the order of breadcrumb
    /// children. If two records share a slug the first one wins and the
    /// duplicate is dropped.
    #[must_use]
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let mut kept = Vec::with_capacity(categories.len());
        let mut by_slug = HashMap::with_capacity(categories.len());
        for category in categories {
            if by_slug.contains_key(&category.slug) {
                tracing::warn!(slug = %category.slug, "duplicate category slug — keeping the first record");
                continue;
            }
            by_slug.insert(category.slug.clone(), kept.len());
            kept.push(category);
        }
        Self {
            categories: kept,
            by_slug,
        }
    }

    /// Looks up a category by slug.
    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.by_slug.get(slug).map(|&i| &self.categories[i])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// All categories, in load order.
    #[must_use]
    pub fn all(&self) -> &[Category] {
        &self.categories
    }

    /// Immediate children of `slug`, in load order.
    #[must_use]
    pub fn children_of(&self, slug: &str) -> Vec<&Category> {
        self.categories
            .iter()
            .filter(|c| c.parent_slug.as_deref() == Some(slug))
            .collect()
    }

    /// Every transitive descendant of any slug in `roots`, in breadth-first
    /// discovery order, duplicate-free. The roots themselves are excluded.
    ///
    /// Each pass collects the categories whose parent is in the current
    /// frontier, then advances the frontier to the newly found slugs; a slug
    /// already collected is never revisited, so a parent cycle in malformed
    /// data cannot loop. Unknown root slugs contribute nothing.
    #[must_use]
    pub fn descendants_of(&self, roots: &[&str]) -> Vec<&Category> {
        let mut frontier: HashSet<&str> = roots.iter().copied().collect();
        let mut seen: HashSet<&str> = frontier.clone();
        let mut found: Vec<&Category> = Vec::new();

        while !frontier.is_empty() {
            let mut next: HashSet<&str> = HashSet::new();
            for category in &self.categories {
                let Some(parent) = category.parent_slug.as_deref() else {
                    continue;
                };
                if frontier.contains(parent) && !seen.contains(category.slug.as_str()) {
                    seen.insert(category.slug.as_str());
                    next.insert(category.slug.as_str());
                    found.push(category);
                }
            }
            frontier = next;
        }

        found
    }

    /// Parent › self › immediate-children view for `slug`.
    ///
    /// Returns `None` for an unknown slug — categories may legitimately not
    /// be loaded yet while the bulk fetch is in flight, so this is not an
    /// error. A dangling parent slug degrades to `parent: None`.
    #[must_use]
    pub fn breadcrumb_for(&self, slug: &str) -> Option<Breadcrumb<'_>> {
        let current = self.get(slug)?;
        let parent = current.parent_slug.as_deref().and_then(|p| self.get(p));
        Some(Breadcrumb {
            parent,
            current,
            children: self.children_of(slug),
        })
    }
}
