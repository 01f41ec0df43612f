//! Derived view composer.
//!
//! Pure functions over the two stores' snapshots plus filter inputs.
//! Composition happens on every access — the result is never cached
//! and never a source of truth. Collections are expected to stay in
//! the hundreds, so recomputation is cheap.

use crate::models::{Category, CategoryRef, Link, LinkView};

/// Case-insensitive substring match over title OR url OR description.
/// A missing description never matches; an empty query matches all.
pub fn link_matches(link: &Link, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    link.title.to_lowercase().contains(&query)
        || link.url.to_lowercase().contains(&query)
        || link
            .description
            .as_ref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
}

/// Join links to categories and apply the text and category filters.
///
/// Resolution is against the category slice as passed in — the
/// caller's current snapshot — so a rename or delete is visible on the
/// next composition. A dangling `category_id` resolves to `None`.
/// Input order (newest-first) is preserved; filtering never re-sorts.
pub fn compose(
    links: &[Link],
    categories: &[Category],
    search: &str,
    category: Option<&str>,
) -> Vec<LinkView> {
    links
        .iter()
        .filter(|link| link_matches(link, search))
        .filter(|link| match category {
            Some(id) => link.category_id.as_deref() == Some(id),
            None => true,
        })
        .map(|link| LinkView {
            link: link.clone(),
            category: link
                .category_id
                .as_deref()
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .map(CategoryRef::from),
        })
        .collect()
}
