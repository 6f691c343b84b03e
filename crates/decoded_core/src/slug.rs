//! crates/decoded_core/src/slug.rs
//!
//! Turns free-form category labels into stable, URL-safe route segments and
//! resolves a segment back to the canonical label.

use crate::domain::CategorySummary;

/// Lowercases, collapses whitespace runs to a single hyphen, then
/// percent-encodes. `"Artificial Intelligence"` becomes
/// `"artificial-intelligence"`.
pub fn slugify(label: &str) -> String {
    urlencoding::encode(&hyphenate(label)).into_owned()
}

/// The pre-encoding form of a slug. Matching happens on this plane so that
/// labels with percent-encoded characters still resolve.
fn hyphenate(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Result of resolving a route segment against the known categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// The category list hasn't loaded yet; no verdict can be given.
    Pending,
    /// The canonical label the segment stands for.
    Found(String),
    /// The list is loaded and nothing slugs to this segment.
    NotFound,
}

/// Resolves a route segment by slugging every known label and looking for an
/// exact match. Percent-encoding in the incoming segment is undone first, so
/// both the raw and the router-decoded form resolve.
pub fn resolve_category(segment: &str, categories: Option<&[CategorySummary]>) -> CategoryResolution {
    let Some(categories) = categories else {
        return CategoryResolution::Pending;
    };

    let decoded = urlencoding::decode(segment)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| segment.to_owned());

    categories
        .iter()
        .find(|category| hyphenate(&category.name) == decoded)
        .map(|category| CategoryResolution::Found(category.name.clone()))
        .unwrap_or(CategoryResolution::NotFound)
}
