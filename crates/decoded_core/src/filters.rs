//! crates/decoded_core/src/filters.rs
//!
//! The filter vocabulary shared by the query layer and the browse pages, plus
//! the explicit encode/decode between the view-level filter state and URL
//! query pairs. The query string is the single source of truth for filter
//! state, so the mapping is a plain value conversion testable without any
//! router.

/// Default page size for every episode listing.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Ordering of an episode listing. `parse`/`as_str` are the query-string
/// form; the enum never crosses a serde boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Descending publication timestamp, nulls last.
    #[default]
    Recent,
    /// Descending view count, nulls last.
    Popular,
}

impl SortOrder {
    /// Parses the query-string form. Anything unrecognized falls back to
    /// [`SortOrder::Recent`] so a hand-edited URL still renders a page.
    pub fn parse(value: &str) -> Self {
        match value {
            "popular" => SortOrder::Popular,
            _ => SortOrder::Recent,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Recent => "recent",
            SortOrder::Popular => "popular",
        }
    }
}

/// The query-layer filter set: what one `all_episodes` call asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeFilters {
    pub category: Option<String>,
    pub sort: SortOrder,
    pub limit: u32,
    pub offset: u32,
    pub search: Option<String>,
}

impl Default for EpisodeFilters {
    fn default() -> Self {
        Self {
            category: None,
            sort: SortOrder::Recent,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
            search: None,
        }
    }
}

/// The URL-visible filter state a browse page owns: everything except the
/// page cursor, which lives in the list state (load-more is not a URL
/// transition).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BrowseFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortOrder,
}

impl BrowseFilters {
    /// Decodes filter state from URL query pairs. Total: unknown keys are
    /// ignored, empty values mean "absent", a bad sort value defaults.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut filters = Self::default();
        for (key, value) in pairs {
            match key {
                "q" if !value.is_empty() => filters.search = Some(value.to_owned()),
                "category" if !value.is_empty() => filters.category = Some(value.to_owned()),
                "sort" => filters.sort = SortOrder::parse(value),
                _ => {}
            }
        }
        filters
    }

    /// Encodes filter state back into query pairs. Defaults and empties are
    /// omitted so the URL stays canonical and round-trips exactly.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("q".to_owned(), search.to_owned()));
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            pairs.push(("category".to_owned(), category.to_owned()));
        }
        if self.sort != SortOrder::Recent {
            pairs.push(("sort".to_owned(), self.sort.as_str().to_owned()));
        }
        pairs
    }

    /// Derives the query-layer filters for one zero-based page window. The
    /// page number comes straight from the URL, so the offset saturates
    /// instead of wrapping; a saturated window is past every listing and
    /// yields an empty page.
    pub fn page_window(&self, page: u32, page_size: u32) -> EpisodeFilters {
        EpisodeFilters {
            category: self.category.clone(),
            sort: self.sort,
            limit: page_size,
            offset: page.saturating_mul(page_size),
            search: self.search.clone(),
        }
    }
}
