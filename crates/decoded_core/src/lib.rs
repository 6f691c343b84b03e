pub mod display;
pub mod domain;
pub mod filters;
pub mod pages;
pub mod ports;
pub mod slug;
pub mod view;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{
    CategorySummary, EpisodePage, EpisodeRecord, EpisodeResource, EpisodeStats, EpisodeSummary,
    ResourceKind,
};
pub use filters::{BrowseFilters, EpisodeFilters, SortOrder, DEFAULT_PAGE_SIZE};
pub use pages::{BrowsePage, CategoryPage, DetailState, EpisodeDetail};
pub use ports::{EpisodeStore, StoreError, StoreResult};
pub use slug::{resolve_category, slugify, CategoryResolution};
pub use view::{ListState, LoadedPage};
