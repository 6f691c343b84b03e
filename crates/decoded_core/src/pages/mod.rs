//! crates/decoded_core/src/pages/mod.rs
//!
//! Page-level view-state controllers. Each page owns its state exclusively;
//! nothing outside a fetch completion mutates it.

pub mod browse;
pub mod category;
pub mod episode;

pub use browse::BrowsePage;
pub use category::CategoryPage;
pub use episode::{DetailState, EpisodeDetail};

use crate::filters::EpisodeFilters;

/// One issued fetch: the page window to ask the store for, stamped with the
/// request token that decides whether its response still matters. There is
/// no cancellation of in-flight requests; a superseded response is simply
/// discarded on completion.
#[derive(Debug, Clone)]
pub struct ListRequest {
    token: u64,
    pub filters: EpisodeFilters,
}

impl ListRequest {
    pub(crate) fn new(token: u64, filters: EpisodeFilters) -> Self {
        Self { token, filters }
    }

    pub(crate) fn token(&self) -> u64 {
        self.token
    }
}
