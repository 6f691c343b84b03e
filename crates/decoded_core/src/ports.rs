//! crates/decoded_core/src/ports.rs
//!
//! Defines the service contract (trait) for the episode backend. The trait
//! forms the boundary of the hexagonal architecture: the page controllers in
//! this crate only ever see an `EpisodeStore`, never a database client.

use async_trait::async_trait;

use crate::domain::{CategorySummary, EpisodePage, EpisodeStats, EpisodeSummary};
use crate::filters::EpisodeFilters;

/// The single error class the query layer surfaces.
///
/// Zero results and missing optional fields are normal, representable states
/// and never arrive here; only a transport or backend failure does.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("backend request failed: {0}")]
    Transport(String),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only access to the hosted `episodes` collection.
///
/// All operations are total over the data they see: a malformed row still
/// maps to a summary with empty or zero defaults rather than failing.
#[async_trait]
pub trait EpisodeStore: Send + Sync {
    /// The `limit` most recently published episodes, newest first, episodes
    /// without a publication timestamp sorted last.
    async fn recent_episodes(&self, limit: u32) -> StoreResult<Vec<EpisodeSummary>>;

    /// One page of the filtered listing plus the exact count of the full
    /// filtered set.
    async fn all_episodes(&self, filters: &EpisodeFilters) -> StoreResult<EpisodePage>;

    /// Resolves a single episode. `Ok(None)` means a valid request with no
    /// matching row; `Err` is reserved for transport failures.
    async fn episode_by_id(&self, id: &str) -> StoreResult<Option<EpisodeSummary>>;

    /// Every distinct category label with its episode count, descending by
    /// count. Computed by scanning all rows; see `domain::tally_categories`.
    async fn categories(&self) -> StoreResult<Vec<CategorySummary>>;

    /// Same pagination contract as [`all_episodes`](Self::all_episodes),
    /// restricted to one category and ordered by recency.
    async fn episodes_by_category(
        &self,
        category: &str,
        limit: u32,
        offset: u32,
    ) -> StoreResult<EpisodePage>;

    /// Aggregate totals across all episodes; all zeros on an empty table.
    async fn episode_stats(&self) -> StoreResult<EpisodeStats>;
}
