//! crates/decoded_core/src/pages/browse.rs
//!
//! The browse page controller: owns the {search, category, sort, page}
//! combination, keeps it round-trippable through URL query pairs, and drives
//! the episode store accordingly.
//!
//! Fetches are two-phase. `begin_*` transitions the state machine and hands
//! back a [`ListRequest`] stamped with a monotonically increasing token;
//! `complete` discards any response whose token is no longer current, so a
//! superseded fetch can never overwrite a newer one. The async convenience
//! methods wrap the two phases around a store call.

use std::sync::Arc;

use crate::domain::EpisodePage;
use crate::filters::BrowseFilters;
use crate::ports::{EpisodeStore, StoreResult};
use crate::view::{reduce, ListEvent, ListState};

use super::ListRequest;

/// View-state owner for the browse listing.
pub struct BrowsePage {
    store: Arc<dyn EpisodeStore>,
    page_size: u32,
    filters: BrowseFilters,
    state: ListState,
    generation: u64,
}

impl BrowsePage {
    pub fn new(store: Arc<dyn EpisodeStore>, page_size: u32) -> Self {
        Self {
            store,
            page_size,
            filters: BrowseFilters::default(),
            state: ListState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn filters(&self) -> &BrowseFilters {
        &self.filters
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Whether a load-more action currently makes sense.
    pub fn has_more(&self) -> bool {
        matches!(&self.state, ListState::Loaded(page) if page.has_more(self.page_size))
    }

    /// Adopts the filter combination encoded in the URL. Returns true when
    /// the combination changed, in which case the caller refreshes; editing
    /// the search box alone never reaches this point.
    pub fn sync_query<'a, I>(&mut self, pairs: I) -> bool
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let next = BrowseFilters::from_query_pairs(pairs);
        if next == self.filters {
            return false;
        }
        self.filters = next;
        true
    }

    /// The canonical query pairs for the current filter combination, for the
    /// host to write back to the URL.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.filters.to_query_pairs()
    }

    /// Starts a page-0 fetch that will replace the current result set.
    pub fn begin_refresh(&mut self) -> ListRequest {
        self.generation += 1;
        self.state = reduce(
            std::mem::take(&mut self.state),
            ListEvent::FetchStarted { replace: true },
        );
        ListRequest::new(self.generation, self.filters.page_window(0, self.page_size))
    }

    /// Starts a fetch for the next page, appending on completion. Returns
    /// `None` when nothing is loaded yet or the listing is exhausted.
    pub fn begin_load_more(&mut self) -> Option<ListRequest> {
        let next_page = match &self.state {
            ListState::Loaded(page) if page.has_more(self.page_size) => page.page + 1,
            _ => return None,
        };
        self.generation += 1;
        self.state = reduce(
            std::mem::take(&mut self.state),
            ListEvent::FetchStarted { replace: false },
        );
        Some(ListRequest::new(
            self.generation,
            self.filters.page_window(next_page, self.page_size),
        ))
    }

    /// Folds a fetch response into the state machine, unless a newer request
    /// has been issued since `request` was handed out.
    pub fn complete(&mut self, request: &ListRequest, result: StoreResult<EpisodePage>) {
        if request.token() != self.generation {
            return;
        }
        let event = match result {
            Ok(page) => ListEvent::PageLoaded {
                episodes: page.episodes,
                total: page.total,
            },
            Err(error) => ListEvent::FetchFailed {
                message: error.to_string(),
            },
        };
        self.state = reduce(std::mem::take(&mut self.state), event);
    }

    /// Issues and resolves a page-0 fetch end to end.
    pub async fn refresh(&mut self) {
        let request = self.begin_refresh();
        let result = self.store.all_episodes(&request.filters).await;
        self.complete(&request, result);
    }

    /// Issues and resolves a load-more fetch end to end.
    pub async fn load_more(&mut self) {
        let Some(request) = self.begin_load_more() else {
            return;
        };
        let result = self.store.all_episodes(&request.filters).await;
        self.complete(&request, result);
    }

    /// Manual retry after a failure: the same page-0 fetch again.
    pub async fn retry(&mut self) {
        self.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EpisodePage;
    use crate::filters::SortOrder;
    use crate::ports::StoreError;
    use crate::test_support::{ai_fixture, episode, FailingStore, InMemoryStore};
    use crate::view::ListState;

    fn loaded_ids(page: &BrowsePage) -> Vec<String> {
        page.state()
            .loaded()
            .expect("expected a loaded page")
            .episodes
            .iter()
            .map(|e| e.id.clone())
            .collect()
    }

    #[tokio::test]
    async fn paginates_fourteen_ai_episodes_with_a_page_size_of_twelve() {
        let store = Arc::new(InMemoryStore::new(ai_fixture(14)));
        let mut page = BrowsePage::new(store, 12);
        assert!(page.sync_query(vec![("category", "AI")]));

        page.refresh().await;
        let loaded = page.state().loaded().unwrap();
        assert_eq!(loaded.episodes.len(), 12);
        assert_eq!(loaded.total, 14);
        assert!(page.has_more());

        page.load_more().await;
        let loaded = page.state().loaded().unwrap();
        assert_eq!(loaded.episodes.len(), 14);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn pages_are_disjoint_and_exhaustive_under_a_fixed_filter() {
        let store = Arc::new(InMemoryStore::new(ai_fixture(14)));
        let mut page = BrowsePage::new(store, 5);
        page.sync_query(vec![("category", "AI")]);

        page.refresh().await;
        while page.has_more() {
            page.load_more().await;
        }

        let mut ids = loaded_ids(&page);
        assert_eq!(ids.len(), 14);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 14, "pagination produced duplicates");
    }

    #[tokio::test]
    async fn search_matches_guest_names_case_insensitively() {
        let store = Arc::new(InMemoryStore::new(vec![
            episode("ep-1", "Zone 2 and longevity", &["Health"])
                .with_guest("Peter Attia")
                .with_published_days_ago(1),
            episode("ep-2", "Prompt engineering", &["AI"]).with_published_days_ago(2),
        ]));
        let mut page = BrowsePage::new(store, 12);
        page.sync_query(vec![("q", "attia")]);

        page.refresh().await;
        assert_eq!(loaded_ids(&page), vec!["ep-1"]);
    }

    #[tokio::test]
    async fn failure_preserves_prior_results_and_retry_refetches() {
        let good = Arc::new(InMemoryStore::new(ai_fixture(3)));
        let mut page = BrowsePage::new(good, 12);
        page.refresh().await;
        assert_eq!(loaded_ids(&page).len(), 3);

        // Simulate a backend outage for the next fetch only.
        let request = page.begin_refresh();
        page.complete(
            &request,
            Err(StoreError::Transport("connection reset".to_owned())),
        );
        let ListState::Failed { previous, .. } = page.state() else {
            panic!("expected Failed");
        };
        assert_eq!(previous.as_ref().unwrap().episodes.len(), 3);

        page.retry().await;
        assert_eq!(loaded_ids(&page).len(), 3);
    }

    #[tokio::test]
    async fn transport_errors_surface_as_failed_state() {
        let store = Arc::new(FailingStore);
        let mut page = BrowsePage::new(store, 12);
        page.refresh().await;
        assert!(matches!(page.state(), ListState::Failed { previous: None, .. }));
    }

    #[test]
    fn superseded_responses_are_discarded() {
        let store = Arc::new(InMemoryStore::new(vec![]));
        let mut page = BrowsePage::new(store, 12);

        let stale = page.begin_refresh();
        let current = page.begin_refresh();

        page.complete(
            &stale,
            Ok(EpisodePage { episodes: vec![episode("old", "stale", &[])], total: 1 }),
        );
        assert!(
            matches!(page.state(), ListState::Loading { .. }),
            "stale response must not settle the newer request",
        );

        page.complete(&current, Ok(EpisodePage { episodes: vec![], total: 0 }));
        let loaded = page.state().loaded().unwrap();
        assert!(loaded.episodes.is_empty());
    }

    #[test]
    fn sync_query_reports_whether_the_combination_changed() {
        let store = Arc::new(InMemoryStore::new(vec![]));
        let mut page = BrowsePage::new(store, 12);

        assert!(page.sync_query(vec![("sort", "popular")]));
        assert_eq!(page.filters().sort, SortOrder::Popular);
        assert!(!page.sync_query(vec![("sort", "popular")]));
        assert_eq!(
            page.query_pairs(),
            vec![("sort".to_owned(), "popular".to_owned())],
        );
    }
}
