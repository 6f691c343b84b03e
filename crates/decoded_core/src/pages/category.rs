//! crates/decoded_core/src/pages/category.rs
//!
//! The category page controller: resolves a route slug against the loaded
//! category list, then drives a recency-ordered listing for the resolved
//! label with the same pagination contract as the browse page.

use std::sync::Arc;

use crate::domain::{CategorySummary, EpisodePage};
use crate::filters::EpisodeFilters;
use crate::ports::{EpisodeStore, StoreResult};
use crate::slug::{resolve_category, CategoryResolution};
use crate::view::{reduce, ListEvent, ListState};

use super::ListRequest;

/// View-state owner for one category page.
pub struct CategoryPage {
    store: Arc<dyn EpisodeStore>,
    page_size: u32,
    slug: String,
    categories: Option<Vec<CategorySummary>>,
    resolution: CategoryResolution,
    state: ListState,
    generation: u64,
}

impl CategoryPage {
    pub fn new(store: Arc<dyn EpisodeStore>, page_size: u32, slug: impl Into<String>) -> Self {
        Self {
            store,
            page_size,
            slug: slug.into(),
            categories: None,
            resolution: CategoryResolution::Pending,
            state: ListState::Idle,
            generation: 0,
        }
    }

    pub fn resolution(&self) -> &CategoryResolution {
        &self.resolution
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn has_more(&self) -> bool {
        matches!(&self.state, ListState::Loaded(page) if page.has_more(self.page_size))
    }

    /// Loads the category list, resolves the slug against it, and, when a
    /// label matches, fetches its first page. Until the list has loaded the
    /// resolution stays `Pending`; "not found" is never declared early.
    pub async fn load(&mut self) {
        if self.categories.is_none() {
            match self.store.categories().await {
                Ok(categories) => self.categories = Some(categories),
                Err(error) => {
                    self.state = reduce(
                        std::mem::take(&mut self.state),
                        ListEvent::FetchStarted { replace: true },
                    );
                    self.state = reduce(
                        std::mem::take(&mut self.state),
                        ListEvent::FetchFailed { message: error.to_string() },
                    );
                    return;
                }
            }
        }

        self.resolution = resolve_category(&self.slug, self.categories.as_deref());
        if matches!(self.resolution, CategoryResolution::Found(_)) {
            self.refresh().await;
        }
    }

    fn begin(&mut self, replace: bool, page: u32) -> Option<(ListRequest, String)> {
        let CategoryResolution::Found(category) = &self.resolution else {
            return None;
        };
        let category = category.clone();
        self.generation += 1;
        self.state = reduce(
            std::mem::take(&mut self.state),
            ListEvent::FetchStarted { replace },
        );
        let filters = EpisodeFilters {
            category: Some(category.clone()),
            limit: self.page_size,
            offset: page.saturating_mul(self.page_size),
            ..EpisodeFilters::default()
        };
        Some((ListRequest::new(self.generation, filters), category))
    }

    fn complete(&mut self, request: &ListRequest, result: StoreResult<EpisodePage>) {
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

    /// Page-0 fetch for the resolved category; also serves as the retry.
    pub async fn refresh(&mut self) {
        let Some((request, category)) = self.begin(true, 0) else {
            return;
        };
        let result = self
            .store
            .episodes_by_category(&category, request.filters.limit, request.filters.offset)
            .await;
        self.complete(&request, result);
    }

    /// Fetches the next page window and appends it.
    pub async fn load_more(&mut self) {
        let next_page = match &self.state {
            ListState::Loaded(page) if page.has_more(self.page_size) => page.page + 1,
            _ => return,
        };
        let Some((request, category)) = self.begin(false, next_page) else {
            return;
        };
        let result = self
            .store
            .episodes_by_category(&category, request.filters.limit, request.filters.offset)
            .await;
        self.complete(&request, result);
    }
}
