//! crates/decoded_core/src/test_support.rs
//!
//! Fixtures shared by the unit tests: an in-memory `EpisodeStore` that
//! implements the full filter/sort/pagination contract over a vector, and a
//! store whose every call fails with a transport error.

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use std::cmp::Reverse;

use crate::domain::{CategorySummary, EpisodePage, EpisodeStats, EpisodeSummary};
use crate::filters::{EpisodeFilters, SortOrder};
use crate::ports::{EpisodeStore, StoreError, StoreResult};

/// A minimal summary with the given id and title.
pub fn summary(id: &str, title: &str) -> EpisodeSummary {
    EpisodeSummary {
        id: id.to_owned(),
        podcast_name: "Test Show".to_owned(),
        podcast_host: None,
        categories: Vec::new(),
        artwork_url: None,
        title: title.to_owned(),
        episode_number: None,
        episode_date: None,
        duration_minutes: None,
        guest_name: None,
        guest_title: None,
        guest_bio: None,
        guest_avatar_url: None,
        summary: None,
        key_takeaways: Vec::new(),
        full_notes: None,
        resources_mentioned: Vec::new(),
        tags: Vec::new(),
        read_time_minutes: None,
        view_count: 0,
        published_at: None,
    }
}

/// A summary with categories, plus builder-style helpers for the fields the
/// tests vary.
pub fn episode(id: &str, title: &str, categories: &[&str]) -> EpisodeSummary {
    let mut episode = summary(id, title);
    episode.categories = categories.iter().map(|c| (*c).to_owned()).collect();
    episode
}

// Builder-style helpers compiled only for tests; `EpisodeSummary` is defined
// in this crate, so the inherent impl can live here.
impl EpisodeSummary {
    pub fn with_guest(mut self, name: &str) -> Self {
        self.guest_name = Some(name.to_owned());
        self
    }

    pub fn with_published_days_ago(mut self, days: i64) -> Self {
        let base = Utc.with_ymd_and_hms(2024, 11, 1, 12, 0, 0).unwrap();
        self.published_at = Some(base - Duration::days(days));
        self
    }

    pub fn with_view_count(mut self, views: u64) -> Self {
        self.view_count = views;
        self
    }

    pub fn with_minutes(mut self, duration: u32, read_time: u32) -> Self {
        self.duration_minutes = Some(duration);
        self.read_time_minutes = Some(read_time);
        self
    }
}

/// `count` episodes tagged "AI", published on consecutive days.
pub fn ai_fixture(count: usize) -> Vec<EpisodeSummary> {
    (0..count)
        .map(|i| {
            episode(&format!("ai-{i}"), &format!("AI episode {i}"), &["AI"])
                .with_published_days_ago(i as i64)
        })
        .collect()
}

/// An `EpisodeStore` over a plain vector, mirroring the backend's filter,
/// sort, and range capabilities.
pub struct InMemoryStore {
    episodes: Vec<EpisodeSummary>,
}

impl InMemoryStore {
    pub fn new(episodes: Vec<EpisodeSummary>) -> Self {
        Self { episodes }
    }

    fn matches(episode: &EpisodeSummary, filters: &EpisodeFilters) -> bool {
        if let Some(category) = &filters.category {
            if !episode.categories.iter().any(|c| c == category) {
                return false;
            }
        }
        if let Some(search) = &filters.search {
            let needle = search.to_lowercase();
            let haystacks = [
                Some(episode.title.as_str()),
                episode.summary.as_deref(),
                episode.guest_name.as_deref(),
            ];
            if !haystacks
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle))
            {
                return false;
            }
        }
        true
    }

    fn sorted(&self, filters: &EpisodeFilters) -> Vec<EpisodeSummary> {
        let mut matching: Vec<EpisodeSummary> = self
            .episodes
            .iter()
            .filter(|e| Self::matches(e, filters))
            .cloned()
            .collect();
        match filters.sort {
            // Reverse(Option<_>) sorts descending with None last.
            SortOrder::Recent => matching.sort_by_key(|e| Reverse(e.published_at)),
            SortOrder::Popular => matching.sort_by_key(|e| Reverse(e.view_count)),
        }
        matching
    }
}

#[async_trait]
impl EpisodeStore for InMemoryStore {
    async fn recent_episodes(&self, limit: u32) -> StoreResult<Vec<EpisodeSummary>> {
        let filters = EpisodeFilters { limit, ..EpisodeFilters::default() };
        let mut sorted = self.sorted(&filters);
        sorted.truncate(limit as usize);
        Ok(sorted)
    }

    async fn all_episodes(&self, filters: &EpisodeFilters) -> StoreResult<EpisodePage> {
        let sorted = self.sorted(filters);
        let total = sorted.len() as u64;
        let episodes = sorted
            .into_iter()
            .skip(filters.offset as usize)
            .take(filters.limit as usize)
            .collect();
        Ok(EpisodePage { episodes, total })
    }

    async fn episode_by_id(&self, id: &str) -> StoreResult<Option<EpisodeSummary>> {
        Ok(self.episodes.iter().find(|e| e.id == id).cloned())
    }

    async fn categories(&self) -> StoreResult<Vec<CategorySummary>> {
        Ok(crate::domain::tally_categories(
            self.episodes.iter().map(|e| e.categories.as_slice()),
        ))
    }

    async fn episodes_by_category(
        &self,
        category: &str,
        limit: u32,
        offset: u32,
    ) -> StoreResult<EpisodePage> {
        let filters = EpisodeFilters {
            category: Some(category.to_owned()),
            limit,
            offset,
            ..EpisodeFilters::default()
        };
        self.all_episodes(&filters).await
    }

    async fn episode_stats(&self) -> StoreResult<EpisodeStats> {
        Ok(EpisodeStats {
            total_episodes: self.episodes.len() as u64,
            total_duration_minutes: self
                .episodes
                .iter()
                .map(|e| u64::from(e.duration_minutes.unwrap_or(0)))
                .sum(),
            total_read_time_minutes: self
                .episodes
                .iter()
                .map(|e| u64::from(e.read_time_minutes.unwrap_or(0)))
                .sum(),
        })
    }
}

/// A store whose every call fails with a transport error.
pub struct FailingStore;

#[async_trait]
impl EpisodeStore for FailingStore {
    async fn recent_episodes(&self, _limit: u32) -> StoreResult<Vec<EpisodeSummary>> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }

    async fn all_episodes(&self, _filters: &EpisodeFilters) -> StoreResult<EpisodePage> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }

    async fn episode_by_id(&self, _id: &str) -> StoreResult<Option<EpisodeSummary>> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }

    async fn categories(&self) -> StoreResult<Vec<CategorySummary>> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }

    async fn episodes_by_category(
        &self,
        _category: &str,
        _limit: u32,
        _offset: u32,
    ) -> StoreResult<EpisodePage> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }

    async fn episode_stats(&self) -> StoreResult<EpisodeStats> {
        Err(StoreError::Transport("backend unavailable".to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The in-memory store is itself the reference model for the port
    // contract, so its semantics get their own checks.

    #[tokio::test]
    async fn recent_episodes_sorts_newest_first_with_nulls_last() {
        let store = InMemoryStore::new(vec![
            episode("no-date", "Undated", &[]),
            episode("new", "Newest", &[]).with_published_days_ago(0),
            episode("old", "Oldest", &[]).with_published_days_ago(10),
        ]);
        let recent = store.recent_episodes(10).await.unwrap();
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "no-date"]);

        let capped = store.recent_episodes(2).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn popular_sort_orders_by_descending_view_count() {
        let store = InMemoryStore::new(vec![
            episode("quiet", "Quiet", &[]).with_view_count(3),
            episode("hit", "Hit", &[]).with_view_count(900),
            episode("unseen", "Unseen", &[]),
        ]);
        let filters = EpisodeFilters { sort: SortOrder::Popular, ..EpisodeFilters::default() };
        let page = store.all_episodes(&filters).await.unwrap();
        let ids: Vec<&str> = page.episodes.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["hit", "quiet", "unseen"]);
    }

    #[tokio::test]
    async fn stats_on_an_empty_table_are_all_zero() {
        let store = InMemoryStore::new(vec![]);
        let stats = store.episode_stats().await.unwrap();
        assert_eq!(stats, EpisodeStats::default());
    }

    #[tokio::test]
    async fn stats_sum_duration_and_read_time() {
        let store = InMemoryStore::new(vec![
            episode("a", "A", &[]).with_minutes(90, 10),
            episode("b", "B", &[]).with_minutes(45, 8),
            episode("c", "C", &[]),
        ]);
        let stats = store.episode_stats().await.unwrap();
        assert_eq!(stats.total_episodes, 3);
        assert_eq!(stats.total_duration_minutes, 135);
        assert_eq!(stats.total_read_time_minutes, 18);
    }

    #[tokio::test]
    async fn episode_by_id_is_idempotent() {
        let store = InMemoryStore::new(ai_fixture(3));
        let first = store.episode_by_id("ai-1").await.unwrap();
        let second = store.episode_by_id("ai-1").await.unwrap();
        assert_eq!(first, second);
        assert!(first.is_some());
    }
}
