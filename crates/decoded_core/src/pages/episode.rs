//! crates/decoded_core/src/pages/episode.rs
//!
//! The episode detail controller: resolves one episode from the route id,
//! then opportunistically fetches up to three related episodes sharing the
//! detail episode's first category.

use std::sync::Arc;

use crate::display::related_episodes;
use crate::domain::EpisodeSummary;
use crate::ports::EpisodeStore;

/// How many related candidates to ask the backend for. One extra row covers
/// the detail episode itself appearing in its own category.
const RELATED_FETCH_LIMIT: u32 = 4;
/// How many related episodes are shown.
const RELATED_SHOWN: usize = 3;

/// View state of the detail page. A missing row (`NotFound`) and a transport
/// failure (`Failed`) are distinct variants even though the rendered
/// messaging may coincide.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading,
    Loaded {
        episode: EpisodeSummary,
        related: Vec<EpisodeSummary>,
    },
    NotFound,
    Failed(String),
}

/// View-state owner for one episode detail page.
pub struct EpisodeDetail {
    store: Arc<dyn EpisodeStore>,
    state: DetailState,
}

impl EpisodeDetail {
    pub fn new(store: Arc<dyn EpisodeStore>) -> Self {
        Self {
            store,
            state: DetailState::Idle,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    /// Resolves the routed episode. A missing identifier in the route is a
    /// no-op: no fetch is attempted and the state is left untouched.
    pub async fn load(&mut self, id: Option<&str>) {
        let Some(id) = id else {
            return;
        };
        self.state = DetailState::Loading;

        let episode = match self.store.episode_by_id(id).await {
            Ok(Some(episode)) => episode,
            Ok(None) => {
                self.state = DetailState::NotFound;
                return;
            }
            Err(error) => {
                self.state = DetailState::Failed(error.to_string());
                return;
            }
        };

        let related = match episode.categories.first() {
            Some(category) => {
                match self
                    .store
                    .episodes_by_category(category, RELATED_FETCH_LIMIT, 0)
                    .await
                {
                    Ok(page) => related_episodes(page.episodes, &episode.id, RELATED_SHOWN),
                    Err(error) => {
                        self.state = DetailState::Failed(error.to_string());
                        return;
                    }
                }
            }
            None => Vec::new(),
        };

        self.state = DetailState::Loaded { episode, related };
    }
}
