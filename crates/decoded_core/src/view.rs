//! crates/decoded_core/src/view.rs
//!
//! The fetch state machine shared by every episode listing. The tagged union
//! makes impossible combinations (loading while loading-more, error shown
//! next to skeletons) unrepresentable, and all transitions go through a
//! single reducer so the machine is directly testable.

use crate::domain::EpisodeSummary;

/// The episodes accumulated so far plus the pagination cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage {
    pub episodes: Vec<EpisodeSummary>,
    pub total: u64,
    /// Zero-based index of the last page folded in.
    pub page: u32,
}

impl LoadedPage {
    /// Whether another page window exists past the current one.
    pub fn has_more(&self, page_size: u32) -> bool {
        (u64::from(self.page) + 1) * u64::from(page_size) < self.total
    }
}

/// View state of one episode listing. Exactly one presentation is active at
/// a time: skeletons (Loading), trailing indicator (LoadingMore), content
/// (Loaded, possibly empty), or an inline error (Failed).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Idle,
    /// A page-0 replacing fetch is in flight. The previously loaded page is
    /// carried along so a failure can fall back to it.
    Loading { previous: Option<LoadedPage> },
    /// A load-more fetch is in flight; existing items stay visible.
    LoadingMore { current: LoadedPage },
    Loaded(LoadedPage),
    /// The last fetch failed. `previous` is the result set that was on
    /// screen before, preserved for the inline retry affordance.
    Failed {
        message: String,
        previous: Option<LoadedPage>,
    },
}

impl ListState {
    /// The loaded page currently backing the display, regardless of phase.
    pub fn loaded(&self) -> Option<&LoadedPage> {
        match self {
            ListState::Idle => None,
            ListState::Loading { previous } => previous.as_ref(),
            ListState::LoadingMore { current } => Some(current),
            ListState::Loaded(page) => Some(page),
            ListState::Failed { previous, .. } => previous.as_ref(),
        }
    }

    fn take_loaded(self) -> Option<LoadedPage> {
        match self {
            ListState::Idle => None,
            ListState::Loading { previous } => previous,
            ListState::LoadingMore { current } => Some(current),
            ListState::Loaded(page) => Some(page),
            ListState::Failed { previous, .. } => previous,
        }
    }
}

/// Everything that can happen to a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    /// A fetch was issued. `replace: true` is a page-0 fetch that swaps the
    /// whole result set; `replace: false` appends the next page.
    FetchStarted { replace: bool },
    /// The in-flight fetch resolved with one page window.
    PageLoaded {
        episodes: Vec<EpisodeSummary>,
        total: u64,
    },
    /// The in-flight fetch failed.
    FetchFailed { message: String },
}

/// The single transition function. Events that make no sense in the current
/// state (a completion with nothing in flight, load-more before anything
/// loaded) leave the state unchanged.
pub fn reduce(state: ListState, event: ListEvent) -> ListState {
    match event {
        ListEvent::FetchStarted { replace: true } => ListState::Loading {
            previous: state.take_loaded(),
        },
        ListEvent::FetchStarted { replace: false } => match state {
            ListState::Loaded(current) => ListState::LoadingMore { current },
            other => other,
        },
        ListEvent::PageLoaded { episodes, total } => match state {
            ListState::Loading { .. } => ListState::Loaded(LoadedPage {
                episodes,
                total,
                page: 0,
            }),
            ListState::LoadingMore { mut current } => {
                current.episodes.extend(episodes);
                current.total = total;
                current.page += 1;
                ListState::Loaded(current)
            }
            other => other,
        },
        ListEvent::FetchFailed { message } => match state {
            ListState::Loading { previous } => ListState::Failed { message, previous },
            ListState::LoadingMore { current } => ListState::Failed {
                message,
                previous: Some(current),
            },
            other => other,
        },
    }
}
