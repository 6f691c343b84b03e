//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use decoded_core::ports::EpisodeStore;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all
/// handlers. Handlers only see the `EpisodeStore` port, never the pool.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EpisodeStore>,
    pub config: Arc<Config>,
}
