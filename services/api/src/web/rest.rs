//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification. Every fetch-driven view on the
//! site is backed by exactly one of these read-only endpoints; the only
//! write path is the stubbed request form, which records nothing.

use crate::web::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use decoded_core::display::{format_duration, related_episodes};
use decoded_core::domain::{CategorySummary, EpisodeStats, EpisodeSummary};
use decoded_core::filters::BrowseFilters;
use decoded_core::ports::StoreError;
use decoded_core::slug::{resolve_category, slugify, CategoryResolution};

/// How many related episodes a detail response carries.
const RELATED_SHOWN: usize = 3;
/// Upper bound on a caller-supplied page size.
const MAX_PAGE_SIZE: u32 = 50;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_episodes_handler,
        recent_episodes_handler,
        episode_detail_handler,
        list_categories_handler,
        category_episodes_handler,
        episode_stats_handler,
        submit_request_handler,
    ),
    components(
        schemas(EpisodeRequestPayload, RequestAccepted)
    ),
    tags(
        (name = "Decoded API", description = "Read-only endpoints backing the episode summary site.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One page of episodes plus what the pagination controls need.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeListResponse {
    pub episodes: Vec<EpisodeSummary>,
    pub total: u64,
    pub has_more: bool,
}

/// The detail page payload: the episode, its related strip, and the derived
/// duration label (absent when the episode has no usable duration).
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDetailResponse {
    pub episode: EpisodeSummary,
    pub related: Vec<EpisodeSummary>,
    pub formatted_duration: Option<String>,
}

/// A category with the route segment it lives under.
#[derive(Serialize)]
pub struct CategoryResponse {
    pub name: String,
    pub count: u64,
    pub slug: String,
}

impl From<CategorySummary> for CategoryResponse {
    fn from(category: CategorySummary) -> Self {
        Self {
            slug: slugify(&category.name),
            name: category.name,
            count: category.count,
        }
    }
}

/// Episodes of one resolved category.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEpisodesResponse {
    pub category: String,
    pub episodes: Vec<EpisodeSummary>,
    pub total: u64,
    pub has_more: bool,
}

/// What a visitor submits through the request-an-episode form.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EpisodeRequestPayload {
    pub podcast_name: String,
    #[serde(default)]
    pub episode_title: Option<String>,
    #[serde(default)]
    pub episode_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Acknowledgement for a queued episode request.
#[derive(Serialize, ToSchema)]
pub struct RequestAccepted {
    pub id: String,
    pub status: String,
}

//=========================================================================================
// Shared Handler Helpers
//=========================================================================================

/// Pagination knobs accepted alongside the filter query pairs.
#[derive(Debug, Clone, Copy)]
struct PageParams {
    page: u32,
    limit: u32,
}

impl PageParams {
    /// Reads `page` and `limit` from raw query pairs; anything unparseable
    /// falls back, and the limit is clamped to a sane window.
    fn from_pairs(pairs: &[(String, String)], default_limit: u32) -> Self {
        let lookup = |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| k == key)
                .and_then(|(_, v)| v.parse::<u32>().ok())
        };
        Self {
            page: lookup("page").unwrap_or(0),
            limit: lookup("limit")
                .filter(|n| *n > 0)
                .unwrap_or(default_limit)
                .min(MAX_PAGE_SIZE),
        }
    }

    /// Saturates rather than wraps: an absurd caller-supplied page lands
    /// past every listing and comes back as an empty page.
    fn offset(&self) -> u32 {
        self.page.saturating_mul(self.limit)
    }

    fn has_more(&self, total: u64) -> bool {
        (u64::from(self.page) + 1) * u64::from(self.limit) < total
    }
}

/// Store failures become a 502 carrying the backend's message; the page
/// views render it inside their inline error panel.
fn store_failure(error: StoreError) -> (StatusCode, String) {
    error!("episode store request failed: {error}");
    (StatusCode::BAD_GATEWAY, error.to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Browse the episode listing.
///
/// Accepts the browse page's URL query pairs verbatim: `q` (search),
/// `category`, `sort` (`recent`/`popular`), plus `page` and `limit`.
#[utoipa::path(
    get,
    path = "/episodes",
    params(
        ("q" = Option<String>, Query, description = "Case-insensitive search over title, summary and guest name."),
        ("category" = Option<String>, Query, description = "Exact category label to filter by."),
        ("sort" = Option<String>, Query, description = "`recent` (default) or `popular`."),
        ("page" = Option<u32>, Query, description = "Zero-based page index."),
        ("limit" = Option<u32>, Query, description = "Page size, capped at 50.")
    ),
    responses(
        (status = 200, description = "One page of matching episodes"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn list_episodes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let filters = BrowseFilters::from_query_pairs(
        pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    );
    let params = PageParams::from_pairs(&pairs, app_state.config.page_size);

    let page = app_state
        .store
        .all_episodes(&filters.page_window(params.page, params.limit))
        .await
        .map_err(store_failure)?;

    Ok(Json(EpisodeListResponse {
        has_more: params.has_more(page.total),
        total: page.total,
        episodes: page.episodes,
    }))
}

#[derive(Deserialize)]
pub struct RecentParams {
    limit: Option<u32>,
}

/// The home page's most-recent strip.
#[utoipa::path(
    get,
    path = "/episodes/recent",
    params(("limit" = Option<u32>, Query, description = "How many episodes to return (default 6).")),
    responses(
        (status = 200, description = "Most recently published episodes"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn recent_episodes_handler(
    State(app_state): State<Arc<AppState>>,
    Query(params): Query<RecentParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let limit = params.limit.filter(|n| *n > 0).unwrap_or(6).min(MAX_PAGE_SIZE);
    let episodes = app_state
        .store
        .recent_episodes(limit)
        .await
        .map_err(store_failure)?;
    Ok(Json(episodes))
}

/// One episode plus up to three related episodes from its first category.
#[utoipa::path(
    get,
    path = "/episodes/{id}",
    params(("id" = String, Path, description = "Opaque episode identifier.")),
    responses(
        (status = 200, description = "The episode and its related strip"),
        (status = 404, description = "No episode with this id"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn episode_detail_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let episode = app_state
        .store
        .episode_by_id(&id)
        .await
        .map_err(store_failure)?
        .ok_or((StatusCode::NOT_FOUND, "Episode not found.".to_string()))?;

    let related = match episode.categories.first() {
        Some(category) => {
            let page = app_state
                .store
                .episodes_by_category(category, RELATED_SHOWN as u32 + 1, 0)
                .await
                .map_err(store_failure)?;
            related_episodes(page.episodes, &episode.id, RELATED_SHOWN)
        }
        None => Vec::new(),
    };

    Ok(Json(EpisodeDetailResponse {
        formatted_duration: format_duration(episode.duration_minutes),
        episode,
        related,
    }))
}

/// Every category with its episode count and route slug.
#[utoipa::path(
    get,
    path = "/categories",
    responses(
        (status = 200, description = "All categories, descending by episode count"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn list_categories_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let categories = app_state.store.categories().await.map_err(store_failure)?;
    let response: Vec<CategoryResponse> =
        categories.into_iter().map(CategoryResponse::from).collect();
    Ok(Json(response))
}

/// Episodes filed under the category a route slug resolves to.
#[utoipa::path(
    get,
    path = "/categories/{slug}/episodes",
    params(
        ("slug" = String, Path, description = "URL-safe category segment, e.g. `artificial-intelligence`."),
        ("page" = Option<u32>, Query, description = "Zero-based page index."),
        ("limit" = Option<u32>, Query, description = "Page size, capped at 50.")
    ),
    responses(
        (status = 200, description = "One page of the category's episodes, newest first"),
        (status = 404, description = "No category slugs to this segment"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn category_episodes_handler(
    State(app_state): State<Arc<AppState>>,
    Path(slug): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let categories = app_state.store.categories().await.map_err(store_failure)?;
    let label = match resolve_category(&slug, Some(categories.as_slice())) {
        CategoryResolution::Found(label) => label,
        _ => return Err((StatusCode::NOT_FOUND, "Category not found.".to_string())),
    };

    let params = PageParams::from_pairs(&pairs, app_state.config.page_size);
    let page = app_state
        .store
        .episodes_by_category(&label, params.limit, params.offset())
        .await
        .map_err(store_failure)?;

    Ok(Json(CategoryEpisodesResponse {
        category: label,
        has_more: params.has_more(page.total),
        total: page.total,
        episodes: page.episodes,
    }))
}

/// Aggregate totals for the marketing page.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Episode count and duration/read-time totals"),
        (status = 502, description = "Backend failure")
    )
)]
pub async fn episode_stats_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<EpisodeStats>, (StatusCode, String)> {
    let stats = app_state.store.episode_stats().await.map_err(store_failure)?;
    Ok(Json(stats))
}

/// Submission stub for the request-an-episode form.
///
/// Validates and acknowledges the payload; nothing is persisted yet.
#[utoipa::path(
    post,
    path = "/requests",
    request_body = EpisodeRequestPayload,
    responses(
        (status = 202, description = "Request queued", body = RequestAccepted),
        (status = 422, description = "Payload missing a podcast name")
    )
)]
pub async fn submit_request_handler(
    Json(payload): Json<EpisodeRequestPayload>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if payload.podcast_name.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "podcast_name is required".to_string(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    info!(
        request_id = %id,
        podcast = %payload.podcast_name,
        episode = payload.episode_title.as_deref().unwrap_or("-"),
        "episode request received, queuing is not wired up yet",
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(RequestAccepted { id, status: "queued".to_string() }),
    ))
}
