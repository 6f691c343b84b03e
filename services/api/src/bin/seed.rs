//! services/api/src/bin/seed.rs
//!
//! One-shot seeding utility: bulk-inserts episode rows from a JSON file into
//! the backend. Not part of the runtime service.
//!
//! Usage: `seed [path-to-episodes.json]` (or set `SEED_FILE`). Set
//! `RESET_EPISODES=true` to wipe the table before inserting.

use api_lib::{config::Config, error::ApiError};
use decoded_core::domain::EpisodeRecord;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

const INSERT_BATCH_SIZE: usize = 5;

/// Decodes the seed file through the wire record. Entries may omit `id`
/// (one is generated) but otherwise carry the exact backend field names.
fn parse_seed_file(raw: &str) -> Result<Vec<EpisodeRecord>, serde_json::Error> {
    let values: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    values
        .into_iter()
        .map(|mut value| {
            if let Some(object) = value.as_object_mut() {
                object
                    .entry("id")
                    .or_insert_with(|| Uuid::new_v4().to_string().into());
            }
            serde_json::from_value(value)
        })
        .collect()
}

async fn insert_episode(pool: &PgPool, episode: &EpisodeRecord) -> Result<(), sqlx::Error> {
    let resources = episode
        .resources_mentioned
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .unwrap_or(None);

    sqlx::query(
        "INSERT INTO episodes (id, podcast_name, podcast_host, podcast_category, \
         podcast_artwork_url, episode_title, episode_number, episode_date, \
         episode_duration_minutes, guest_name, guest_title, guest_bio, guest_avatar_url, \
         summary, key_takeaways, full_notes, resources_mentioned, tags, read_time_minutes, \
         view_count, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
         $18, $19, $20, $21)",
    )
    .bind(&episode.id)
    .bind(&episode.podcast_name)
    .bind(&episode.podcast_host)
    .bind(&episode.podcast_category)
    .bind(&episode.podcast_artwork_url)
    .bind(&episode.episode_title)
    .bind(episode.episode_number.and_then(|n| i32::try_from(n).ok()))
    .bind(episode.episode_date)
    .bind(episode.episode_duration_minutes.and_then(|n| i32::try_from(n).ok()))
    .bind(&episode.guest_name)
    .bind(&episode.guest_title)
    .bind(&episode.guest_bio)
    .bind(&episode.guest_avatar_url)
    .bind(&episode.summary)
    .bind(&episode.key_takeaways)
    .bind(&episode.full_notes)
    .bind(resources)
    .bind(&episode.tags)
    .bind(episode.read_time_minutes.and_then(|n| i32::try_from(n).ok()))
    .bind(i64::try_from(episode.view_count.unwrap_or(0)).unwrap_or(i64::MAX))
    .bind(episode.published_at)
    .execute(pool)
    .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let seed_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SEED_FILE").ok())
        .unwrap_or_else(|| "seed/episodes.json".to_string());

    info!("Loading seed episodes from {seed_path}");
    let raw = std::fs::read_to_string(&seed_path)?;
    let episodes = parse_seed_file(&raw)
        .map_err(|e| ApiError::Internal(format!("Invalid seed file {seed_path}: {e}")))?;
    info!("Parsed {} episodes.", episodes.len());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;

    let reset = std::env::var("RESET_EPISODES").is_ok_and(|v| v == "true");
    if reset {
        info!("Clearing existing episodes table first (RESET_EPISODES=true).");
        let result = sqlx::query("DELETE FROM episodes").execute(&pool).await?;
        info!("Removed {} existing rows.", result.rows_affected());
    } else {
        info!("Skipping table reset. Set RESET_EPISODES=true to wipe before seeding.");
    }

    let mut inserted = 0usize;
    let mut failed = 0usize;
    for (index, batch) in episodes.chunks(INSERT_BATCH_SIZE).enumerate() {
        for episode in batch {
            match insert_episode(&pool, episode).await {
                Ok(()) => inserted += 1,
                Err(e) => {
                    failed += 1;
                    error!("Failed to insert '{}': {e}", episode.episode_title);
                }
            }
        }
        info!("Batch {} done ({} rows so far).", index + 1, inserted);
    }

    info!("Seed complete. Inserted: {inserted}, Failed: {failed}");
    if failed > 0 {
        return Err(ApiError::Internal(format!("{failed} rows failed to insert")));
    }
    Ok(())
}
