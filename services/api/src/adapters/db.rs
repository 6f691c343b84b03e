//! services/api/src/adapters/db.rs
//!
//! The database adapter: the concrete implementation of the `EpisodeStore`
//! port from the core crate, backed by PostgreSQL through `sqlx`.
//!
//! Filter combinations are dynamic, so the queries are assembled with
//! `QueryBuilder` (all values bound, never interpolated). Ordering always
//! spells out `NULLS LAST`: episodes without a publication timestamp or view
//! count sort after everything else.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use decoded_core::domain::{
    tally_categories, CategorySummary, EpisodePage, EpisodeRecord, EpisodeStats, EpisodeSummary,
};
use decoded_core::filters::{EpisodeFilters, SortOrder};
use decoded_core::ports::{EpisodeStore, StoreError, StoreResult};

/// Column list every episode query selects, in `EpisodeRow` field order.
const EPISODE_COLUMNS: &str = "id, podcast_name, podcast_host, podcast_category, \
    podcast_artwork_url, episode_title, episode_number, episode_date, \
    episode_duration_minutes, guest_name, guest_title, guest_bio, guest_avatar_url, \
    summary, key_takeaways, full_notes, resources_mentioned, tags, read_time_minutes, \
    view_count, published_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A PostgreSQL-backed episode store.
#[derive(Clone)]
pub struct PgEpisodeStore {
    pool: PgPool,
}

impl PgEpisodeStore {
    /// Creates a new `PgEpisodeStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Struct
//=========================================================================================

#[derive(FromRow)]
struct EpisodeRow {
    id: String,
    podcast_name: String,
    podcast_host: Option<String>,
    podcast_category: Option<Vec<String>>,
    podcast_artwork_url: Option<String>,
    episode_title: String,
    episode_number: Option<i32>,
    episode_date: Option<NaiveDate>,
    episode_duration_minutes: Option<i32>,
    guest_name: Option<String>,
    guest_title: Option<String>,
    guest_bio: Option<String>,
    guest_avatar_url: Option<String>,
    summary: Option<String>,
    key_takeaways: Option<Vec<String>>,
    full_notes: Option<String>,
    resources_mentioned: Option<serde_json::Value>,
    tags: Option<Vec<String>>,
    read_time_minutes: Option<i32>,
    view_count: Option<i64>,
    published_at: Option<DateTime<Utc>>,
}

impl EpisodeRow {
    /// Converts a raw row into the wire-shape record. Malformed optional
    /// data (a negative counter, unparseable resources JSON) degrades to an
    /// absent value here and picks up a default in the summary projection;
    /// it never fails the whole row.
    fn into_record(self) -> EpisodeRecord {
        EpisodeRecord {
            id: self.id,
            podcast_name: self.podcast_name,
            podcast_host: self.podcast_host,
            podcast_category: self.podcast_category,
            podcast_artwork_url: self.podcast_artwork_url,
            episode_title: self.episode_title,
            episode_number: to_u32(self.episode_number),
            episode_date: self.episode_date,
            episode_duration_minutes: to_u32(self.episode_duration_minutes),
            guest_name: self.guest_name,
            guest_title: self.guest_title,
            guest_bio: self.guest_bio,
            guest_avatar_url: self.guest_avatar_url,
            summary: self.summary,
            key_takeaways: self.key_takeaways,
            full_notes: self.full_notes,
            resources_mentioned: self
                .resources_mentioned
                .and_then(|value| serde_json::from_value(value).ok()),
            tags: self.tags,
            read_time_minutes: to_u32(self.read_time_minutes),
            view_count: self.view_count.and_then(|v| u64::try_from(v).ok()),
            published_at: self.published_at,
        }
    }

    fn into_summary(self) -> EpisodeSummary {
        self.into_record().into()
    }
}

fn to_u32(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

fn transport(error: sqlx::Error) -> StoreError {
    StoreError::Transport(error.to_string())
}

/// Appends the WHERE clause for a filter set. Shared by the page query and
/// the exact-count query so the two can never disagree.
fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, filters: &EpisodeFilters) {
    let mut prefix = " WHERE ";
    if let Some(category) = &filters.category {
        builder
            .push(prefix)
            .push("podcast_category @> ")
            .push_bind(vec![category.clone()]);
        prefix = " AND ";
    }
    if let Some(search) = &filters.search {
        let pattern = format!("%{search}%");
        builder
            .push(prefix)
            .push("(episode_title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR summary ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR guest_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
}

//=========================================================================================
// `EpisodeStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl EpisodeStore for PgEpisodeStore {
    async fn recent_episodes(&self, limit: u32) -> StoreResult<Vec<EpisodeSummary>> {
        let sql = format!(
            "SELECT {EPISODE_COLUMNS} FROM episodes \
             ORDER BY published_at DESC NULLS LAST LIMIT $1"
        );
        let rows: Vec<EpisodeRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(transport)?;

        Ok(rows.into_iter().map(EpisodeRow::into_summary).collect())
    }

    async fn all_episodes(&self, filters: &EpisodeFilters) -> StoreResult<EpisodePage> {
        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM episodes");
        push_filters(&mut count_query, filters);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(transport)?;

        let mut page_query =
            QueryBuilder::new(format!("SELECT {EPISODE_COLUMNS} FROM episodes"));
        push_filters(&mut page_query, filters);
        page_query.push(match filters.sort {
            SortOrder::Popular => " ORDER BY view_count DESC NULLS LAST",
            SortOrder::Recent => " ORDER BY published_at DESC NULLS LAST",
        });
        page_query
            .push(" OFFSET ")
            .push_bind(i64::from(filters.offset))
            .push(" LIMIT ")
            .push_bind(i64::from(filters.limit));

        let rows: Vec<EpisodeRow> = page_query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(transport)?;

        Ok(EpisodePage {
            episodes: rows.into_iter().map(EpisodeRow::into_summary).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn episode_by_id(&self, id: &str) -> StoreResult<Option<EpisodeSummary>> {
        let sql = format!("SELECT {EPISODE_COLUMNS} FROM episodes WHERE id = $1");
        let row: Option<EpisodeRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(transport)?;

        Ok(row.map(EpisodeRow::into_summary))
    }

    async fn categories(&self) -> StoreResult<Vec<CategorySummary>> {
        // Full-table scan by design; episode volume is small and the
        // counting happens client-side like every other aggregate here.
        let rows: Vec<Option<Vec<String>>> =
            sqlx::query_scalar("SELECT podcast_category FROM episodes")
                .fetch_all(&self.pool)
                .await
                .map_err(transport)?;

        Ok(tally_categories(
            rows.iter().filter_map(|list| list.as_deref()),
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
        let rows: Vec<(Option<i32>, Option<i32>)> =
            sqlx::query_as("SELECT episode_duration_minutes, read_time_minutes FROM episodes")
                .fetch_all(&self.pool)
                .await
                .map_err(transport)?;

        let mut stats = EpisodeStats {
            total_episodes: rows.len() as u64,
            ..EpisodeStats::default()
        };
        for (duration, read_time) in rows {
            stats.total_duration_minutes += u64::from(to_u32(duration).unwrap_or(0));
            stats.total_read_time_minutes += u64::from(to_u32(read_time).unwrap_or(0));
        }
        Ok(stats)
    }
}
