//! crates/decoded_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application: the wire shape
//! episodes arrive in (`EpisodeRecord`) and the normalized display shape the
//! pages consume (`EpisodeSummary`). These structs are independent of any
//! database; the serde derives only pin the field names each shape uses on
//! the wire (snake_case in, camelCase out).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a resource referenced from an episode's show notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Book,
    Article,
    Video,
    Tool,
    Paper,
    Podcast,
}

/// A single resource mentioned during an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResource {
    /// Stored under the key `type` in the backend's JSON column.
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    pub url: String,
}

/// One episode row exactly as the backend stores it.
///
/// Every field the authoring process may leave blank is optional here; the
/// projection into [`EpisodeSummary`] is where defaults are applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub podcast_name: String,
    #[serde(default)]
    pub podcast_host: Option<String>,
    #[serde(default)]
    pub podcast_category: Option<Vec<String>>,
    #[serde(default)]
    pub podcast_artwork_url: Option<String>,
    pub episode_title: String,
    #[serde(default)]
    pub episode_number: Option<u32>,
    #[serde(default)]
    pub episode_date: Option<NaiveDate>,
    #[serde(default)]
    pub episode_duration_minutes: Option<u32>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_title: Option<String>,
    #[serde(default)]
    pub guest_bio: Option<String>,
    #[serde(default)]
    pub guest_avatar_url: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub key_takeaways: Option<Vec<String>>,
    #[serde(default)]
    pub full_notes: Option<String>,
    #[serde(default)]
    pub resources_mentioned: Option<Vec<EpisodeResource>>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub read_time_minutes: Option<u32>,
    #[serde(default)]
    pub view_count: Option<u64>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// The display-ready projection of an [`EpisodeRecord`].
///
/// List fields are always present (possibly empty) and the view counter
/// always has a value, so page code never branches on a missing collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeSummary {
    pub id: String,
    pub podcast_name: String,
    pub podcast_host: Option<String>,
    pub categories: Vec<String>,
    pub artwork_url: Option<String>,
    pub title: String,
    pub episode_number: Option<u32>,
    pub episode_date: Option<NaiveDate>,
    pub duration_minutes: Option<u32>,
    pub guest_name: Option<String>,
    pub guest_title: Option<String>,
    pub guest_bio: Option<String>,
    pub guest_avatar_url: Option<String>,
    pub summary: Option<String>,
    pub key_takeaways: Vec<String>,
    pub full_notes: Option<String>,
    pub resources_mentioned: Vec<EpisodeResource>,
    pub tags: Vec<String>,
    pub read_time_minutes: Option<u32>,
    pub view_count: u64,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<EpisodeRecord> for EpisodeSummary {
    fn from(record: EpisodeRecord) -> Self {
        Self {
            id: record.id,
            podcast_name: record.podcast_name,
            podcast_host: record.podcast_host,
            categories: record.podcast_category.unwrap_or_default(),
            artwork_url: record.podcast_artwork_url,
            title: record.episode_title,
            episode_number: record.episode_number,
            episode_date: record.episode_date,
            duration_minutes: record.episode_duration_minutes,
            guest_name: record.guest_name,
            guest_title: record.guest_title,
            guest_bio: record.guest_bio,
            guest_avatar_url: record.guest_avatar_url,
            summary: record.summary,
            key_takeaways: record.key_takeaways.unwrap_or_default(),
            full_notes: record.full_notes,
            resources_mentioned: record.resources_mentioned.unwrap_or_default(),
            tags: record.tags.unwrap_or_default(),
            read_time_minutes: record.read_time_minutes,
            view_count: record.view_count.unwrap_or(0),
            published_at: record.published_at,
        }
    }
}

/// A category label together with how many episodes reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub name: String,
    pub count: u64,
}

/// Accumulates category frequencies from every episode's category list.
///
/// The result is sorted by descending count; ties are broken by name so the
/// ordering is stable across scans.
pub fn tally_categories<'a, I>(category_lists: I) -> Vec<CategorySummary>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut counts: std::collections::HashMap<&str, u64> = std::collections::HashMap::new();
    for list in category_lists {
        for category in list {
            *counts.entry(category.as_str()).or_insert(0) += 1;
        }
    }

    let mut summaries: Vec<CategorySummary> = counts
        .into_iter()
        .map(|(name, count)| CategorySummary {
            name: name.to_owned(),
            count,
        })
        .collect();
    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    summaries
}

/// One page of a filtered episode listing plus the exact count of the full
/// filtered set (needed to derive "has more").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodePage {
    pub episodes: Vec<EpisodeSummary>,
    pub total: u64,
}

/// Aggregate totals shown on the marketing home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeStats {
    pub total_episodes: u64,
    pub total_duration_minutes: u64,
    pub total_read_time_minutes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_record() -> EpisodeRecord {
        EpisodeRecord {
            id: "ep-1".to_owned(),
            podcast_name: "The Drive".to_owned(),
            podcast_host: None,
            podcast_category: None,
            podcast_artwork_url: None,
            episode_title: "Zone 2 training".to_owned(),
            episode_number: None,
            episode_date: None,
            episode_duration_minutes: None,
            guest_name: None,
            guest_title: None,
            guest_bio: None,
            guest_avatar_url: None,
            summary: None,
            key_takeaways: None,
            full_notes: None,
            resources_mentioned: None,
            tags: None,
            read_time_minutes: None,
            view_count: None,
            published_at: None,
        }
    }

    #[test]
    fn projection_fills_defaults_for_missing_fields() {
        let summary = EpisodeSummary::from(bare_record());
        assert_eq!(summary.categories, Vec::<String>::new());
        assert_eq!(summary.key_takeaways, Vec::<String>::new());
        assert_eq!(summary.resources_mentioned, Vec::<EpisodeResource>::new());
        assert_eq!(summary.tags, Vec::<String>::new());
        assert_eq!(summary.view_count, 0);
        assert_eq!(summary.duration_minutes, None);
    }

    #[test]
    fn projection_passes_populated_fields_through() {
        let mut record = bare_record();
        record.podcast_category = Some(vec!["Health".to_owned(), "Longevity".to_owned()]);
        record.view_count = Some(42);
        record.guest_name = Some("Peter Attia".to_owned());

        let summary = EpisodeSummary::from(record);
        assert_eq!(summary.categories.len(), 2);
        assert_eq!(summary.view_count, 42);
        assert_eq!(summary.guest_name.as_deref(), Some("Peter Attia"));
    }

    #[test]
    fn resource_kind_uses_the_wire_key_type() {
        let json = r#"{"type":"book","title":"Lifespan","author":"David Sinclair","url":"https://example.com"}"#;
        let resource: EpisodeResource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.kind, ResourceKind::Book);

        let back = serde_json::to_value(&resource).unwrap();
        assert_eq!(back["type"], "book");
    }

    #[test]
    fn tally_counts_across_episodes_and_sorts_by_descending_count() {
        let lists: Vec<Vec<String>> = vec![
            vec!["AI".to_owned(), "Health".to_owned()],
            vec!["AI".to_owned()],
            vec!["Business".to_owned(), "AI".to_owned()],
            vec!["Health".to_owned()],
        ];
        let refs: Vec<&[String]> = lists.iter().map(Vec::as_slice).collect();

        let tally = tally_categories(refs);
        assert_eq!(
            tally,
            vec![
                CategorySummary { name: "AI".to_owned(), count: 3 },
                CategorySummary { name: "Health".to_owned(), count: 2 },
                CategorySummary { name: "Business".to_owned(), count: 1 },
            ]
        );
    }

    #[test]
    fn tally_of_nothing_is_empty() {
        let tally = tally_categories(std::iter::empty::<&[String]>());
        assert!(tally.is_empty());
    }
}
