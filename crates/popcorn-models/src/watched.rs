use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::movie::MovieDetails;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedEntry {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub imdb_rating: Option<f64>,
    pub runtime_minutes: Option<u32>,
    pub user_rating: u8, // 1-10 integer
    pub added_at: DateTime<Utc>,
}

impl WatchedEntry {
    /// Build an entry from loaded details plus the user's rating.
    pub fn from_details(details: &MovieDetails, user_rating: u8) -> Self {
        Self {
            imdb_id: details.imdb_id.clone(),
            title: details.title.clone(),
            year: details.year.clone(),
            poster_url: details.poster_url.clone(),
            imdb_rating: details.imdb_rating,
            runtime_minutes: details.runtime_minutes,
            user_rating,
            added_at: Utc::now(),
        }
    }
}

/// Aggregates over the watched list. Each mean is computed over the entries
/// that carry the field; `None` means there is no data to average.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedStats {
    pub count: usize,
    pub mean_imdb_rating: Option<f64>,
    pub mean_user_rating: Option<f64>,
    pub mean_runtime_minutes: Option<f64>,
}

impl WatchedStats {
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            mean_imdb_rating: mean(entries.iter().filter_map(|e| e.imdb_rating)),
            mean_user_rating: mean(entries.iter().map(|e| f64::from(e.user_rating))),
            mean_runtime_minutes: mean(
                entries
                    .iter()
                    .filter_map(|e| e.runtime_minutes.map(f64::from)),
            ),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / f64::from(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_entry(imdb_id: &str, user_rating: u8) -> WatchedEntry {
        WatchedEntry {
            imdb_id: imdb_id.to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            imdb_rating: Some(8.8),
            runtime_minutes: Some(148),
            user_rating,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_from_details_maps_fields() {
        let details = MovieDetails {
            imdb_id: "tt1375666".to_string(),
            title: "Inception".to_string(),
            year: "2010".to_string(),
            poster_url: "https://example.com/poster.jpg".to_string(),
            runtime_minutes: Some(148),
            imdb_rating: Some(8.8),
            plot: "A thief who steals corporate secrets.".to_string(),
            released: "16 Jul 2010".to_string(),
            actors: "Leonardo DiCaprio".to_string(),
            director: "Christopher Nolan".to_string(),
            genre: "Action, Sci-Fi".to_string(),
        };

        let entry = WatchedEntry::from_details(&details, 8);

        assert_eq!(entry.imdb_id, "tt1375666");
        assert_eq!(entry.runtime_minutes, Some(148));
        assert_eq!(entry.imdb_rating, Some(8.8));
        assert_eq!(entry.user_rating, 8);
    }

    #[test]
    fn test_stats_means() {
        let mut a = create_entry("tt0000001", 6);
        a.imdb_rating = Some(8.0);
        a.runtime_minutes = Some(100);
        let mut b = create_entry("tt0000002", 10);
        b.imdb_rating = Some(9.0);
        b.runtime_minutes = Some(140);

        let stats = WatchedStats::from_entries(&[a, b]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_imdb_rating, Some(8.5));
        assert_eq!(stats.mean_user_rating, Some(8.0));
        assert_eq!(stats.mean_runtime_minutes, Some(120.0));
    }

    #[test]
    fn test_stats_skip_missing_fields() {
        let mut a = create_entry("tt0000001", 7);
        a.imdb_rating = None;
        a.runtime_minutes = None;
        let b = create_entry("tt0000002", 9);

        let stats = WatchedStats::from_entries(&[a, b]);

        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean_imdb_rating, Some(8.8));
        assert_eq!(stats.mean_runtime_minutes, Some(148.0));
        assert_eq!(stats.mean_user_rating, Some(8.0));
    }

    #[test]
    fn test_stats_empty_collection_has_no_means() {
        let stats = WatchedStats::from_entries(&[]);

        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean_imdb_rating, None);
        assert_eq!(stats.mean_user_rating, None);
        assert_eq!(stats.mean_runtime_minutes, None);
    }

    #[test]
    fn test_entry_round_trips_through_json() {
        let entry = create_entry("tt1375666", 8);
        let json = serde_json::to_string(&entry).unwrap();
        let back: WatchedEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(back, entry);
    }
}
