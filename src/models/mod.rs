use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel used when a catalog row carries no genre data
pub const MISSING_GENRES: &str = "NAN";

/// One row of the game catalog
///
/// The `genres` field keeps the raw comma-joined string from the source file;
/// recommendation similarity operates on that raw string, while ranking code
/// splits it via [`CatalogItem::genre_list`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub app_id: String,
    pub name: String,
    pub genres: String,
    pub owners_estimate: u64,
    pub positive: u64,
    pub negative: u64,
}

impl CatalogItem {
    /// Individual genres, trimmed, empty entries dropped, source order kept
    pub fn genre_list(&self) -> Vec<&str> {
        self.genres
            .split(',')
            .map(str::trim)
            .filter(|g| !g.is_empty())
            .collect()
    }

    /// Share of positive votes as a whole-number percentage
    ///
    /// Rounded to the nearest integer; 0.0 when the item has no votes.
    pub fn rating_percent(&self) -> f64 {
        let total = self.positive + self.negative;
        if total == 0 {
            return 0.0;
        }
        (100.0 * self.positive as f64 / total as f64).round()
    }
}

/// Sort key for ranking endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Owners,
    Rating,
}

/// A single star rating a user gave to a catalog item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRating {
    pub username: String,
    pub app_id: String,
    pub rating: u8,
    pub rated_at: DateTime<Utc>,
}

/// A named genre grouping with its ranked member items
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GenreBlock {
    pub genre: String,
    pub items: Vec<CatalogItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(genres: &str, positive: u64, negative: u64) -> CatalogItem {
        CatalogItem {
            app_id: "1".to_string(),
            name: "Test Game".to_string(),
            genres: genres.to_string(),
            owners_estimate: 100,
            positive,
            negative,
        }
    }

    #[test]
    fn test_genre_list_splits_and_trims() {
        let i = item("Action, Indie ,  Strategy", 0, 0);
        assert_eq!(i.genre_list(), vec!["Action", "Indie", "Strategy"]);
    }

    #[test]
    fn test_genre_list_drops_empty_entries() {
        let i = item("Action,, Indie,", 0, 0);
        assert_eq!(i.genre_list(), vec!["Action", "Indie"]);
    }

    #[test]
    fn test_rating_percent_basic() {
        let i = item("Action", 80, 20);
        assert_eq!(i.rating_percent(), 80.0);
    }

    #[test]
    fn test_rating_percent_rounds_to_integer() {
        // 2 / 3 = 66.66..% -> 67
        let i = item("Action", 2, 1);
        assert_eq!(i.rating_percent(), 67.0);
    }

    #[test]
    fn test_rating_percent_no_votes() {
        let i = item("Action", 0, 0);
        assert_eq!(i.rating_percent(), 0.0);
    }

    #[test]
    fn test_sort_key_deserializes_lowercase() {
        let key: SortKey = serde_json::from_str(r#""rating""#).unwrap();
        assert_eq!(key, SortKey::Rating);
        let key: SortKey = serde_json::from_str(r#""owners""#).unwrap();
        assert_eq!(key, SortKey::Owners);
    }
}
