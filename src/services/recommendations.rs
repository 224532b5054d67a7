//! Personalized recommendation engine.
//!
//! Two entry points build genre blocks for a user: one from their saved
//! 5-item selection, one from their star ratings. Both reduce the user's
//! taste to a genre query string, rank every distinct catalog genre string
//! by TF-IDF cosine similarity against that query, and assemble ranked item
//! lists for the closest genre strings. An empty result signals the caller
//! to fall back to the non-personalized rankings.

use std::collections::{HashMap, HashSet};

use crate::models::{CatalogItem, GenreBlock, SortKey, UserRating};
use crate::services::rankings::sort_desc;
use crate::services::similarity::{cosine, Vectorizer};

/// Token repetition scale when turning affinity weights into a query
const AFFINITY_SCALE: f64 = 15.0;

/// Star rating to affinity weight
///
/// Low ratings still contribute a small positive signal rather than being
/// dropped outright.
fn rating_weight(rating: u8) -> f64 {
    match rating {
        1 => 0.1,
        2 => 0.3,
        3 => 0.5,
        4 => 0.8,
        5 => 1.0,
        _ => 0.0,
    }
}

/// How often a genre token is repeated in the rating-based query
fn repeat_count(weight: f64) -> usize {
    ((weight * AFFINITY_SCALE).floor() as usize).max(1)
}

/// Accumulated genre affinity from a user's ratings
///
/// Every genre of a rated item receives the full item weight. An empty map
/// means no rated item matched the catalog and no personalization is
/// possible.
pub fn genre_affinity(catalog: &[CatalogItem], ratings: &[UserRating]) -> HashMap<String, f64> {
    let rating_by_id: HashMap<&str, u8> = ratings
        .iter()
        .map(|r| (r.app_id.as_str(), r.rating))
        .collect();

    let mut scores: HashMap<String, f64> = HashMap::new();
    for item in catalog {
        if let Some(&rating) = rating_by_id.get(item.app_id.as_str()) {
            let weight = rating_weight(rating);
            for genre in item.genre_list() {
                *scores.entry(genre.to_string()).or_insert(0.0) += weight;
            }
        }
    }
    scores
}

/// Distinct raw genre strings in first-seen catalog order
fn genre_corpus(catalog: &[CatalogItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut corpus = Vec::new();
    for item in catalog {
        if seen.insert(item.genres.as_str()) {
            corpus.push(item.genres.clone());
        }
    }
    corpus
}

/// Catalog genre strings most similar to the query, best first
///
/// Ties resolve toward earlier corpus entries. Entries that are empty after
/// trimming are dropped, as is everything when the query shares no tokens
/// with the corpus.
fn rank_similar_genre_strings(catalog: &[CatalogItem], query: &str, top_n: usize) -> Vec<String> {
    let corpus = genre_corpus(catalog);
    if corpus.is_empty() {
        return Vec::new();
    }

    let vectorizer = Vectorizer::fit(&corpus);
    let query_vector = vectorizer.transform(query);
    if query_vector.iter().all(|&v| v == 0.0) {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f64)> = corpus
        .iter()
        .map(|doc| cosine(&query_vector, &vectorizer.transform(doc)))
        .enumerate()
        .collect();
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(top_n)
        .map(|(i, _)| corpus[i].clone())
        .filter(|g| !g.trim().is_empty())
        .collect()
}

/// Ranked item lists for each matched genre string
///
/// Matching is a case-insensitive substring test against the raw genre
/// field, so a matched string can pull in rows with partially overlapping
/// genre sets.
fn blocks_for_genre_strings(
    catalog: &[CatalogItem],
    genre_strings: Vec<String>,
    key: SortKey,
    top_games: usize,
) -> Vec<GenreBlock> {
    genre_strings
        .into_iter()
        .map(|genre| {
            let needle = genre.to_lowercase();
            let mut items: Vec<CatalogItem> = catalog
                .iter()
                .filter(|item| item.genres.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            sort_desc(&mut items, key);
            items.truncate(top_games);
            GenreBlock { genre, items }
        })
        .collect()
}

/// Personalized genre blocks from a user's saved 5-item selection
///
/// Returns an empty Vec when no selected id matches the catalog.
pub fn blocks_from_selection(
    catalog: &[CatalogItem],
    selected_ids: &[String],
    key: SortKey,
    top_genres: usize,
    top_games: usize,
) -> Vec<GenreBlock> {
    let selected: HashSet<&str> = selected_ids.iter().map(String::as_str).collect();

    let mut seen = HashSet::new();
    let mut user_genres: Vec<&str> = Vec::new();
    for item in catalog {
        if selected.contains(item.app_id.as_str()) {
            for genre in item.genre_list() {
                if seen.insert(genre) {
                    user_genres.push(genre);
                }
            }
        }
    }

    if user_genres.is_empty() {
        return Vec::new();
    }

    let query = user_genres.join(" ");
    let similar = rank_similar_genre_strings(catalog, &query, top_genres);
    blocks_for_genre_strings(catalog, similar, key, top_games)
}

/// Personalized genre blocks from a user's star ratings
///
/// Genres of rated items are repeated in the query proportionally to their
/// accumulated weight so stronger affinities dominate the similarity signal.
/// Returns an empty Vec when no rated id matches the catalog.
pub fn blocks_from_ratings(
    catalog: &[CatalogItem],
    ratings: &[UserRating],
    key: SortKey,
    top_genres: usize,
    top_games: usize,
) -> Vec<GenreBlock> {
    let affinity = genre_affinity(catalog, ratings);
    if affinity.is_empty() {
        return Vec::new();
    }

    let mut weighted: Vec<String> = Vec::new();
    for (genre, weight) in &affinity {
        for _ in 0..repeat_count(*weight) {
            weighted.push(genre.clone());
        }
    }

    let query = weighted.join(" ");
    let similar = rank_similar_genre_strings(catalog, &query, top_genres);
    blocks_for_genre_strings(catalog, similar, key, top_games)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(app_id: &str, genres: &str, owners: u64) -> CatalogItem {
        CatalogItem {
            app_id: app_id.to_string(),
            name: format!("Game {app_id}"),
            genres: genres.to_string(),
            owners_estimate: owners,
            positive: 0,
            negative: 0,
        }
    }

    fn rating(app_id: &str, stars: u8) -> UserRating {
        UserRating {
            username: "alice".to_string(),
            app_id: app_id.to_string(),
            rating: stars,
            rated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("1", "Action", 100),
            item("2", "Action,Indie", 300),
            item("3", "Indie", 50),
            item("4", "Strategy", 200),
            item("5", "Casual,Strategy", 75),
        ]
    }

    #[test]
    fn test_rating_weight_table() {
        assert_eq!(rating_weight(1), 0.1);
        assert_eq!(rating_weight(2), 0.3);
        assert_eq!(rating_weight(3), 0.5);
        assert_eq!(rating_weight(4), 0.8);
        assert_eq!(rating_weight(5), 1.0);
        assert_eq!(rating_weight(0), 0.0);
    }

    #[test]
    fn test_repeat_count_scales_and_floors_at_one() {
        assert_eq!(repeat_count(1.0), 15);
        assert_eq!(repeat_count(0.5), 7);
        assert_eq!(repeat_count(0.01), 1);
    }

    #[test]
    fn test_genre_affinity_accumulates_full_item_weight() {
        let ratings = vec![rating("1", 5), rating("2", 3)];
        let affinity = genre_affinity(&catalog(), &ratings);

        // Action: 1.0 (item 1) + 0.5 (item 2); Indie: 0.5 (item 2)
        assert!((affinity["Action"] - 1.5).abs() < 1e-9);
        assert!((affinity["Indie"] - 0.5).abs() < 1e-9);
        assert!(!affinity.contains_key("Strategy"));
    }

    #[test]
    fn test_genre_affinity_empty_when_no_catalog_match() {
        let ratings = vec![rating("999", 5)];
        assert!(genre_affinity(&catalog(), &ratings).is_empty());
    }

    #[test]
    fn test_blocks_from_selection_with_overlap() {
        let selected: Vec<String> = ["1", "2", "997", "998", "999"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let blocks = blocks_from_selection(&catalog(), &selected, SortKey::Owners, 10, 20);

        assert!(!blocks.is_empty());
        // The closest genre strings are the ones the user's games carry
        assert!(blocks.iter().any(|b| b.genre.contains("Action")));
        // Within a block, items sort by owners descending
        let first = &blocks[0];
        for pair in first.items.windows(2) {
            assert!(pair[0].owners_estimate >= pair[1].owners_estimate);
        }
    }

    #[test]
    fn test_blocks_from_selection_no_overlap_is_empty() {
        let selected: Vec<String> = (100..105).map(|i| i.to_string()).collect();
        let blocks = blocks_from_selection(&catalog(), &selected, SortKey::Owners, 10, 20);
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_blocks_from_selection_empty_catalog() {
        let selected: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
        assert!(blocks_from_selection(&[], &selected, SortKey::Owners, 10, 20).is_empty());
    }

    #[test]
    fn test_substring_match_pulls_partial_overlaps() {
        // A block for "Action" must include the "Action,Indie" row
        let selected: Vec<String> = vec!["1".to_string()];
        let blocks = blocks_from_selection(&catalog(), &selected, SortKey::Owners, 10, 20);

        let action = blocks.iter().find(|b| b.genre == "Action").unwrap();
        assert!(action.items.iter().any(|i| i.app_id == "2"));
    }

    #[test]
    fn test_blocks_from_ratings_favor_higher_rated_genres() {
        let ratings = vec![rating("4", 5), rating("3", 1)];
        let blocks = blocks_from_ratings(&catalog(), &ratings, SortKey::Owners, 2, 20);

        assert!(!blocks.is_empty());
        // Strategy got weight 1.0 vs Indie 0.1, so the top block leans Strategy
        assert!(blocks[0].genre.contains("Strategy"));
    }

    #[test]
    fn test_blocks_from_ratings_empty_without_matches() {
        let ratings = vec![rating("999", 5)];
        assert!(blocks_from_ratings(&catalog(), &ratings, SortKey::Owners, 10, 20).is_empty());
    }

    #[test]
    fn test_blocks_respect_top_limits() {
        let selected: Vec<String> = vec!["2".to_string()];
        let blocks = blocks_from_selection(&catalog(), &selected, SortKey::Owners, 1, 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].items.len(), 1);
    }
}
