//! Non-personalized catalog rankings and search.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{CatalogItem, GenreBlock, SortKey};

/// Sorts items descending by the chosen key
///
/// The sort is stable, so ties keep their original catalog order.
pub(crate) fn sort_desc(items: &mut [CatalogItem], key: SortKey) {
    match key {
        SortKey::Owners => items.sort_by(|a, b| b.owners_estimate.cmp(&a.owners_estimate)),
        SortKey::Rating => items.sort_by(|a, b| {
            b.rating_percent()
                .partial_cmp(&a.rating_percent())
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// Global top-N list over the whole catalog
pub fn top_overall(catalog: &[CatalogItem], key: SortKey, n: usize) -> Vec<CatalogItem> {
    let mut items = catalog.to_vec();
    sort_desc(&mut items, key);
    items.truncate(n);
    items
}

/// Genre blocks over the whole catalog
///
/// Rows are exploded per individual genre, so "Action, Indie" counts under
/// both. Genres rank by summed owners estimate; members rank by `key`.
pub fn top_genre_blocks(
    catalog: &[CatalogItem],
    key: SortKey,
    top_genres: usize,
    top_games: usize,
) -> Vec<GenreBlock> {
    let mut owners_sum: HashMap<&str, u64> = HashMap::new();
    let mut members: HashMap<&str, Vec<CatalogItem>> = HashMap::new();

    for item in catalog {
        for genre in item.genre_list() {
            *owners_sum.entry(genre).or_insert(0) += item.owners_estimate;
            members.entry(genre).or_default().push(item.clone());
        }
    }

    let mut ranked: Vec<(&str, u64)> = owners_sum.into_iter().collect();
    // Name ascending on ties keeps the ranking deterministic
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(top_genres);

    ranked
        .into_iter()
        .map(|(genre, _)| {
            let mut items = members.remove(genre).unwrap_or_default();
            sort_desc(&mut items, key);
            items.truncate(top_games);
            GenreBlock {
                genre: genre.to_string(),
                items,
            }
        })
        .collect()
}

/// Case-insensitive substring search over name and app id
///
/// An empty query returns the full catalog.
pub fn search(catalog: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return catalog.to_vec();
    }

    catalog
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&query) || item.app_id.contains(&query))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(app_id: &str, name: &str, genres: &str, owners: u64, pos: u64, neg: u64) -> CatalogItem {
        CatalogItem {
            app_id: app_id.to_string(),
            name: name.to_string(),
            genres: genres.to_string(),
            owners_estimate: owners,
            positive: pos,
            negative: neg,
        }
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("1", "Boom", "Action", 100, 80, 20),
            item("2", "Quiet Farm", "Indie", 50, 40, 10),
            item("3", "Blockade", "Action, Indie", 200, 30, 70),
        ]
    }

    #[test]
    fn test_top_overall_by_owners() {
        let top = top_overall(&catalog(), SortKey::Owners, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].app_id, "3");
        assert_eq!(top[1].app_id, "1");
    }

    #[test]
    fn test_top_overall_by_rating() {
        let top = top_overall(&catalog(), SortKey::Rating, 3);
        // 80% > 80% (stable: id 1 before id 2) > 30%
        assert_eq!(top[0].app_id, "1");
        assert_eq!(top[1].app_id, "2");
        assert_eq!(top[2].app_id, "3");
    }

    #[test]
    fn test_top_overall_truncates() {
        assert_eq!(top_overall(&catalog(), SortKey::Owners, 1).len(), 1);
        assert_eq!(top_overall(&catalog(), SortKey::Owners, 99).len(), 3);
    }

    #[test]
    fn test_two_item_catalog_ranking() {
        let c = vec![
            item("1", "A", "Action", 100, 80, 20),
            item("2", "B", "Indie", 50, 40, 10),
        ];
        let top = top_overall(&c, SortKey::Owners, 1);
        assert_eq!(top[0].app_id, "1");
        assert_eq!(top[0].rating_percent(), 80.0);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let c = vec![
            item("a", "First", "Action", 10, 0, 0),
            item("b", "Second", "Action", 10, 0, 0),
            item("c", "Third", "Action", 10, 0, 0),
        ];
        let top = top_overall(&c, SortKey::Owners, 3);
        let ids: Vec<&str> = top.iter().map(|i| i.app_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_genre_blocks_explode_multi_genre_rows() {
        let blocks = top_genre_blocks(&catalog(), SortKey::Owners, 10, 20);

        let action = blocks.iter().find(|b| b.genre == "Action").unwrap();
        let indie = blocks.iter().find(|b| b.genre == "Indie").unwrap();

        // Item 3 ("Action, Indie") must appear under both genres
        assert!(action.items.iter().any(|i| i.app_id == "3"));
        assert!(indie.items.iter().any(|i| i.app_id == "3"));
    }

    #[test]
    fn test_genre_blocks_rank_by_summed_owners() {
        let blocks = top_genre_blocks(&catalog(), SortKey::Owners, 10, 20);
        // Action: 100 + 200 = 300, Indie: 50 + 200 = 250
        assert_eq!(blocks[0].genre, "Action");
        assert_eq!(blocks[1].genre, "Indie");
    }

    #[test]
    fn test_genre_blocks_truncate_genres_and_games() {
        let blocks = top_genre_blocks(&catalog(), SortKey::Owners, 1, 1);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].items.len(), 1);
        assert_eq!(blocks[0].items[0].app_id, "3");
    }

    #[test]
    fn test_search_matches_name_and_id_case_insensitive() {
        let c = catalog();
        assert_eq!(search(&c, "boom").len(), 1);
        assert_eq!(search(&c, "QUIET").len(), 1);
        assert_eq!(search(&c, "3").len(), 1);
        assert!(search(&c, "zzz").is_empty());
    }

    #[test]
    fn test_search_empty_query_returns_all() {
        assert_eq!(search(&catalog(), "  ").len(), 3);
    }
}
