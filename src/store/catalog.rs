use std::path::Path;

use serde::Deserialize;

use crate::error::AppResult;
use crate::models::{CatalogItem, MISSING_GENRES};

/// Raw CSV row as it appears in the catalog file
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "AppID")]
    app_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Genres")]
    genres: Option<String>,
    #[serde(rename = "Estimated owners", default)]
    owners_estimate: u64,
    #[serde(rename = "Positive", default)]
    positive: u64,
    #[serde(rename = "Negative", default)]
    negative: u64,
}

impl From<CatalogRecord> for CatalogItem {
    fn from(record: CatalogRecord) -> Self {
        let genres = match record.genres {
            Some(g) if !g.trim().is_empty() => g,
            _ => MISSING_GENRES.to_string(),
        };

        CatalogItem {
            app_id: record.app_id,
            name: record.name,
            genres,
            owners_estimate: record.owners_estimate,
            positive: record.positive,
            negative: record.negative,
        }
    }
}

/// Loader for the static catalog CSV
///
/// The catalog is read fresh on every request; a missing file is treated as
/// an empty catalog rather than an error.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: String,
}

impl CatalogStore {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> AppResult<Vec<CatalogItem>> {
        if !Path::new(&self.path).exists() {
            tracing::warn!(path = %self.path, "catalog file missing, serving empty catalog");
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut items = Vec::new();

        for result in reader.deserialize::<CatalogRecord>() {
            match result {
                Ok(record) => items.push(CatalogItem::from(record)),
                Err(e) => {
                    // Skip rows the source exported badly instead of failing
                    // the whole catalog.
                    tracing::warn!(error = %e, "skipping malformed catalog row");
                }
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "AppID,Name,Genres,Estimated owners,Positive,Negative\n";

    fn write_catalog(rows: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}{}", HEADER, rows).unwrap();
        file
    }

    #[test]
    fn test_load_basic_catalog() {
        let file = write_catalog("1,Portal,\"Puzzle,Action\",100,80,20\n2,Dwarfs,Indie,50,40,10\n");
        let items = CatalogStore::new(file.path().to_str().unwrap())
            .load()
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].app_id, "1");
        assert_eq!(items[0].genre_list(), vec!["Puzzle", "Action"]);
        assert_eq!(items[1].owners_estimate, 50);
    }

    #[test]
    fn test_missing_genres_get_sentinel() {
        let file = write_catalog("1,Mystery Game,,100,0,0\n");
        let items = CatalogStore::new(file.path().to_str().unwrap())
            .load()
            .unwrap();

        assert_eq!(items[0].genres, MISSING_GENRES);
    }

    #[test]
    fn test_missing_file_is_empty_catalog() {
        let store = CatalogStore::new("/nonexistent/items.csv");
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let file = write_catalog("1,Good Game,Action,100,80,20\n2,Bad Game,Action,not-a-number,1,1\n");
        let items = CatalogStore::new(file.path().to_str().unwrap())
            .load()
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Good Game");
    }
}
