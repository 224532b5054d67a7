use std::sync::Arc;

use crate::config::Config;
use crate::store::{CatalogStore, JsonUserStore, UserDataStore};

/// Shared application state
///
/// The catalog is re-read from disk per request, so only its path lives
/// here. User data sits behind the [`UserDataStore`] trait so tests can
/// substitute the flat-file implementation.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: CatalogStore,
    pub users: Arc<dyn UserDataStore>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let catalog = CatalogStore::new(config.catalog_path.clone());
        let users = Arc::new(JsonUserStore::new(
            config.selections_path.clone(),
            config.ratings_path.clone(),
            config.users_path.clone(),
        ));
        Self {
            config,
            catalog,
            users,
        }
    }

    /// State with an explicit user store, used by tests
    pub fn with_store(config: Config, users: Arc<dyn UserDataStore>) -> Self {
        let catalog = CatalogStore::new(config.catalog_path.clone());
        Self {
            config,
            catalog,
            users,
        }
    }
}
