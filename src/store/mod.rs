//! Persistence layer: the read-only catalog file and the per-user flat-file
//! stores for selections, ratings, and accounts.

pub mod catalog;
pub mod json;

pub use catalog::CatalogStore;
pub use json::JsonUserStore;

use crate::error::AppResult;
use crate::models::UserRating;

/// Abstraction over the per-user data stores
///
/// Handlers depend on this trait rather than on the flat-file implementation,
/// mirroring how the catalog and user data could later move behind a real
/// database without touching the HTTP layer.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserDataStore: Send + Sync {
    /// The user's saved selection, empty if none was ever stored
    async fn selection_for(&self, username: &str) -> AppResult<Vec<String>>;

    /// Stores a selection wholesale, replacing any previous one
    ///
    /// Rejects any selection whose length is not exactly 5, leaving the
    /// stored state unchanged.
    async fn save_selection(&self, username: &str, app_ids: Vec<String>) -> AppResult<()>;

    /// All ratings recorded for one user
    async fn ratings_for(&self, username: &str) -> AppResult<Vec<UserRating>>;

    /// Inserts or replaces the rating for (username, app_id)
    ///
    /// At most one record per pair is kept; repeated identical calls are
    /// idempotent. Range validation happens at the HTTP boundary.
    async fn upsert_rating(&self, username: &str, app_id: &str, rating: u8) -> AppResult<()>;

    /// Creates a new account, rejecting duplicate usernames
    async fn register_user(&self, username: &str, password: &str) -> AppResult<()>;

    /// Checks credentials against the stored password hash
    async fn verify_user(&self, username: &str, password: &str) -> AppResult<bool>;
}
