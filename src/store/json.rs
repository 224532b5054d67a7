use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::UserRating;
use crate::store::UserDataStore;

/// Number of items a stored selection must contain
pub const SELECTION_SIZE: usize = 5;

/// Flat-file JSON implementation of [`UserDataStore`]
///
/// Each store is a single JSON file rewritten wholesale on update. A per-file
/// mutex serializes read-modify-write cycles within this process; concurrent
/// processes writing the same file remain last-write-wins.
pub struct JsonUserStore {
    selections_path: String,
    ratings_path: String,
    users_path: String,
    selections_lock: Mutex<()>,
    ratings_lock: Mutex<()>,
    users_lock: Mutex<()>,
}

impl JsonUserStore {
    pub fn new(
        selections_path: impl Into<String>,
        ratings_path: impl Into<String>,
        users_path: impl Into<String>,
    ) -> Self {
        Self {
            selections_path: selections_path.into(),
            ratings_path: ratings_path.into(),
            users_path: users_path.into(),
            selections_lock: Mutex::new(()),
            ratings_lock: Mutex::new(()),
            users_lock: Mutex::new(()),
        }
    }
}

/// Reads a JSON file, treating a missing file as the type's empty default
async fn read_or_default<T: DeserializeOwned + Default>(path: &str) -> AppResult<T> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

async fn write_json<T: Serialize>(path: &str, value: &T) -> AppResult<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let bytes = serde_json::to_vec_pretty(value)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid stored password hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

type SelectionMap = HashMap<String, Vec<String>>;
type UserMap = HashMap<String, String>;

#[async_trait::async_trait]
impl UserDataStore for JsonUserStore {
    async fn selection_for(&self, username: &str) -> AppResult<Vec<String>> {
        let selections: SelectionMap = read_or_default(&self.selections_path).await?;
        Ok(selections.get(username).cloned().unwrap_or_default())
    }

    async fn save_selection(&self, username: &str, app_ids: Vec<String>) -> AppResult<()> {
        if app_ids.len() != SELECTION_SIZE {
            return Err(AppError::InvalidInput(format!(
                "A selection must contain exactly {} items, got {}",
                SELECTION_SIZE,
                app_ids.len()
            )));
        }

        let _guard = self.selections_lock.lock().await;
        let mut selections: SelectionMap = read_or_default(&self.selections_path).await?;
        selections.insert(username.to_string(), app_ids);
        write_json(&self.selections_path, &selections).await
    }

    async fn ratings_for(&self, username: &str) -> AppResult<Vec<UserRating>> {
        let ratings: Vec<UserRating> = read_or_default(&self.ratings_path).await?;
        Ok(ratings
            .into_iter()
            .filter(|r| r.username == username)
            .collect())
    }

    async fn upsert_rating(&self, username: &str, app_id: &str, rating: u8) -> AppResult<()> {
        let _guard = self.ratings_lock.lock().await;
        let mut ratings: Vec<UserRating> = read_or_default(&self.ratings_path).await?;

        match ratings
            .iter_mut()
            .find(|r| r.username == username && r.app_id == app_id)
        {
            Some(existing) => {
                existing.rating = rating;
                existing.rated_at = Utc::now();
            }
            None => ratings.push(UserRating {
                username: username.to_string(),
                app_id: app_id.to_string(),
                rating,
                rated_at: Utc::now(),
            }),
        }

        write_json(&self.ratings_path, &ratings).await
    }

    async fn register_user(&self, username: &str, password: &str) -> AppResult<()> {
        let _guard = self.users_lock.lock().await;
        let mut users: UserMap = read_or_default(&self.users_path).await?;

        if users.contains_key(username) {
            return Err(AppError::InvalidInput(format!(
                "Username '{username}' is already taken"
            )));
        }

        users.insert(username.to_string(), hash_password(password)?);
        write_json(&self.users_path, &users).await
    }

    async fn verify_user(&self, username: &str, password: &str) -> AppResult<bool> {
        let users: UserMap = read_or_default(&self.users_path).await?;
        match users.get(username) {
            Some(hash) => verify_password(password, hash),
            None => Ok(false),
        }
    }
}
