use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, GenreBlock, SortKey, UserRating};
use crate::services::{rankings, recommendations};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TopParams {
    pub sort_by: Option<SortKey>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct GenreParams {
    pub sort_by: Option<SortKey>,
    pub genre_limit: Option<usize>,
    pub game_limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationParams {
    pub sort_by: Option<SortKey>,
}

/// Which signal produced the recommendation blocks
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Ratings,
    Selections,
    Popular,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub source: RecommendationSource,
    pub blocks: Vec<GenreBlock>,
}

#[derive(Debug, Deserialize)]
pub struct SaveSelectionRequest {
    pub app_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub app_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub app_id: String,
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub username: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "healthy" })),
    )
}

/// Full catalog, optionally filtered by a search query
pub async fn get_catalog(
    State(state): State<AppState>,
    Query(params): Query<CatalogQuery>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let catalog = state.catalog.load()?;
    let items = match params.q {
        Some(q) => rankings::search(&catalog, &q),
        None => catalog,
    };
    Ok(Json(items))
}

/// Single catalog item by app id
pub async fn get_item(
    State(state): State<AppState>,
    Path(app_id): Path<String>,
) -> AppResult<Json<CatalogItem>> {
    let catalog = state.catalog.load()?;
    catalog
        .into_iter()
        .find(|item| item.app_id == app_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No catalog item with id '{app_id}'")))
}

/// Global top list
pub async fn top_rankings(
    State(state): State<AppState>,
    Query(params): Query<TopParams>,
) -> AppResult<Json<Vec<CatalogItem>>> {
    let catalog = state.catalog.load()?;
    let key = params.sort_by.unwrap_or_default();
    let limit = params.limit.unwrap_or(state.config.top_overall);
    Ok(Json(rankings::top_overall(&catalog, key, limit)))
}

/// Global genre blocks
pub async fn genre_rankings(
    State(state): State<AppState>,
    Query(params): Query<GenreParams>,
) -> AppResult<Json<Vec<GenreBlock>>> {
    let catalog = state.catalog.load()?;
    let key = params.sort_by.unwrap_or_default();
    let genre_limit = params.genre_limit.unwrap_or(state.config.top_genres);
    let game_limit = params.game_limit.unwrap_or(state.config.top_games);
    Ok(Json(rankings::top_genre_blocks(
        &catalog,
        key,
        genre_limit,
        game_limit,
    )))
}

/// Personalized recommendation blocks for a user
///
/// Prefers the rating signal, falls back to the saved selection, and finally
/// to the non-personalized genre blocks.
pub async fn get_recommendations(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(params): Query<RecommendationParams>,
) -> AppResult<Json<RecommendationsResponse>> {
    let catalog = state.catalog.load()?;
    let key = params.sort_by.unwrap_or_default();
    let top_genres = state.config.top_genres;
    let top_games = state.config.top_games;

    let ratings = state.users.ratings_for(&username).await?;
    if !ratings.is_empty() {
        let blocks =
            recommendations::blocks_from_ratings(&catalog, &ratings, key, top_genres, top_games);
        if !blocks.is_empty() {
            tracing::info!(%username, blocks = blocks.len(), "serving rating-based blocks");
            return Ok(Json(RecommendationsResponse {
                source: RecommendationSource::Ratings,
                blocks,
            }));
        }
    }

    let selection = state.users.selection_for(&username).await?;
    if !selection.is_empty() {
        let blocks =
            recommendations::blocks_from_selection(&catalog, &selection, key, top_genres, top_games);
        if !blocks.is_empty() {
            tracing::info!(%username, blocks = blocks.len(), "serving selection-based blocks");
            return Ok(Json(RecommendationsResponse {
                source: RecommendationSource::Selections,
                blocks,
            }));
        }
    }

    tracing::info!(%username, "no personalization signal, serving popular blocks");
    let blocks = rankings::top_genre_blocks(&catalog, key, top_genres, top_games);
    Ok(Json(RecommendationsResponse {
        source: RecommendationSource::Popular,
        blocks,
    }))
}

/// The user's saved selection
pub async fn get_selections(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<SelectionResponse>> {
    let app_ids = state.users.selection_for(&username).await?;
    Ok(Json(SelectionResponse { app_ids }))
}

/// Replaces the user's selection wholesale
pub async fn put_selections(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<SaveSelectionRequest>,
) -> AppResult<StatusCode> {
    state.users.save_selection(&username, request.app_ids).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All ratings the user has recorded
pub async fn get_ratings(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<Vec<UserRating>>> {
    let ratings = state.users.ratings_for(&username).await?;
    Ok(Json(ratings))
}

/// Records or updates a star rating
pub async fn post_rating(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(request): Json<RateRequest>,
) -> AppResult<StatusCode> {
    if !(1..=5).contains(&request.rating) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between 1 and 5, got {}",
            request.rating
        )));
    }
    state
        .users
        .upsert_rating(&username, &request.app_id, request.rating)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let username = request.username.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("Username must not be empty".into()));
    }
    if request.password.is_empty() {
        return Err(AppError::InvalidInput("Password must not be empty".into()));
    }
    if request.password != request.confirm {
        return Err(AppError::InvalidInput("Passwords do not match".into()));
    }

    state.users.register_user(username, &request.password).await?;
    tracing::info!(%username, "registered new user");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            username: username.to_string(),
        }),
    ))
}

/// Verifies credentials
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let valid = state
        .users
        .verify_user(&request.username, &request.password)
        .await?;
    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }
    Ok(Json(AuthResponse {
        username: request.username,
    }))
}
