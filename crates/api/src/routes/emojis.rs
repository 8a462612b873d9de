//! Emoji endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::emoji::{CreateEmojiRequest, UpdateEmojiRequest};
use domain::models::Emoji;
use persistence::repositories::EmojiRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn emoji_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Emoji {} not found", id))
}

/// List all emojis.
///
/// GET /api/v1/emojis
pub async fn list_emojis(State(state): State<AppState>) -> Result<Json<Vec<Emoji>>, ApiError> {
    let repo = EmojiRepository::new(state.pool.clone());
    let emojis = repo.find_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(emojis))
}

/// Get a emoji by id.
///
/// GET /api/v1/emojis/:id
pub async fn get_emoji(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Emoji>, ApiError> {
    let repo = EmojiRepository::new(state.pool.clone());
    let emoji = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| emoji_not_found(id))?;
    Ok(Json(emoji.into()))
}

/// Create a emoji.
///
/// POST /api/v1/emojis
pub async fn create_emoji(
    State(state): State<AppState>,
    Json(request): Json<CreateEmojiRequest>,
) -> Result<(StatusCode, Json<Emoji>), ApiError> {
    request.validate()?;

    let repo = EmojiRepository::new(state.pool.clone());
    let emoji: Emoji = repo.create(&request.glyph).await?.into();

    info!(emoji_id = emoji.id, "Emoji created");
    Ok((StatusCode::CREATED, Json(emoji)))
}

/// Update a emoji.
///
/// PATCH /api/v1/emojis/:id
pub async fn update_emoji(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEmojiRequest>,
) -> Result<Json<Emoji>, ApiError> {
    request.validate()?;

    let repo = EmojiRepository::new(state.pool.clone());
    let emoji: Emoji = repo
        .update(id, request.glyph.as_deref())
        .await?
        .ok_or_else(|| emoji_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(emoji_id = emoji.id, "Emoji updated");
    }
    Ok(Json(emoji))
}

/// Delete a emoji.
///
/// DELETE /api/v1/emojis/:id
pub async fn delete_emoji(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = EmojiRepository::new(state.pool.clone());
    let removed = repo
        .remove(id)
        .await?
        .ok_or_else(|| emoji_not_found(id))?;

    info!(emoji_id = removed.id, "Emoji deleted");
    Ok(StatusCode::NO_CONTENT)
}
