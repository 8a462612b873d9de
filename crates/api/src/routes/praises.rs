//! Praise endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::praise::{CreatePraiseRequest, UpdatePraiseRequest};
use domain::models::Praise;
use persistence::repositories::PraiseRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn praise_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Praise {} not found", id))
}

/// List all praises.
///
/// GET /api/v1/praises
pub async fn list_praises(State(state): State<AppState>) -> Result<Json<Vec<Praise>>, ApiError> {
    let repo = PraiseRepository::new(state.pool.clone());
    let praises = repo.find_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(praises))
}

/// Get a praise by id.
///
/// GET /api/v1/praises/:id
pub async fn get_praise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Praise>, ApiError> {
    let repo = PraiseRepository::new(state.pool.clone());
    let praise = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| praise_not_found(id))?;
    Ok(Json(praise.into()))
}

/// Create a praise.
///
/// POST /api/v1/praises
pub async fn create_praise(
    State(state): State<AppState>,
    Json(request): Json<CreatePraiseRequest>,
) -> Result<(StatusCode, Json<Praise>), ApiError> {
    request.validate()?;

    let repo = PraiseRepository::new(state.pool.clone());
    let praise: Praise = repo.create(&request.text).await?.into();

    info!(praise_id = praise.id, "Praise created");
    Ok((StatusCode::CREATED, Json(praise)))
}

/// Update a praise.
///
/// PATCH /api/v1/praises/:id
pub async fn update_praise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePraiseRequest>,
) -> Result<Json<Praise>, ApiError> {
    request.validate()?;

    let repo = PraiseRepository::new(state.pool.clone());
    let praise: Praise = repo
        .update(id, request.text.as_deref())
        .await?
        .ok_or_else(|| praise_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(praise_id = praise.id, "Praise updated");
    }
    Ok(Json(praise))
}

/// Delete a praise.
///
/// DELETE /api/v1/praises/:id
pub async fn delete_praise(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = PraiseRepository::new(state.pool.clone());
    let removed = repo
        .remove(id)
        .await?
        .ok_or_else(|| praise_not_found(id))?;

    info!(praise_id = removed.id, "Praise deleted");
    Ok(StatusCode::NO_CONTENT)
}
