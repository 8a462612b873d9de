//! Sprint endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::sprint::{CreateSprintRequest, UpdateSprintRequest};
use domain::models::Sprint;
use persistence::repositories::SprintRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn sprint_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Sprint {} not found", id))
}

fn sprint_conflict(err: sqlx::Error) -> ApiError {
    match ApiError::from(err) {
        ApiError::Conflict(_) => {
            ApiError::Conflict("A sprint with this code or title already exists".to_string())
        }
        other => other,
    }
}

/// List all sprints.
///
/// GET /api/v1/sprints
pub async fn list_sprints(State(state): State<AppState>) -> Result<Json<Vec<Sprint>>, ApiError> {
    let repo = SprintRepository::new(state.pool.clone());
    let sprints = repo.find_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(sprints))
}

/// Get a sprint by id.
///
/// GET /api/v1/sprints/:id
pub async fn get_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Sprint>, ApiError> {
    let repo = SprintRepository::new(state.pool.clone());
    let sprint = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| sprint_not_found(id))?;
    Ok(Json(sprint.into()))
}

/// Create a sprint.
///
/// POST /api/v1/sprints
pub async fn create_sprint(
    State(state): State<AppState>,
    Json(request): Json<CreateSprintRequest>,
) -> Result<(StatusCode, Json<Sprint>), ApiError> {
    request.validate()?;

    let repo = SprintRepository::new(state.pool.clone());
    let sprint: Sprint = repo
        .create(request.code.trim(), request.title.trim())
        .await
        .map_err(sprint_conflict)?
        .into();

    info!(sprint_id = sprint.id, code = %sprint.code, "Sprint created");
    Ok((StatusCode::CREATED, Json(sprint)))
}

/// Update a sprint.
///
/// Existing messages keep the title they were rendered with.
///
/// PATCH /api/v1/sprints/:id
pub async fn update_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateSprintRequest>,
) -> Result<Json<Sprint>, ApiError> {
    request.validate()?;

    let repo = SprintRepository::new(state.pool.clone());
    let sprint: Sprint = repo
        .update(
            id,
            request.code.as_deref().map(str::trim),
            request.title.as_deref().map(str::trim),
        )
        .await
        .map_err(sprint_conflict)?
        .ok_or_else(|| sprint_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(sprint_id = sprint.id, code = %sprint.code, "Sprint updated");
    }
    Ok(Json(sprint))
}

/// Delete a sprint together with its messages.
///
/// DELETE /api/v1/sprints/:id
pub async fn delete_sprint(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = SprintRepository::new(state.pool.clone());
    let removed = repo
        .remove(id)
        .await?
        .ok_or_else(|| sprint_not_found(id))?;

    info!(sprint_id = removed.id, code = %removed.code, "Sprint deleted");
    Ok(StatusCode::NO_CONTENT)
}
