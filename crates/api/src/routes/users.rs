//! User endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::user::{CreateUserRequest, UpdateUserRequest};
use domain::models::User;
use persistence::repositories::UserRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn user_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User {} not found", id))
}

/// List all users.
///
/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let users = repo.find_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(users))
}

/// Get a user by id.
///
/// GET /api/v1/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let user = repo.find_by_id(id).await?.ok_or_else(|| user_not_found(id))?;
    Ok(Json(user.into()))
}

/// Create a user.
///
/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user: User = repo
        .create(request.username.trim())
        .await
        .map_err(|e| match ApiError::from(e) {
            ApiError::Conflict(_) => {
                ApiError::Conflict(format!("Username '{}' is already taken", request.username))
            }
            other => other,
        })?
        .into();

    info!(user_id = user.id, username = %user.username, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user.
///
/// PATCH /api/v1/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    request.validate()?;

    let repo = UserRepository::new(state.pool.clone());
    let user: User = repo
        .update(id, request.username.as_deref().map(str::trim))
        .await?
        .ok_or_else(|| user_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(user_id = user.id, "User updated");
    }
    Ok(Json(user))
}

/// Delete a user together with their messages.
///
/// DELETE /api/v1/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let removed = repo.remove(id).await?.ok_or_else(|| user_not_found(id))?;

    info!(user_id = removed.id, username = %removed.username, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
