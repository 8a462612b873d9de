//! Message endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::message::{CreateMessageRequest, ListMessagesQuery, UpdateMessageRequest};
use domain::models::{Message, MessageView};
use persistence::repositories::MessageRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn message_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Message {} not found", id))
}

/// List messages, optionally filtered by username and/or sprint code.
///
/// GET /api/v1/messages?username=<name>&sprint=<code>
pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let repo = MessageRepository::new(state.pool.clone());

    let username = query.username.as_deref().filter(|u| !u.is_empty());
    let sprint = query.sprint.as_deref().filter(|s| !s.is_empty());

    let rows = match (username, sprint) {
        (Some(username), Some(sprint)) => repo
            .find_by_username(username)
            .await?
            .into_iter()
            .filter(|row| row.sprint_code == sprint)
            .collect(),
        (Some(username), None) => repo.find_by_username(username).await?,
        (None, Some(sprint)) => repo.find_by_sprint_code(sprint).await?,
        (None, None) => repo.find_all_detailed().await?,
    };

    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

/// Get a message by id.
///
/// GET /api/v1/messages/:id
pub async fn get_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, ApiError> {
    let repo = MessageRepository::new(state.pool.clone());
    let message = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| message_not_found(id))?;
    Ok(Json(message.into()))
}

/// Compose a congratulatory message and relay it to chat.
///
/// The chat delivery runs in the background after the message is stored.
///
/// POST /api/v1/messages
pub async fn create_message(
    State(state): State<AppState>,
    Json(request): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    request.validate()?;

    let message = state
        .composer
        .compose_and_create(&request.username, &request.sprint_code)
        .await?;

    state
        .dispatcher
        .dispatch(message.id, message.rendered_text.clone());

    Ok((StatusCode::CREATED, Json(message)))
}

/// Edit the text of a stored message.
///
/// PATCH /api/v1/messages/:id
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateMessageRequest>,
) -> Result<Json<Message>, ApiError> {
    request.validate()?;

    let repo = MessageRepository::new(state.pool.clone());
    let message: Message = repo
        .update(id, request.rendered_text.as_deref())
        .await?
        .ok_or_else(|| message_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(message_id = message.id, "Message updated");
    }
    Ok(Json(message))
}

/// Delete a message.
///
/// DELETE /api/v1/messages/:id
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = MessageRepository::new(state.pool.clone());
    let removed = repo
        .remove(id)
        .await?
        .ok_or_else(|| message_not_found(id))?;

    info!(message_id = removed.id, "Message deleted");
    Ok(StatusCode::NO_CONTENT)
}
