//! Template endpoint handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::template::{CreateTemplateRequest, UpdateTemplateRequest};
use domain::models::Template;
use persistence::repositories::TemplateRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

fn template_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Template {} not found", id))
}

/// List all templates.
///
/// GET /api/v1/templates
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<Template>>, ApiError> {
    let repo = TemplateRepository::new(state.pool.clone());
    let templates = repo.find_all().await?.into_iter().map(Into::into).collect();
    Ok(Json(templates))
}

/// Get a template by id.
///
/// GET /api/v1/templates/:id
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Template>, ApiError> {
    let repo = TemplateRepository::new(state.pool.clone());
    let template = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| template_not_found(id))?;
    Ok(Json(template.into()))
}

/// Create a template.
///
/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    request.validate()?;

    let repo = TemplateRepository::new(state.pool.clone());
    let template: Template = repo.create(&request.text).await?.into();

    info!(template_id = template.id, "Template created");
    Ok((StatusCode::CREATED, Json(template)))
}

/// Update a template.
///
/// PATCH /api/v1/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<Template>, ApiError> {
    request.validate()?;

    let repo = TemplateRepository::new(state.pool.clone());
    let template: Template = repo
        .update(id, request.text.as_deref())
        .await?
        .ok_or_else(|| template_not_found(id))?
        .into();

    if !request.is_empty() {
        info!(template_id = template.id, "Template updated");
    }
    Ok(Json(template))
}

/// Delete a template.
///
/// DELETE /api/v1/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let repo = TemplateRepository::new(state.pool.clone());
    let removed = repo
        .remove(id)
        .await?
        .ok_or_else(|| template_not_found(id))?;

    info!(template_id = removed.id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}
