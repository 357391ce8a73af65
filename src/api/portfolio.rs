//! Studio portfolio: public listing, admin editing.

use aakkai_core::models::{CreateStudioProjectInput, StudioProject, UpdateStudioProjectInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<StudioProject>>> {
    Ok(Json(state.db.list_studio_projects()?))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Json(input): Json<CreateStudioProjectInput>,
) -> ApiResult<(StatusCode, Json<StudioProject>)> {
    if input.title.trim().is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    let project = state.db.create_studio_project(input)?;
    tracing::info!(project_id = %project.id, "Added portfolio project");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateStudioProjectInput>,
) -> ApiResult<Json<StudioProject>> {
    if input.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(ApiError::missing_field("title"));
    }
    if !state.db.update_studio_project(id, input)? {
        return Err(ApiError::NotFound("project"));
    }
    let project = state.db.get_studio_project(id)?.ok_or(ApiError::NotFound("project"))?;
    Ok(Json(project))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_studio_project(id)? {
        return Err(ApiError::NotFound("project"));
    }
    Ok(StatusCode::NO_CONTENT)
}
