use aakkai_core::models::{CreateProjectInput, MemberProject, UpdateProjectInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState, MemberCaller};

/// Loads a project and checks it belongs to the caller. Someone else's
/// project reads as missing.
fn owned_project(state: &AppState, member: &MemberCaller, id: Uuid) -> ApiResult<MemberProject> {
    state
        .db
        .get_project(id)?
        .filter(|project| project.member_id == member.profile.id)
        .ok_or(ApiError::NotFound("project"))
}

fn check_dates(start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) -> ApiResult<()> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ApiError::Validation(
            "'end_date' must not be before 'start_date'".into(),
        )),
        _ => Ok(()),
    }
}

pub async fn list_mine(State(state): State<AppState>, member: MemberCaller) -> ApiResult<Json<Vec<MemberProject>>> {
    Ok(Json(state.db.list_projects_for_member(member.profile.id)?))
}

pub async fn list_all(State(state): State<AppState>, _admin: AdminCaller) -> ApiResult<Json<Vec<MemberProject>>> {
    Ok(Json(state.db.list_all_projects()?))
}

pub async fn get_one(
    State(state): State<AppState>,
    member: MemberCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MemberProject>> {
    Ok(Json(owned_project(&state, &member, id)?))
}

pub async fn create(
    State(state): State<AppState>,
    member: MemberCaller,
    Json(input): Json<CreateProjectInput>,
) -> ApiResult<(StatusCode, Json<MemberProject>)> {
    if input.title.trim().is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    check_dates(input.start_date, input.end_date)?;

    let project = state.db.create_project(member.profile.id, input)?;
    tracing::info!(project_id = %project.id, member_id = %member.profile.id, "Created project");
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update(
    State(state): State<AppState>,
    member: MemberCaller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProjectInput>,
) -> ApiResult<Json<MemberProject>> {
    let current = owned_project(&state, &member, id)?;
    if input.title.as_deref().is_some_and(|title| title.trim().is_empty()) {
        return Err(ApiError::missing_field("title"));
    }
    check_dates(
        input.start_date.unwrap_or(current.start_date),
        input.end_date.unwrap_or(current.end_date),
    )?;

    state.db.update_project(id, input)?;
    Ok(Json(owned_project(&state, &member, id)?))
}

pub async fn remove(
    State(state): State<AppState>,
    member: MemberCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    owned_project(&state, &member, id)?;
    state.db.delete_project(id)?;
    Ok(StatusCode::NO_CONTENT)
}
