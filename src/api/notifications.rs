use aakkai_core::models::{CreateNotificationInput, Notification};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState, MemberCaller};

pub async fn list_mine(State(state): State<AppState>, member: MemberCaller) -> ApiResult<Json<Vec<Notification>>> {
    Ok(Json(state.db.list_notifications_for(member.profile.id)?))
}

pub async fn send(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Json(input): Json<CreateNotificationInput>,
) -> ApiResult<(StatusCode, Json<Notification>)> {
    if input.title.trim().is_empty() {
        return Err(ApiError::missing_field("title"));
    }
    if input.message.trim().is_empty() {
        return Err(ApiError::missing_field("message"));
    }
    if state.db.get_profile(input.recipient_id)?.is_none() {
        return Err(ApiError::NotFound("recipient"));
    }
    Ok((StatusCode::CREATED, Json(state.db.create_notification(input)?)))
}

pub async fn mark_read(
    State(state): State<AppState>,
    member: MemberCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.mark_notification_read(id, member.profile.id)? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    State(state): State<AppState>,
    member: MemberCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_notification(id, member.profile.id)? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(StatusCode::NO_CONTENT)
}
