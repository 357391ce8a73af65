use aakkai_core::models::{TeamMemberProfile, UpdateProfileInput};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult, AppState, MemberCaller};
use crate::auth;

#[derive(Debug, Serialize, Deserialize)]
pub struct Availability {
    pub is_available: bool,
}

pub async fn get_profile(member: MemberCaller) -> Json<TeamMemberProfile> {
    Json(member.profile)
}

pub async fn update_profile(
    State(state): State<AppState>,
    member: MemberCaller,
    Json(input): Json<UpdateProfileInput>,
) -> ApiResult<Json<TeamMemberProfile>> {
    if input.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ApiError::missing_field("name"));
    }
    if input.role.as_deref().is_some_and(|role| role.trim().is_empty()) {
        return Err(ApiError::missing_field("role"));
    }

    let subject_id = &member.caller.user.subject_id;
    if !state.db.update_profile_by_user(subject_id, input)? {
        return Err(ApiError::NotFound("profile"));
    }
    let profile = state
        .db
        .find_profile_by_user(subject_id)?
        .ok_or(ApiError::NotFound("profile"))?;
    Ok(Json(profile))
}

pub async fn toggle_availability(
    State(state): State<AppState>,
    member: MemberCaller,
) -> ApiResult<Json<Availability>> {
    let is_available = auth::toggle_availability(state.resolver.store(), &member.caller.user)?;
    Ok(Json(Availability { is_available }))
}
