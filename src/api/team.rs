use aakkai_core::models::{CreateProfileInput, TeamMemberProfile, UpdateProfileInput};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::{AdminCaller, ApiError, ApiResult, AppState};

/// What the public team page shows; no email or subject id.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub expertise: Vec<String>,
    pub experience: String,
    pub image_url: String,
    pub is_available: bool,
    pub projects_collaborated: i64,
}

impl From<TeamMemberProfile> for PublicProfile {
    fn from(profile: TeamMemberProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            role: profile.role,
            expertise: profile.expertise,
            experience: profile.experience,
            image_url: profile.image_url,
            is_available: profile.is_available,
            projects_collaborated: profile.projects_collaborated,
        }
    }
}

pub async fn list_public(State(state): State<AppState>) -> ApiResult<Json<Vec<PublicProfile>>> {
    let profiles = state.db.list_profiles()?;
    Ok(Json(profiles.into_iter().map(PublicProfile::from).collect()))
}

pub async fn list_all(State(state): State<AppState>, _admin: AdminCaller) -> ApiResult<Json<Vec<TeamMemberProfile>>> {
    Ok(Json(state.db.list_profiles()?))
}

/// Creates a profile ahead of the member's first sign-in. The member claims
/// it by signing in with the same email.
pub async fn provision(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Json(mut input): Json<CreateProfileInput>,
) -> ApiResult<(StatusCode, Json<TeamMemberProfile>)> {
    if input.name.trim().is_empty() {
        return Err(ApiError::missing_field("name"));
    }
    let email = input
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| email.contains('@'))
        .ok_or_else(|| ApiError::Validation("'email' must be a valid email address".into()))?
        .to_lowercase();
    input.email = Some(email);
    input.user_id = None;

    let profile = state.db.create_profile(input).map_err(|e| match e {
        aakkai_core::StoreError::Conflict(_) => {
            ApiError::Conflict("a team member with this email already exists".into())
        }
        other => other.into(),
    })?;

    tracing::info!(profile_id = %profile.id, by = %admin.user.subject_id, "Provisioned team member");
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update(
    State(state): State<AppState>,
    AdminCaller(admin): AdminCaller,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateProfileInput>,
) -> ApiResult<Json<TeamMemberProfile>> {
    if input.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
        return Err(ApiError::missing_field("name"));
    }
    if input.role.as_deref().is_some_and(|role| role.trim().is_empty()) {
        return Err(ApiError::missing_field("role"));
    }
    if !state.db.update_profile(id, input)? {
        return Err(ApiError::NotFound("team member"));
    }

    tracing::info!(profile_id = %id, by = %admin.user.subject_id, "Updated team member");
    let profile = state.db.get_profile(id)?.ok_or(ApiError::NotFound("team member"))?;
    Ok(Json(profile))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.db.delete_profile(id)? {
        return Err(ApiError::NotFound("team member"));
    }
    Ok(StatusCode::NO_CONTENT)
}
