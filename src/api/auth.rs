use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResult, AppState, Caller};
use crate::auth::{OAuthProvider, ResolvedUser};

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub provider: Option<String>,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub user: ResolvedUser,
    pub is_admin: bool,
    pub is_team_member: bool,
    pub degraded: bool,
    /// Why the session is degraded; suitable for a banner.
    pub warning: Option<String>,
}

pub async fn login_url(
    State(state): State<AppState>,
    Query(query): Query<LoginQuery>,
) -> ApiResult<Json<LoginUrl>> {
    let provider = match query.provider.as_deref() {
        None => OAuthProvider::Google,
        Some(name) => OAuthProvider::from_str(name)
            .ok_or_else(|| ApiError::Validation(format!("unsupported provider '{}'", name)))?,
    };
    let redirect_to = query.redirect_to.unwrap_or_else(|| state.redirect_to.clone());
    let url = state.provider.sign_in_with_oauth(provider, &redirect_to)?;
    Ok(Json(LoginUrl { url }))
}

pub async fn session(caller: Caller) -> Json<SessionView> {
    Json(SessionView {
        is_admin: caller.user.is_admin(),
        is_team_member: caller.user.is_team_member(),
        degraded: caller.degraded.is_some(),
        warning: caller.degraded,
        user: caller.user,
    })
}

pub async fn logout(State(state): State<AppState>, caller: Caller) -> ApiResult<StatusCode> {
    state.provider.sign_out(&caller.access_token).await?;
    tracing::info!(subject_id = %caller.user.subject_id, "Signed out");
    Ok(StatusCode::NO_CONTENT)
}
