//! Request extractors for the resolved caller.

use aakkai_core::models::TeamMemberProfile;
use axum::{extract::FromRequestParts, http::request::Parts};

use super::{ApiError, AppState};
use crate::auth::{Resolution, ResolvedUser};

/// Any signed-in caller.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: ResolvedUser,
    pub access_token: String,
    /// Store failure hit while resolving; the role is the computed one.
    pub degraded: Option<String>,
}

/// A caller whose role is admin.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Caller);

/// A team member caller with a profile.
#[derive(Debug, Clone)]
pub struct MemberCaller {
    pub caller: Caller,
    pub profile: TeamMemberProfile,
}

/// Token from `Authorization: Bearer <token>`. The scheme name is matched
/// case-insensitively.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?.to_string();

        let session = state
            .provider
            .get_user(&token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        match state.resolver.resolve(Some(&session))? {
            Resolution::SignedOut => Err(ApiError::Unauthorized),
            Resolution::Resolved(user) => Ok(Self {
                user,
                access_token: token,
                degraded: None,
            }),
            Resolution::Degraded(user, cause) => Ok(Self {
                user,
                access_token: token,
                degraded: Some(cause.to_string()),
            }),
        }
    }
}

impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if !caller.user.is_admin() {
            return Err(ApiError::Forbidden("admin role required"));
        }
        Ok(Self(caller))
    }
}

impl FromRequestParts<AppState> for MemberCaller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if !caller.user.is_team_member() {
            return Err(ApiError::Forbidden("team member role required"));
        }
        match caller.user.profile.clone() {
            Some(profile) => Ok(Self { caller, profile }),
            None => Err(ApiError::Unavailable(
                caller
                    .degraded
                    .clone()
                    .unwrap_or_else(|| "profile is not available".into()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(authorization: &str) -> Parts {
        Request::builder()
            .header(axum::http::header::AUTHORIZATION, authorization)
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[test]
    fn scheme_is_case_insensitive() {
        assert_eq!(bearer_token(&parts("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&parts("bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&parts("BEARER  abc ")), Some("abc"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(bearer_token(&parts("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&parts("Bearer ")), None);
        assert_eq!(bearer_token(&parts("Bearerabc")), None);
    }
}
