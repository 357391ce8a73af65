use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// User object as the identity provider reports it. Every field is optional
/// on the wire; [`Session`] is the validated form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    /// Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    #[serde(default)]
    pub user: Option<ProviderUser>,
}

impl ProviderSession {
    pub fn new(access_token: impl Into<String>, id: &str, email: &str) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at: None,
            user: Some(ProviderUser {
                id: Some(id.to_string()),
                email: Some(email.to_string()),
            }),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now.timestamp())
    }
}

/// A provider session that carries both a subject id and an email.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub subject_id: String,
    pub email: String,
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<&ProviderSession> for Session {
    type Error = AuthError;

    fn try_from(raw: &ProviderSession) -> Result<Self, Self::Error> {
        let user = raw.user.as_ref().ok_or(AuthError::MalformedSession)?;
        let subject_id = user
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AuthError::MalformedSession)?;
        let email = user
            .email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or(AuthError::MalformedSession)?;

        Ok(Self {
            subject_id: subject_id.to_string(),
            email: email.to_string(),
            access_token: raw.access_token.clone(),
            expires_at: raw
                .expires_at
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_session_converts() {
        let raw = ProviderSession::new("tok", "sub-1", "a@studio.test");
        let session = Session::try_from(&raw).unwrap();
        assert_eq!(session.subject_id, "sub-1");
        assert_eq!(session.email, "a@studio.test");
        assert!(session.expires_at.is_none());
    }

    #[test]
    fn missing_user_is_malformed() {
        let raw = ProviderSession {
            access_token: "tok".into(),
            expires_at: None,
            user: None,
        };
        assert!(matches!(Session::try_from(&raw), Err(AuthError::MalformedSession)));
    }

    #[test]
    fn blank_email_is_malformed() {
        let raw = ProviderSession::new("tok", "sub-1", "  ");
        assert!(matches!(Session::try_from(&raw), Err(AuthError::MalformedSession)));
    }

    #[test]
    fn expiry_compares_against_now() {
        let now = Utc::now();
        let mut raw = ProviderSession::new("tok", "sub-1", "a@studio.test");
        assert!(!raw.is_expired(now));
        raw.expires_at = Some(now.timestamp() - 1);
        assert!(raw.is_expired(now));
    }
}
