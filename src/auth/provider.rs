use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::{AuthError, ProviderSession};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OAuthProvider {
    Google,
    Github,
    Gitlab,
}

impl OAuthProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Gitlab => "gitlab",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "google" => Some(Self::Google),
            "github" => Some(Self::Github),
            "gitlab" => Some(Self::Gitlab),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChange {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// Auth-state change as emitted by the provider.
#[derive(Debug, Clone)]
pub struct AuthEvent {
    pub change: AuthChange,
    pub session: Option<ProviderSession>,
}

impl AuthEvent {
    pub fn signed_in(session: ProviderSession) -> Self {
        Self {
            change: AuthChange::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            change: AuthChange::SignedOut,
            session: None,
        }
    }
}

/// External identity provider.
///
/// Implementations emit [`AuthEvent`]s in order on the channel returned by
/// [`subscribe`](IdentityProvider::subscribe).
pub trait IdentityProvider: Send + Sync {
    /// Session held by this client, if any and not expired.
    fn get_session(&self) -> BoxFuture<'_, Result<Option<ProviderSession>, AuthError>>;

    /// Looks up the user behind an access token. `Ok(None)` if the provider
    /// rejects the token.
    fn get_user<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<Option<ProviderSession>, AuthError>>;

    /// Adopts the access token handed back by the OAuth redirect as this
    /// client's session.
    fn set_session<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<ProviderSession, AuthError>>;

    /// URL the browser must visit to start an OAuth sign-in.
    fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, AuthError>;

    /// Revokes `access_token` and drops the client session if it is the one held.
    fn sign_out<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Result<(), AuthError>>;

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}
