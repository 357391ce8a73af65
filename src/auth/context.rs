use std::sync::Arc;

use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};

use super::{
    toggle_availability, AuthChange, AuthError, AuthEvent, IdentityProvider, OAuthProvider,
    ProviderSession, Resolution, ResolvedUser, Role, SessionResolver,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "role", rename_all = "snake_case")]
pub enum AuthPhase {
    SignedOut,
    Resolving,
    SignedIn(Role),
}

/// What a client shows: who is signed in and what they may see.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<ResolvedUser>,
    pub is_admin: bool,
    pub is_team_member: bool,
    /// Set when the role came from the allow-list alone because the store failed.
    pub degraded: Option<String>,
    /// Inline error from the last user action.
    pub last_error: Option<String>,
}

/// Owned auth state for one client.
///
/// Created at startup with [`AuthContext::new`], fed with provider events and
/// cleared on sign-out. All methods take `&mut self`, so one resolution is
/// applied completely before the next starts.
pub struct AuthContext {
    provider: Arc<dyn IdentityProvider>,
    resolver: SessionResolver,
    phase: AuthPhase,
    state: AuthState,
    access_token: Option<String>,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn IdentityProvider>, resolver: SessionResolver) -> Self {
        Self {
            provider,
            resolver,
            phase: AuthPhase::SignedOut,
            state: AuthState::default(),
            access_token: None,
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Rehydrates from whatever session the provider already holds.
    pub async fn init(&mut self) -> Result<&AuthState, AuthError> {
        let session = self.provider.get_session().await?;
        self.apply_session(session.as_ref());
        Ok(&self.state)
    }

    /// Starts an OAuth sign-in and returns the URL to open.
    pub fn begin_sign_in(&mut self, provider: OAuthProvider, redirect_to: &str) -> Result<String, AuthError> {
        self.phase = AuthPhase::Resolving;
        match self.provider.sign_in_with_oauth(provider, redirect_to) {
            Ok(url) => Ok(url),
            Err(e) => {
                self.fail_sign_in(&e);
                Err(e)
            }
        }
    }

    /// Finishes a sign-in with the access token from the OAuth redirect.
    pub async fn complete_sign_in(&mut self, access_token: &str) -> Result<&AuthState, AuthError> {
        self.phase = AuthPhase::Resolving;
        match self.provider.set_session(access_token).await {
            Ok(session) => {
                self.apply_session(Some(&session));
                Ok(&self.state)
            }
            Err(e) => {
                self.fail_sign_in(&e);
                Err(e)
            }
        }
    }

    /// Local state is cleared even if the provider call fails.
    pub async fn sign_out(&mut self) -> Result<(), AuthError> {
        let token = self.access_token.take();
        self.clear();
        match token {
            Some(token) => self.provider.sign_out(&token).await,
            None => Ok(()),
        }
    }

    pub fn clear(&mut self) {
        self.phase = AuthPhase::SignedOut;
        self.state = AuthState::default();
        self.access_token = None;
    }

    pub fn handle_event(&mut self, event: AuthEvent) {
        tracing::debug!(change = ?event.change, "Auth state change");
        match event.change {
            AuthChange::SignedOut => self.clear(),
            _ => self.apply_session(event.session.as_ref()),
        }
    }

    /// Processes provider events one at a time until the provider goes away.
    pub async fn run(mut self, mut events: broadcast::Receiver<AuthEvent>) -> Self {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_event(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Missed auth events; re-reading session");
                    if let Err(e) = self.init().await {
                        tracing::warn!(error = %e, "Could not re-read session");
                    }
                }
                Err(RecvError::Closed) => break,
            }
        }
        self
    }

    /// Flips the signed-in member's availability.
    ///
    /// The displayed profile changes only after the store confirms the write;
    /// on failure `last_error` is set and the displayed value is kept.
    pub fn toggle_availability(&mut self) -> Result<bool, AuthError> {
        let user = match (&self.phase, &self.state.user) {
            (AuthPhase::SignedIn(Role::TeamMember), Some(user)) if user.profile.is_some() => user,
            _ => return Err(AuthError::NotTeamMember),
        };

        match toggle_availability(self.resolver.store(), user) {
            Ok(next) => {
                if let Some(profile) = self.state.user.as_mut().and_then(|u| u.profile.as_mut()) {
                    profile.is_available = next;
                }
                self.state.last_error = None;
                Ok(next)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Availability update failed");
                self.state.last_error = Some(format!("Failed to update availability: {}", e));
                Err(e)
            }
        }
    }

    fn apply_session(&mut self, session: Option<&ProviderSession>) {
        if session.is_some() {
            self.phase = AuthPhase::Resolving;
        }

        match self.resolver.resolve(session) {
            Ok(Resolution::SignedOut) => self.clear(),
            Ok(Resolution::Resolved(user)) => self.sign_in(session, user, None),
            Ok(Resolution::Degraded(user, cause)) => {
                self.sign_in(session, user, Some(cause.to_string()))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Rejecting session");
                self.clear();
            }
        }
    }

    fn sign_in(&mut self, session: Option<&ProviderSession>, user: ResolvedUser, degraded: Option<String>) {
        self.phase = AuthPhase::SignedIn(user.role);
        self.access_token = session.map(|s| s.access_token.clone());
        self.state = AuthState {
            is_admin: user.is_admin(),
            is_team_member: user.is_team_member(),
            user: Some(user),
            degraded,
            last_error: None,
        };
    }

    fn fail_sign_in(&mut self, error: &AuthError) {
        tracing::warn!(error = %error, "Sign-in failed");
        self.clear();
        self.state.last_error = Some(error.to_string());
    }
}
