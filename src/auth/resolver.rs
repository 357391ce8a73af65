use std::sync::Arc;

use aakkai_core::models::{CreateProfileInput, Role, TeamMemberProfile};
use aakkai_core::{StoreError, StoreResult};
use serde::Serialize;

use super::{AdminAllowList, AuthError, ProfileStore, ProviderSession, Session};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResolvedUser {
    pub subject_id: String,
    pub email: String,
    pub role: Role,
    /// Known only for team members whose profile could be read or created.
    pub profile: Option<TeamMemberProfile>,
}

impl ResolvedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_team_member(&self) -> bool {
        self.role == Role::TeamMember
    }
}

/// Outcome of resolving a session.
#[derive(Debug)]
pub enum Resolution {
    SignedOut,
    Resolved(ResolvedUser),
    /// The store could not be read or written. The role is whatever could be
    /// established, falling back to the allow-list computation.
    Degraded(ResolvedUser, StoreError),
}

impl Resolution {
    pub fn user(&self) -> Option<&ResolvedUser> {
        match self {
            Self::SignedOut => None,
            Self::Resolved(user) | Self::Degraded(user, _) => Some(user),
        }
    }

    pub fn into_user(self) -> Option<ResolvedUser> {
        match self {
            Self::SignedOut => None,
            Self::Resolved(user) | Self::Degraded(user, _) => Some(user),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(..))
    }
}

/// Turns provider sessions into roles and provisions the records a signed-in
/// subject needs.
#[derive(Clone)]
pub struct SessionResolver {
    allow_list: AdminAllowList,
    store: Arc<dyn ProfileStore>,
}

impl SessionResolver {
    pub fn new(allow_list: AdminAllowList, store: Arc<dyn ProfileStore>) -> Self {
        Self { allow_list, store }
    }

    pub fn allow_list(&self) -> &AdminAllowList {
        &self.allow_list
    }

    pub fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }

    /// Resolves a session into a role.
    ///
    /// `None` resolves to [`Resolution::SignedOut`]. A session without a
    /// subject id or email fails with [`AuthError::MalformedSession`]. Store
    /// failures never fail the call; they produce [`Resolution::Degraded`].
    pub fn resolve(&self, session: Option<&ProviderSession>) -> Result<Resolution, AuthError> {
        let Some(raw) = session else {
            return Ok(Resolution::SignedOut);
        };
        let session = Session::try_from(raw)?;
        Ok(self.resolve_subject(&session.subject_id, &session.email))
    }

    fn resolve_subject(&self, subject_id: &str, email: &str) -> Resolution {
        let computed = self.allow_list.role_for(email);
        let mut user = ResolvedUser {
            subject_id: subject_id.to_string(),
            email: email.to_string(),
            role: computed,
            profile: None,
        };

        match self.ensure_role(subject_id, computed) {
            Ok(role) => user.role = role,
            Err(cause) => {
                tracing::warn!(subject_id, error = %cause, "Role lookup failed; using computed role");
                return Resolution::Degraded(user, cause);
            }
        }

        if user.role == Role::TeamMember {
            match self.ensure_profile(subject_id, email) {
                Ok(profile) => user.profile = Some(profile),
                Err(cause) => {
                    tracing::warn!(subject_id, error = %cause, "Profile provisioning failed");
                    return Resolution::Degraded(user, cause);
                }
            }
        }

        tracing::debug!(subject_id, role = %user.role, "Resolved session");
        Resolution::Resolved(user)
    }

    /// Read-or-insert of the role assignment. A stored role always wins over
    /// the computed one.
    fn ensure_role(&self, subject_id: &str, computed: Role) -> StoreResult<Role> {
        if let Some(stored) = self.store.find_role(subject_id)? {
            if stored != computed {
                tracing::debug!(
                    subject_id,
                    stored = %stored,
                    computed = %computed,
                    "Keeping stored role"
                );
            }
            return Ok(stored);
        }

        match self.store.insert_role(subject_id, computed) {
            Ok(()) => {
                tracing::info!(subject_id, role = %computed, "Assigned role");
                Ok(computed)
            }
            // Another resolution inserted first; take what it stored.
            Err(StoreError::Conflict(msg)) => self
                .store
                .find_role(subject_id)?
                .ok_or(StoreError::Conflict(msg)),
            Err(e) => Err(e),
        }
    }

    fn ensure_profile(&self, subject_id: &str, email: &str) -> StoreResult<TeamMemberProfile> {
        if let Some(profile) = self.store.find_profile(subject_id)? {
            return Ok(profile);
        }

        if let Some(profile) = self.store.claim_profile(subject_id, email)? {
            tracing::info!(subject_id, profile_id = %profile.id, "Claimed provisioned profile");
            return Ok(profile);
        }

        match self
            .store
            .insert_profile(CreateProfileInput::first_sign_in(subject_id, email))
        {
            Ok(profile) => {
                tracing::info!(subject_id, profile_id = %profile.id, "Created profile on first sign-in");
                Ok(profile)
            }
            Err(StoreError::Conflict(msg)) => self
                .store
                .find_profile(subject_id)?
                .ok_or(StoreError::Conflict(msg)),
            Err(e) => Err(e),
        }
    }
}
