//! Identity-provider sessions, role resolution and the per-client auth context.
//!
//! The provider owns sessions; this module turns a session into a [`Role`]
//! and makes sure the store holds a role assignment (and, for team members, a
//! profile) for the session's subject.

mod allow_list;
mod availability;
mod context;
mod provider;
mod resolver;
mod session;
mod store;
pub mod supabase;

pub use aakkai_core::models::Role;
pub use allow_list::AdminAllowList;
pub use availability::toggle_availability;
pub use context::{AuthContext, AuthPhase, AuthState};
pub use provider::{AuthChange, AuthEvent, BoxFuture, IdentityProvider, OAuthProvider};
pub use resolver::{Resolution, ResolvedUser, SessionResolver};
pub use session::{ProviderSession, ProviderUser, Session};
pub use store::ProfileStore;
pub use supabase::SupabaseAuth;

use aakkai_core::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("session is missing its subject id or email")]
    MalformedSession,

    #[error("not signed in")]
    NotSignedIn,

    #[error("signed-in user has no team member profile")]
    NotTeamMember,

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}
