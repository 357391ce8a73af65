use aakkai_core::models::{CreateProfileInput, Role, TeamMemberProfile};
use aakkai_core::{Database, StoreResult};

/// The slice of the record store the resolver and availability toggle use.
pub trait ProfileStore: Send + Sync {
    fn find_role(&self, user_id: &str) -> StoreResult<Option<Role>>;

    /// Fails with `StoreError::Conflict` if a role is already stored.
    fn insert_role(&self, user_id: &str, role: Role) -> StoreResult<()>;

    fn find_profile(&self, user_id: &str) -> StoreResult<Option<TeamMemberProfile>>;

    /// Attaches a pre-provisioned, unowned profile with this email to `user_id`.
    fn claim_profile(&self, user_id: &str, email: &str) -> StoreResult<Option<TeamMemberProfile>>;

    fn insert_profile(&self, input: CreateProfileInput) -> StoreResult<TeamMemberProfile>;

    /// Returns false if the subject has no profile.
    fn set_availability(&self, user_id: &str, is_available: bool) -> StoreResult<bool>;
}

impl ProfileStore for Database {
    fn find_role(&self, user_id: &str) -> StoreResult<Option<Role>> {
        Ok(Database::find_role(self, user_id)?.map(|assignment| assignment.role))
    }

    fn insert_role(&self, user_id: &str, role: Role) -> StoreResult<()> {
        Database::insert_role(self, user_id, role).map(|_| ())
    }

    fn find_profile(&self, user_id: &str) -> StoreResult<Option<TeamMemberProfile>> {
        self.find_profile_by_user(user_id)
    }

    fn claim_profile(&self, user_id: &str, email: &str) -> StoreResult<Option<TeamMemberProfile>> {
        let Some(unclaimed) = self.find_unclaimed_profile(email)? else {
            return Ok(None);
        };
        if !Database::claim_profile(self, unclaimed.id, user_id)? {
            return Ok(None);
        }
        self.find_profile_by_user(user_id)
    }

    fn insert_profile(&self, input: CreateProfileInput) -> StoreResult<TeamMemberProfile> {
        self.create_profile(input)
    }

    fn set_availability(&self, user_id: &str, is_available: bool) -> StoreResult<bool> {
        Database::set_availability(self, user_id, is_available)
    }
}
