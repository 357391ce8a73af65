use super::{AuthError, ProfileStore, ResolvedUser};

/// Flips a team member's availability and returns the new value.
///
/// The current value is read from the store, not from `user`, so a stale
/// copy cannot flip the flag the wrong way. Nothing is changed unless the
/// write is confirmed.
pub fn toggle_availability(store: &dyn ProfileStore, user: &ResolvedUser) -> Result<bool, AuthError> {
    if !user.is_team_member() {
        return Err(AuthError::NotTeamMember);
    }

    let current = store
        .find_profile(&user.subject_id)?
        .ok_or(AuthError::NotTeamMember)?;

    let next = !current.is_available;
    if !store.set_availability(&user.subject_id, next)? {
        return Err(AuthError::NotTeamMember);
    }

    tracing::info!(subject_id = %user.subject_id, is_available = next, "Availability changed");
    Ok(next)
}
