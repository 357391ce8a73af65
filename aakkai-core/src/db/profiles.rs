use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{list_col, list_json, now, time_col, uuid_col, Database, StoreResult};
use crate::models::{normalize_email, CreateProfileInput, TeamMemberProfile, UpdateProfileInput, DEFAULT_ROLE_TITLE};

const PROFILE_COLUMNS: &str = "id, user_id, name, email, role, expertise, experience, image_url, \
     is_available, projects_collaborated, created_at, updated_at";

fn row_to_profile(row: &Row) -> rusqlite::Result<TeamMemberProfile> {
    Ok(TeamMemberProfile {
        id: uuid_col(row, 0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        role: row.get(4)?,
        expertise: list_col(row, 5)?,
        experience: row.get(6)?,
        image_url: row.get(7)?,
        is_available: row.get(8)?,
        projects_collaborated: row.get(9)?,
        created_at: time_col(row, 10)?,
        updated_at: time_col(row, 11)?,
    })
}

impl Database {
    pub fn list_profiles(&self) -> StoreResult<Vec<TeamMemberProfile>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM team_members ORDER BY created_at",
                PROFILE_COLUMNS
            ))?;
            let profiles = stmt
                .query_map([], row_to_profile)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(profiles)
        })
    }

    pub fn get_profile(&self, id: Uuid) -> StoreResult<Option<TeamMemberProfile>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM team_members WHERE id = ?1", PROFILE_COLUMNS),
                    params![id.to_string()],
                    row_to_profile,
                )
                .optional()?)
        })
    }

    pub fn find_profile_by_user(&self, user_id: &str) -> StoreResult<Option<TeamMemberProfile>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM team_members WHERE user_id = ?1", PROFILE_COLUMNS),
                    params![user_id],
                    row_to_profile,
                )
                .optional()?)
        })
    }

    /// Finds a profile an admin created for `email` that no subject owns yet.
    pub fn find_unclaimed_profile(&self, email: &str) -> StoreResult<Option<TeamMemberProfile>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!(
                        "SELECT {} FROM team_members WHERE user_id IS NULL AND lower(email) = lower(?1)",
                        PROFILE_COLUMNS
                    ),
                    params![email],
                    row_to_profile,
                )
                .optional()?)
        })
    }

    /// Attaches an unclaimed profile to `user_id`. Returns false if the
    /// profile is gone or already owned.
    pub fn claim_profile(&self, id: Uuid, user_id: &str) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE team_members SET user_id = ?1, updated_at = ?2 WHERE id = ?3 AND user_id IS NULL",
                params![user_id, now().to_rfc3339(), id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn create_profile(&self, input: CreateProfileInput) -> StoreResult<TeamMemberProfile> {
        let timestamp = now();
        let profile = TeamMemberProfile {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            name: input.name,
            email: input.email.as_deref().map(normalize_email),
            role: input.role.unwrap_or_else(|| DEFAULT_ROLE_TITLE.to_string()),
            expertise: input.expertise,
            experience: input.experience,
            image_url: input.image_url,
            is_available: true,
            projects_collaborated: 0,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.with_connection(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO team_members ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    PROFILE_COLUMNS
                ),
                params![
                    profile.id.to_string(),
                    profile.user_id,
                    profile.name,
                    profile.email,
                    profile.role,
                    list_json(&profile.expertise),
                    profile.experience,
                    profile.image_url,
                    profile.is_available,
                    profile.projects_collaborated,
                    profile.created_at.to_rfc3339(),
                    profile.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(profile_id = %profile.id, "Created team member profile");
        Ok(profile)
    }

    pub fn update_profile_by_user(&self, user_id: &str, input: UpdateProfileInput) -> StoreResult<bool> {
        match self.find_profile_by_user(user_id)? {
            Some(current) => self.apply_profile_update(current, input),
            None => Ok(false),
        }
    }

    /// Admin edit of any profile by id.
    pub fn update_profile(&self, id: Uuid, input: UpdateProfileInput) -> StoreResult<bool> {
        match self.get_profile(id)? {
            Some(current) => self.apply_profile_update(current, input),
            None => Ok(false),
        }
    }

    fn apply_profile_update(&self, current: TeamMemberProfile, input: UpdateProfileInput) -> StoreResult<bool> {
        let name = input.name.unwrap_or(current.name);
        let role = input.role.unwrap_or(current.role);
        let expertise = input.expertise.unwrap_or(current.expertise);
        let experience = input.experience.unwrap_or(current.experience);
        let image_url = input.image_url.unwrap_or(current.image_url);

        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE team_members SET name = ?1, role = ?2, expertise = ?3, experience = ?4, \
                 image_url = ?5, updated_at = ?6 WHERE id = ?7",
                params![
                    name,
                    role,
                    list_json(&expertise),
                    experience,
                    image_url,
                    now().to_rfc3339(),
                    current.id.to_string()
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn set_availability(&self, user_id: &str, is_available: bool) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE team_members SET is_available = ?1, updated_at = ?2 WHERE user_id = ?3",
                params![is_available, now().to_rfc3339(), user_id],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_profile(&self, id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM team_members WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
    }

    pub fn count_profiles(&self) -> StoreResult<i64> {
        self.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM team_members", [], |row| row.get(0))?)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreError;

    fn provisioned(email: &str) -> CreateProfileInput {
        CreateProfileInput {
            user_id: None,
            name: "Priya".into(),
            email: Some(email.into()),
            role: Some("Senior Designer".into()),
            expertise: vec!["Branding".into()],
            experience: "6 years".into(),
            image_url: String::new(),
        }
    }

    #[test]
    fn first_sign_in_profile_has_empty_defaults() {
        let db = Database::open_memory().unwrap();
        let profile = db
            .create_profile(CreateProfileInput::first_sign_in("sub-1", "mira@studio.test"))
            .unwrap();

        assert_eq!(profile.name, "mira");
        assert_eq!(profile.role, DEFAULT_ROLE_TITLE);
        assert!(profile.expertise.is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.is_available);
        assert_eq!(profile.projects_collaborated, 0);

        let stored = db.find_profile_by_user("sub-1").unwrap().unwrap();
        assert_eq!(stored, profile);
    }

    #[test]
    fn second_profile_for_same_subject_conflicts() {
        let db = Database::open_memory().unwrap();
        db.create_profile(CreateProfileInput::first_sign_in("sub-1", "a@studio.test"))
            .unwrap();
        let err = db
            .create_profile(CreateProfileInput::first_sign_in("sub-1", "b@studio.test"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn duplicate_email_conflicts() {
        let db = Database::open_memory().unwrap();
        db.create_profile(provisioned("priya@studio.test")).unwrap();
        let err = db.create_profile(provisioned("priya@studio.test")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn unclaimed_profile_can_be_claimed_once() {
        let db = Database::open_memory().unwrap();
        let profile = db.create_profile(provisioned("Priya@Studio.test")).unwrap();

        let found = db.find_unclaimed_profile("priya@studio.test").unwrap().unwrap();
        assert_eq!(found.id, profile.id);

        assert!(db.claim_profile(profile.id, "sub-9").unwrap());
        assert!(!db.claim_profile(profile.id, "sub-10").unwrap());
        assert!(db.find_unclaimed_profile("priya@studio.test").unwrap().is_none());
        assert_eq!(db.find_profile_by_user("sub-9").unwrap().unwrap().id, profile.id);
    }

    #[test]
    fn availability_writes_by_subject() {
        let db = Database::open_memory().unwrap();
        db.create_profile(CreateProfileInput::first_sign_in("sub-1", "a@studio.test"))
            .unwrap();

        assert!(db.set_availability("sub-1", false).unwrap());
        assert!(!db.find_profile_by_user("sub-1").unwrap().unwrap().is_available);
        assert!(!db.set_availability("missing", false).unwrap());
    }

    #[test]
    fn partial_update_keeps_other_fields() {
        let db = Database::open_memory().unwrap();
        db.create_profile(CreateProfileInput::first_sign_in("sub-1", "a@studio.test"))
            .unwrap();

        let updated = db
            .update_profile_by_user(
                "sub-1",
                UpdateProfileInput {
                    expertise: Some(vec!["UI/UX Designing".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let profile = db.find_profile_by_user("sub-1").unwrap().unwrap();
        assert_eq!(profile.expertise, vec!["UI/UX Designing".to_string()]);
        assert_eq!(profile.name, "a");
    }

    #[test]
    fn emails_differing_only_in_case_conflict() {
        let db = Database::open_memory().unwrap();
        let first = db
            .create_profile(CreateProfileInput::first_sign_in("sub-1", "Nila@Aakkai.com"))
            .unwrap();
        assert_eq!(first.email.as_deref(), Some("nila@aakkai.com"));

        let err = db.create_profile(provisioned("nila@aakkai.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(db.count_profiles().unwrap(), 1);
    }

    #[test]
    fn mixed_case_rows_still_collide() {
        let db = Database::open_memory().unwrap();
        db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO team_members (id, name, email, created_at, updated_at) \
                 VALUES ('legacy', 'Legacy', 'Arun@Aakkai.com', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let err = db.create_profile(provisioned("arun@aakkai.com")).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[test]
    fn admin_update_by_id() {
        let db = Database::open_memory().unwrap();
        let profile = db.create_profile(provisioned("priya@studio.test")).unwrap();

        let updated = db
            .update_profile(
                profile.id,
                UpdateProfileInput {
                    role: Some("Art Director".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);
        assert!(!db.update_profile(Uuid::new_v4(), UpdateProfileInput::default()).unwrap());

        let stored = db.get_profile(profile.id).unwrap().unwrap();
        assert_eq!(stored.role, "Art Director");
        assert_eq!(stored.name, "Priya");
    }
}
