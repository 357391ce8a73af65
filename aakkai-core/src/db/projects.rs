use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{date_col, date_text, list_col, list_json, now, time_col, uuid_col, Database, StoreError, StoreResult};
use crate::models::{CreateProjectInput, MemberProject, ProjectStatus, UpdateProjectInput};

const PROJECT_COLUMNS: &str = "id, member_id, title, description, image_url, tags, status, \
     start_date, end_date, pdf_url, pdf_filename, created_at, updated_at";

fn row_to_project(row: &Row) -> rusqlite::Result<MemberProject> {
    let status: String = row.get(6)?;
    Ok(MemberProject {
        id: uuid_col(row, 0)?,
        member_id: uuid_col(row, 1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        image_url: row.get(4)?,
        tags: list_col(row, 5)?,
        status: ProjectStatus::from_str(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                6,
                rusqlite::types::Type::Text,
                format!("unknown project status '{}'", status).into(),
            )
        })?,
        start_date: date_col(row, 7)?,
        end_date: date_col(row, 8)?,
        pdf_url: row.get(9)?,
        pdf_filename: row.get(10)?,
        created_at: time_col(row, 11)?,
        updated_at: time_col(row, 12)?,
    })
}

impl Database {
    pub fn list_all_projects(&self) -> StoreResult<Vec<MemberProject>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM member_projects ORDER BY created_at DESC",
                PROJECT_COLUMNS
            ))?;
            let projects = stmt
                .query_map([], row_to_project)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(projects)
        })
    }

    /// Projects owned by one profile, newest first.
    pub fn list_projects_for_member(&self, member_id: Uuid) -> StoreResult<Vec<MemberProject>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM member_projects WHERE member_id = ?1 ORDER BY created_at DESC",
                PROJECT_COLUMNS
            ))?;
            let projects = stmt
                .query_map(params![member_id.to_string()], row_to_project)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(projects)
        })
    }

    pub fn get_project(&self, id: Uuid) -> StoreResult<Option<MemberProject>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM member_projects WHERE id = ?1", PROJECT_COLUMNS),
                    params![id.to_string()],
                    row_to_project,
                )
                .optional()?)
        })
    }

    /// Creates a project for `member_id` and bumps the member's collaborated-project counter.
    pub fn create_project(&self, member_id: Uuid, input: CreateProjectInput) -> StoreResult<MemberProject> {
        let timestamp = now();
        let project = MemberProject {
            id: Uuid::new_v4(),
            member_id,
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            tags: input.tags,
            status: input.status.unwrap_or_default(),
            start_date: input.start_date,
            end_date: input.end_date,
            pdf_url: input.pdf_url,
            pdf_filename: input.pdf_filename,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute(
                &format!(
                    "INSERT INTO member_projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    PROJECT_COLUMNS
                ),
                params![
                    project.id.to_string(),
                    project.member_id.to_string(),
                    project.title,
                    project.description,
                    project.image_url,
                    list_json(&project.tags),
                    project.status.as_str(),
                    date_text(project.start_date),
                    date_text(project.end_date),
                    project.pdf_url,
                    project.pdf_filename,
                    project.created_at.to_rfc3339(),
                    project.updated_at.to_rfc3339(),
                ],
            )?;
            let bumped = tx.execute(
                "UPDATE team_members SET projects_collaborated = projects_collaborated + 1 WHERE id = ?1",
                params![member_id.to_string()],
            )?;
            if bumped == 0 {
                return Err(StoreError::Corrupt(format!("no profile {}", member_id)));
            }
            tx.commit()?;
            Ok(())
        })?;

        Ok(project)
    }

    pub fn update_project(&self, id: Uuid, input: UpdateProjectInput) -> StoreResult<bool> {
        let Some(current) = self.get_project(id)? else {
            return Ok(false);
        };

        let title = input.title.unwrap_or(current.title);
        let description = input.description.unwrap_or(current.description);
        let image_url = input.image_url.unwrap_or(current.image_url);
        let tags = input.tags.unwrap_or(current.tags);
        let status = input.status.unwrap_or(current.status);
        let start_date = input.start_date.unwrap_or(current.start_date);
        let end_date = input.end_date.unwrap_or(current.end_date);
        let pdf_url = input.pdf_url.unwrap_or(current.pdf_url);
        let pdf_filename = input.pdf_filename.unwrap_or(current.pdf_filename);

        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE member_projects SET title = ?1, description = ?2, image_url = ?3, tags = ?4, \
                 status = ?5, start_date = ?6, end_date = ?7, pdf_url = ?8, pdf_filename = ?9, \
                 updated_at = ?10 WHERE id = ?11",
                params![
                    title,
                    description,
                    image_url,
                    list_json(&tags),
                    status.as_str(),
                    date_text(start_date),
                    date_text(end_date),
                    pdf_url,
                    pdf_filename,
                    now().to_rfc3339(),
                    id.to_string()
                ],
            )?;
            Ok(changed > 0)
        })
    }

    /// Deletes a project and gives back the owner's collaborated-project count.
    pub fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let tx = conn.unchecked_transaction()?;
            let member_id: Option<String> = tx
                .query_row(
                    "SELECT member_id FROM member_projects WHERE id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            let Some(member_id) = member_id else {
                return Ok(false);
            };

            tx.execute("DELETE FROM member_projects WHERE id = ?1", params![id.to_string()])?;
            tx.execute(
                "UPDATE team_members SET projects_collaborated = MAX(projects_collaborated - 1, 0) WHERE id = ?1",
                params![member_id],
            )?;
            tx.commit()?;
            Ok(true)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProfileInput;

    fn member(db: &Database) -> Uuid {
        db.create_profile(CreateProfileInput::first_sign_in("sub-1", "a@studio.test"))
            .unwrap()
            .id
    }

    fn input(title: &str) -> CreateProjectInput {
        CreateProjectInput {
            title: title.into(),
            description: "Rebrand".into(),
            image_url: String::new(),
            tags: vec!["Branding".into(), "Logo Design".into()],
            status: None,
            start_date: None,
            end_date: None,
            pdf_url: None,
            pdf_filename: None,
        }
    }

    #[test]
    fn create_defaults_to_planning_and_counts() {
        let db = Database::open_memory().unwrap();
        let member_id = member(&db);

        let project = db.create_project(member_id, input("Café identity")).unwrap();
        assert_eq!(project.status, ProjectStatus::Planning);

        let profile = db.get_profile(member_id).unwrap().unwrap();
        assert_eq!(profile.projects_collaborated, 1);

        let listed = db.list_projects_for_member(member_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].tags, project.tags);
    }

    #[test]
    fn create_for_unknown_member_is_rejected() {
        let db = Database::open_memory().unwrap();
        assert!(db.create_project(Uuid::new_v4(), input("Orphan")).is_err());
        assert!(db.list_all_projects().unwrap().is_empty());
    }

    #[test]
    fn update_changes_status_only() {
        let db = Database::open_memory().unwrap();
        let member_id = member(&db);
        let project = db.create_project(member_id, input("Dashboard")).unwrap();

        let updated = db
            .update_project(
                project.id,
                UpdateProjectInput {
                    status: Some(ProjectStatus::OnHold),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let stored = db.get_project(project.id).unwrap().unwrap();
        assert_eq!(stored.status, ProjectStatus::OnHold);
        assert_eq!(stored.title, "Dashboard");
    }

    #[test]
    fn deleting_profile_cascades_to_projects() {
        let db = Database::open_memory().unwrap();
        let member_id = member(&db);
        db.create_project(member_id, input("One")).unwrap();

        assert!(db.delete_profile(member_id).unwrap());
        assert!(db.list_all_projects().unwrap().is_empty());
    }

    #[test]
    fn delete_gives_back_the_counter() {
        let db = Database::open_memory().unwrap();
        let member_id = member(&db);
        let kept = db.create_project(member_id, input("Kept")).unwrap();
        let dropped = db.create_project(member_id, input("Dropped")).unwrap();

        assert!(db.delete_project(dropped.id).unwrap());
        assert!(!db.delete_project(dropped.id).unwrap());

        let profile = db.get_profile(member_id).unwrap().unwrap();
        assert_eq!(profile.projects_collaborated, 1);
        assert_eq!(db.list_projects_for_member(member_id).unwrap()[0].id, kept.id);
    }

    #[test]
    fn update_can_clear_optional_fields() {
        let db = Database::open_memory().unwrap();
        let member_id = member(&db);
        let mut with_dates = input("Deck");
        with_dates.start_date = chrono::NaiveDate::from_ymd_opt(2024, 3, 1);
        with_dates.end_date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1);
        with_dates.pdf_url = Some("https://cdn.test/deck.pdf".into());
        let project = db.create_project(member_id, with_dates).unwrap();

        db.update_project(
            project.id,
            UpdateProjectInput {
                end_date: Some(None),
                pdf_url: Some(None),
                ..Default::default()
            },
        )
        .unwrap();

        let stored = db.get_project(project.id).unwrap().unwrap();
        assert_eq!(stored.end_date, None);
        assert_eq!(stored.pdf_url, None);
        assert_eq!(stored.start_date, chrono::NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
