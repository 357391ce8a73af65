use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{list_col, list_json, now, time_col, uuid_col, Database, StoreResult};
use crate::models::{CreateStudioProjectInput, StudioProject, UpdateStudioProjectInput};

const STUDIO_PROJECT_COLUMNS: &str = "id, title, description, image_url, tags, created_at, updated_at";

fn row_to_studio_project(row: &Row) -> rusqlite::Result<StudioProject> {
    Ok(StudioProject {
        id: uuid_col(row, 0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        image_url: row.get(3)?,
        tags: list_col(row, 4)?,
        created_at: time_col(row, 5)?,
        updated_at: time_col(row, 6)?,
    })
}

impl Database {
    /// Portfolio, newest first.
    pub fn list_studio_projects(&self) -> StoreResult<Vec<StudioProject>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM projects ORDER BY created_at DESC",
                STUDIO_PROJECT_COLUMNS
            ))?;
            let projects = stmt
                .query_map([], row_to_studio_project)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(projects)
        })
    }

    pub fn get_studio_project(&self, id: Uuid) -> StoreResult<Option<StudioProject>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM projects WHERE id = ?1", STUDIO_PROJECT_COLUMNS),
                    params![id.to_string()],
                    row_to_studio_project,
                )
                .optional()?)
        })
    }

    pub fn create_studio_project(&self, input: CreateStudioProjectInput) -> StoreResult<StudioProject> {
        let timestamp = now();
        let project = StudioProject {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            image_url: input.image_url,
            tags: input.tags,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.with_connection(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    STUDIO_PROJECT_COLUMNS
                ),
                params![
                    project.id.to_string(),
                    project.title,
                    project.description,
                    project.image_url,
                    list_json(&project.tags),
                    project.created_at.to_rfc3339(),
                    project.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        Ok(project)
    }

    pub fn update_studio_project(&self, id: Uuid, input: UpdateStudioProjectInput) -> StoreResult<bool> {
        let Some(current) = self.get_studio_project(id)? else {
            return Ok(false);
        };

        let title = input.title.unwrap_or(current.title);
        let description = input.description.unwrap_or(current.description);
        let image_url = input.image_url.unwrap_or(current.image_url);
        let tags = input.tags.unwrap_or(current.tags);

        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE projects SET title = ?1, description = ?2, image_url = ?3, tags = ?4, \
                 updated_at = ?5 WHERE id = ?6",
                params![
                    title,
                    description,
                    image_url,
                    list_json(&tags),
                    now().to_rfc3339(),
                    id.to_string()
                ],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_studio_project(&self, id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM projects WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, tags: &[&str]) -> CreateStudioProjectInput {
        CreateStudioProjectInput {
            title: title.into(),
            description: "Identity system".into(),
            image_url: "https://cdn.test/cover.png".into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn created_projects_are_listed() {
        let db = Database::open_memory().unwrap();
        let project = db.create_studio_project(input("Kaapi", &["Branding"])).unwrap();

        let listed = db.list_studio_projects().unwrap();
        assert_eq!(listed, vec![project]);
    }

    #[test]
    fn update_replaces_given_fields() {
        let db = Database::open_memory().unwrap();
        let project = db.create_studio_project(input("Kaapi", &["Branding"])).unwrap();

        let updated = db
            .update_studio_project(
                project.id,
                UpdateStudioProjectInput {
                    tags: Some(vec!["Branding".into(), "Packaging".into()]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated);

        let stored = db.get_studio_project(project.id).unwrap().unwrap();
        assert_eq!(stored.tags.len(), 2);
        assert_eq!(stored.title, "Kaapi");
        assert!(!db.update_studio_project(Uuid::new_v4(), UpdateStudioProjectInput::default()).unwrap());
    }

    #[test]
    fn delete_removes_once() {
        let db = Database::open_memory().unwrap();
        let project = db.create_studio_project(input("Stridewell", &[])).unwrap();

        assert!(db.delete_studio_project(project.id).unwrap());
        assert!(!db.delete_studio_project(project.id).unwrap());
        assert!(db.list_studio_projects().unwrap().is_empty());
    }
}
