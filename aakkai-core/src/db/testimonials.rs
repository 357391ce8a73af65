use rusqlite::{params, Row};
use uuid::Uuid;

use super::{now, time_col, uuid_col, Database, StoreResult};
use crate::models::{CreateTestimonialInput, Testimonial};

fn row_to_testimonial(row: &Row) -> rusqlite::Result<Testimonial> {
    Ok(Testimonial {
        id: uuid_col(row, 0)?,
        content: row.get(1)?,
        author: row.get(2)?,
        role: row.get(3)?,
        company: row.get(4)?,
        created_at: time_col(row, 5)?,
        updated_at: time_col(row, 6)?,
    })
}

impl Database {
    pub fn list_testimonials(&self) -> StoreResult<Vec<Testimonial>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, content, author, role, company, created_at, updated_at
                 FROM testimonials ORDER BY created_at",
            )?;
            let testimonials = stmt
                .query_map([], row_to_testimonial)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(testimonials)
        })
    }

    pub fn create_testimonial(&self, input: CreateTestimonialInput) -> StoreResult<Testimonial> {
        let timestamp = now();
        let testimonial = Testimonial {
            id: Uuid::new_v4(),
            content: input.content,
            author: input.author,
            role: input.role,
            company: input.company,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO testimonials (id, content, author, role, company, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    testimonial.id.to_string(),
                    testimonial.content,
                    testimonial.author,
                    testimonial.role,
                    testimonial.company,
                    testimonial.created_at.to_rfc3339(),
                    testimonial.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        Ok(testimonial)
    }

    pub fn delete_testimonial(&self, id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM testimonials WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_testimonials_are_listed_until_deleted() {
        let db = Database::open_memory().unwrap();
        let created = db
            .create_testimonial(CreateTestimonialInput {
                content: "Sharp work".into(),
                author: "Meera".into(),
                role: "Founder".into(),
                company: "Kaapi Co.".into(),
            })
            .unwrap();

        let listed = db.list_testimonials().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].company, "Kaapi Co.");

        assert!(db.delete_testimonial(created.id).unwrap());
        assert!(!db.delete_testimonial(created.id).unwrap());
        assert!(db.list_testimonials().unwrap().is_empty());
    }
}
