use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{now, time_col, uuid_col, Database, StoreResult};
use crate::models::{CreateInquiryInput, Inquiry, InquiryStatus};

const INQUIRY_COLUMNS: &str = "id, name, email, service, message, status, created_at";

fn row_to_inquiry(row: &Row) -> rusqlite::Result<Inquiry> {
    let status: String = row.get(5)?;
    Ok(Inquiry {
        id: uuid_col(row, 0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        service: row.get(3)?,
        message: row.get(4)?,
        status: InquiryStatus::from_str(&status).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown inquiry status '{}'", status).into(),
            )
        })?,
        created_at: time_col(row, 6)?,
    })
}

impl Database {
    /// Inquiries newest first, optionally filtered by status.
    pub fn list_inquiries(&self, status: Option<InquiryStatus>) -> StoreResult<Vec<Inquiry>> {
        self.with_connection(|conn| {
            let inquiries = match status {
                Some(status) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM inquiries WHERE status = ?1 ORDER BY created_at DESC",
                        INQUIRY_COLUMNS
                    ))?;
                    let rows = stmt.query_map(params![status.as_str()], row_to_inquiry)?;
                    rows.collect::<Result<Vec<_>, _>>()?
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {} FROM inquiries ORDER BY created_at DESC",
                        INQUIRY_COLUMNS
                    ))?;
                    let rows = stmt.query_map([], row_to_inquiry)?;
                    rows.collect::<Result<Vec<_>, _>>()?
                }
            };
            Ok(inquiries)
        })
    }

    pub fn get_inquiry(&self, id: Uuid) -> StoreResult<Option<Inquiry>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {} FROM inquiries WHERE id = ?1", INQUIRY_COLUMNS),
                    params![id.to_string()],
                    row_to_inquiry,
                )
                .optional()?)
        })
    }

    pub fn create_inquiry(&self, input: CreateInquiryInput) -> StoreResult<Inquiry> {
        let inquiry = Inquiry {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            service: input.service.filter(|s| !s.trim().is_empty()),
            message: input.message,
            status: InquiryStatus::New,
            created_at: now(),
        };

        self.with_connection(|conn| {
            conn.execute(
                &format!("INSERT INTO inquiries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)", INQUIRY_COLUMNS),
                params![
                    inquiry.id.to_string(),
                    inquiry.name,
                    inquiry.email,
                    inquiry.service,
                    inquiry.message,
                    inquiry.status.as_str(),
                    inquiry.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        Ok(inquiry)
    }

    pub fn set_inquiry_status(&self, id: Uuid, status: InquiryStatus) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE inquiries SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_inquiry(&self, id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM inquiries WHERE id = ?1", params![id.to_string()])?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(db: &Database, name: &str) -> Inquiry {
        db.create_inquiry(CreateInquiryInput {
            name: name.into(),
            email: format!("{}@client.test", name.to_lowercase()),
            service: Some("  ".into()),
            message: "Looking for a brand refresh".into(),
        })
        .unwrap()
    }

    #[test]
    fn new_inquiries_start_as_new() {
        let db = Database::open_memory().unwrap();
        let inquiry = submit(&db, "Lena");
        assert_eq!(inquiry.status, InquiryStatus::New);
        assert!(inquiry.service.is_none());
    }

    #[test]
    fn filters_by_status() {
        let db = Database::open_memory().unwrap();
        let first = submit(&db, "Lena");
        submit(&db, "Omar");

        assert!(db.set_inquiry_status(first.id, InquiryStatus::InProgress).unwrap());

        let in_progress = db.list_inquiries(Some(InquiryStatus::InProgress)).unwrap();
        assert_eq!(in_progress.len(), 1);
        assert_eq!(in_progress[0].id, first.id);
        assert_eq!(db.list_inquiries(None).unwrap().len(), 2);
    }

    #[test]
    fn status_change_on_missing_inquiry_reports_false() {
        let db = Database::open_memory().unwrap();
        assert!(!db.set_inquiry_status(Uuid::new_v4(), InquiryStatus::Completed).unwrap());
        assert!(!db.delete_inquiry(Uuid::new_v4()).unwrap());
    }
}
