use rusqlite::{params, Row};
use uuid::Uuid;

use super::{now, time_col, uuid_col, Database, StoreResult};
use crate::models::{CreateNotificationInput, Notification};

fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
    Ok(Notification {
        id: uuid_col(row, 0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        recipient_id: uuid_col(row, 3)?,
        read: row.get(4)?,
        created_at: time_col(row, 5)?,
    })
}

impl Database {
    pub fn list_notifications_for(&self, recipient_id: Uuid) -> StoreResult<Vec<Notification>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, title, message, recipient_id, read, created_at
                 FROM notifications WHERE recipient_id = ?1 ORDER BY created_at DESC",
            )?;
            let notifications = stmt
                .query_map(params![recipient_id.to_string()], row_to_notification)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(notifications)
        })
    }

    pub fn create_notification(&self, input: CreateNotificationInput) -> StoreResult<Notification> {
        let notification = Notification {
            id: Uuid::new_v4(),
            title: input.title,
            message: input.message,
            recipient_id: input.recipient_id,
            read: false,
            created_at: now(),
        };

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, title, message, recipient_id, read, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    notification.id.to_string(),
                    notification.title,
                    notification.message,
                    notification.recipient_id.to_string(),
                    notification.read,
                    notification.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        Ok(notification)
    }

    /// Marks a notification read. Scoped to the recipient so members cannot
    /// touch each other's inbox.
    pub fn mark_notification_read(&self, id: Uuid, recipient_id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE notifications SET read = 1 WHERE id = ?1 AND recipient_id = ?2",
                params![id.to_string(), recipient_id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }

    pub fn delete_notification(&self, id: Uuid, recipient_id: Uuid) -> StoreResult<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute(
                "DELETE FROM notifications WHERE id = ?1 AND recipient_id = ?2",
                params![id.to_string(), recipient_id.to_string()],
            )?;
            Ok(changed > 0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProfileInput;

    #[test]
    fn inbox_is_scoped_to_recipient() {
        let db = Database::open_memory().unwrap();
        let alice = db
            .create_profile(CreateProfileInput::first_sign_in("a", "alice@studio.test"))
            .unwrap();
        let bob = db
            .create_profile(CreateProfileInput::first_sign_in("b", "bob@studio.test"))
            .unwrap();

        let note = db
            .create_notification(CreateNotificationInput {
                title: "Review".into(),
                message: "Client review on Friday".into(),
                recipient_id: alice.id,
            })
            .unwrap();

        assert!(db.list_notifications_for(bob.id).unwrap().is_empty());
        assert!(!db.mark_notification_read(note.id, bob.id).unwrap());
        assert!(db.mark_notification_read(note.id, alice.id).unwrap());
        assert!(db.list_notifications_for(alice.id).unwrap()[0].read);

        assert!(!db.delete_notification(note.id, bob.id).unwrap());
        assert!(db.delete_notification(note.id, alice.id).unwrap());
    }
}
