use rusqlite::{params, OptionalExtension};

use super::{now, time_col, Database, StoreError, StoreResult};
use crate::models::{Role, RoleAssignment};

impl Database {
    pub fn find_role(&self, user_id: &str) -> StoreResult<Option<RoleAssignment>> {
        self.with_connection(|conn| {
            let row = conn
                .query_row(
                    "SELECT user_id, role, created_at FROM user_roles WHERE user_id = ?1",
                    params![user_id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, time_col(row, 2)?)),
                )
                .optional()?;

            row.map(|(user_id, role, created_at)| {
                let role = Role::from_str(&role)
                    .ok_or_else(|| StoreError::Corrupt(format!("unknown role '{}'", role)))?;
                Ok(RoleAssignment {
                    user_id,
                    role,
                    created_at,
                })
            })
            .transpose()
        })
    }

    /// Inserts a role assignment. Fails with [`StoreError::Conflict`] if the
    /// subject already has one; existing assignments are never overwritten.
    pub fn insert_role(&self, user_id: &str, role: Role) -> StoreResult<RoleAssignment> {
        let assignment = RoleAssignment {
            user_id: user_id.to_string(),
            role,
            created_at: now(),
        };
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO user_roles (user_id, role, created_at) VALUES (?1, ?2, ?3)",
                params![
                    assignment.user_id,
                    assignment.role.as_str(),
                    assignment.created_at.to_rfc3339()
                ],
            )?;
            Ok(())
        })?;
        Ok(assignment)
    }

    pub fn count_roles(&self) -> StoreResult<i64> {
        self.with_connection(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM user_roles", [], |row| row.get(0))?)
        })
    }
}
