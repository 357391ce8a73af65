use std::collections::HashSet;

use aakkai_core::models::Role;

/// Static set of admin email addresses. Comparison ignores case and
/// surrounding whitespace.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            emails: emails
                .into_iter()
                .map(|e| normalize(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&normalize(email))
    }

    /// Role an email would get if the subject had no stored assignment.
    pub fn role_for(&self, email: &str) -> Role {
        if self.contains(email) {
            Role::Admin
        } else {
            Role::TeamMember
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listed_emails_are_admins() {
        let list = AdminAllowList::new(["admin@aakkai.com", "lead@aakkai.com"]);
        assert_eq!(list.role_for("admin@aakkai.com"), Role::Admin);
        assert_eq!(list.role_for("lead@aakkai.com"), Role::Admin);
    }

    #[test]
    fn everyone_else_is_a_team_member() {
        let list = AdminAllowList::new(["admin@aakkai.com"]);
        for email in ["team@aakkai.com", "admin@aakkai.co", "", "admin"] {
            assert_eq!(list.role_for(email), Role::TeamMember, "{email}");
        }
    }

    #[test]
    fn matching_ignores_case_and_padding() {
        let list = AdminAllowList::new(["  Admin@Aakkai.com "]);
        assert!(list.contains("admin@aakkai.com"));
        assert!(list.contains("ADMIN@AAKKAI.COM"));
    }

    #[test]
    fn empty_entries_are_dropped() {
        let list = AdminAllowList::new(["", "  "]);
        assert!(list.is_empty());
        assert_eq!(list.role_for(""), Role::TeamMember);
    }
}
