use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role title given to profiles created on first sign-in.
pub const DEFAULT_ROLE_TITLE: &str = "Team Member";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMemberProfile {
    pub id: Uuid,
    /// Identity-provider subject. `None` until an admin-provisioned profile is claimed.
    pub user_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    /// Role title shown on the team page, not the access role.
    pub role: String,
    pub expertise: Vec<String>,
    pub experience: String,
    pub image_url: String,
    pub is_available: bool,
    pub projects_collaborated: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProfileInput {
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub image_url: String,
}

impl CreateProfileInput {
    /// Empty profile for a subject seen for the first time.
    pub fn first_sign_in(user_id: &str, email: &str) -> Self {
        let email = normalize_email(email);
        let name = email.split('@').next().unwrap_or(&email).to_string();
        Self {
            user_id: Some(user_id.to_string()),
            name,
            email: Some(email),
            role: None,
            expertise: Vec::new(),
            experience: String::new(),
            image_url: String::new(),
        }
    }
}

/// Profile emails are stored trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    pub name: Option<String>,
    pub role: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub experience: Option<String>,
    pub image_url: Option<String>,
}
