use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Testimonial {
    pub id: Uuid,
    pub content: String,
    pub author: String,
    pub role: String,
    pub company: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTestimonialInput {
    pub content: String,
    pub author: String,
    pub role: String,
    pub company: String,
}

impl CreateTestimonialInput {
    /// All four fields are required.
    pub fn missing_field(&self) -> Option<&'static str> {
        [
            ("content", &self.content),
            ("author", &self.author),
            ("role", &self.role),
            ("company", &self.company),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
    }
}
