use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

pub const CATEGORY_LESSON: &str = "lesson";
pub const CATEGORY_BAC: &str = "bac";
pub const CATEGORY_TVC: &str = "tvc";

pub const CATEGORIES: [&str; 3] = [CATEGORY_LESSON, CATEGORY_BAC, CATEGORY_TVC];

/// A content unit (lesson, BAC model, or TVC quiz) belonging to a subject.
/// `answer_key` is only meaningful for TVC quiz materials and holds an
/// ordered JSON array of correct option letters, one per question.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub category: String,
    pub file_url: Option<String>,
    pub answer_key: Option<JsonValue>,
    pub created_by: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quiz materials are graded; lesson and BAC materials record timed views.
pub fn records_view(category: &str) -> bool {
    category != CATEGORY_TVC
}
