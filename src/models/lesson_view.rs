use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One timed viewing session for a non-quiz material. `view_ended_at` and
/// `time_spent_seconds` stay NULL while the view is open; once set, the row
/// is never reopened.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_id: Uuid,
    pub view_started_at: DateTime<Utc>,
    pub view_ended_at: Option<DateTime<Utc>>,
    pub time_spent_seconds: Option<i32>,
    pub created_at: DateTime<Utc>,
}
