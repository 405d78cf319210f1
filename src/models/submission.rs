use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

/// One graded quiz attempt. Immutable once written; repeated attempts by the
/// same user for the same material each append a new row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub material_id: Uuid,
    pub answers: JsonValue,
    pub score: i32,
    pub total_questions: i32,
    pub time_spent_seconds: i32,
    pub created_at: DateTime<Utc>,
}
