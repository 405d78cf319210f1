use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyQuizRequest {
    pub material_id: Uuid,
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub answers: Vec<String>,
    #[validate(range(min = 0, message = "time_spent_seconds must be non-negative"))]
    pub time_spent_seconds: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_index: i32,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyQuizResponse {
    pub success: bool,
    pub score: i32,
    pub total_questions: i32,
    pub results: Vec<QuestionResult>,
    pub time_spent_seconds: i32,
}
