use crate::dto::quiz_dto::QuestionResult;
use crate::error::{Error, Result};
use crate::models::material::Material;
use crate::models::submission::Submission;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct VerificationService {
    pool: PgPool,
}

#[derive(Debug, Clone)]
pub struct GradedQuiz {
    pub score: i32,
    pub total_questions: i32,
    pub results: Vec<QuestionResult>,
}

impl VerificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A failed Submission insert is logged but the graded result is still
    /// returned.
    pub async fn verify(
        &self,
        user_id: Uuid,
        material_id: Uuid,
        answers: &[String],
        time_spent_seconds: i32,
    ) -> Result<GradedQuiz> {
        let material = sqlx::query_as::<_, Material>(
            r#"SELECT id, title, subject, category, file_url, answer_key, created_by, is_active, created_at, updated_at
               FROM materials WHERE id = $1 AND is_active = TRUE"#,
        )
        .bind(material_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Material not found".to_string()))?;

        let key = answer_key_of(&material)
            .ok_or_else(|| Error::NotFound("Material has no answer key configured".to_string()))?;

        if answers.len() != key.len() {
            return Err(Error::BadRequest(format!(
                "Expected {} answers, received {}",
                key.len(),
                answers.len()
            )));
        }

        let graded = grade_answers(&key, answers);

        let answers_json = serde_json::to_value(answers)?;
        let insert = sqlx::query(
            r#"INSERT INTO submissions (user_id, material_id, answers, score, total_questions, time_spent_seconds)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(user_id)
        .bind(material_id)
        .bind(answers_json)
        .bind(graded.score)
        .bind(graded.total_questions)
        .bind(time_spent_seconds.max(0))
        .execute(&self.pool)
        .await;

        if let Err(e) = insert {
            tracing::error!(
                error = ?e,
                %user_id,
                %material_id,
                "Failed to persist submission; returning graded result anyway"
            );
        }

        Ok(graded)
    }
}

impl VerificationService {
    /// Graded attempts, newest first; every retake is its own row.
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Submission>> {
        let rows = sqlx::query_as::<_, Submission>(
            r#"SELECT id, user_id, material_id, answers, score, total_questions, time_spent_seconds, created_at
               FROM submissions WHERE user_id = $1 ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// An absent, unparsable or empty key all count as "not configured".
pub fn answer_key_of(material: &Material) -> Option<Vec<String>> {
    let key: Vec<String> = serde_json::from_value(material.answer_key.clone()?).ok()?;
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Case-sensitive compare per index; caller has checked the lengths match.
pub fn grade_answers(key: &[String], answers: &[String]) -> GradedQuiz {
    let mut score = 0;
    let mut results = Vec::with_capacity(key.len());

    for (idx, (correct, given)) in key.iter().zip(answers.iter()).enumerate() {
        let is_correct = given == correct;
        if is_correct {
            score += 1;
        }
        results.push(QuestionResult {
            question_index: idx as i32,
            user_answer: given.clone(),
            correct_answer: correct.clone(),
            is_correct,
        });
    }

    GradedQuiz {
        score,
        total_questions: key.len() as i32,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn key(letters: &[&str]) -> Vec<String> {
        letters.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn grades_partial_match() {
        let graded = grade_answers(
            &key(&["A", "B", "C", "D"]),
            &key(&["A", "X", "C", "D"]),
        );
        assert_eq!(graded.score, 3);
        assert_eq!(graded.total_questions, 4);
        assert_eq!(
            graded.results[1],
            QuestionResult {
                question_index: 1,
                user_answer: "X".to_string(),
                correct_answer: "B".to_string(),
                is_correct: false,
            }
        );
    }

    #[test]
    fn grading_is_case_sensitive() {
        let graded = grade_answers(&key(&["A", "B"]), &key(&["a", "B"]));
        assert_eq!(graded.score, 1);
        assert!(!graded.results[0].is_correct);
    }

    #[test]
    fn score_is_bounded() {
        let graded = grade_answers(&key(&["A", "B"]), &key(&["A", "B"]));
        assert_eq!(graded.score, graded.total_questions);

        let graded = grade_answers(&key(&["A", "B"]), &key(&["C", "D"]));
        assert_eq!(graded.score, 0);
    }

    fn material_with_key(answer_key: Option<serde_json::Value>) -> Material {
        let now = Utc::now();
        Material {
            id: uuid::Uuid::new_v4(),
            title: "Quiz".to_string(),
            subject: "math".to_string(),
            category: "tvc".to_string(),
            file_url: None,
            answer_key,
            created_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn missing_empty_or_malformed_key_is_not_configured() {
        assert!(answer_key_of(&material_with_key(None)).is_none());
        assert!(answer_key_of(&material_with_key(Some(serde_json::json!([])))).is_none());
        assert!(answer_key_of(&material_with_key(Some(serde_json::json!("AB")))).is_none());
        assert_eq!(
            answer_key_of(&material_with_key(Some(serde_json::json!(["A", "B"])))),
            Some(key(&["A", "B"]))
        );
    }
}
