use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Derived per-student rollup. Never persisted; recomputed from submissions
/// and lesson views on every aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentProgress {
    pub user_id: Uuid,
    pub name: String,
    pub total_tests: i64,
    pub average_score: f64,
    pub total_time_on_tests: i64,
    pub average_time_per_test: f64,
    pub total_lessons_viewed: i64,
    pub total_lesson_time: i64,
    pub average_time_per_lesson: f64,
    pub subjects: HashMap<String, SubjectProgress>,
}

impl StudentProgress {
    pub fn new(user_id: Uuid, name: String) -> Self {
        Self {
            user_id,
            name,
            total_tests: 0,
            average_score: 0.0,
            total_time_on_tests: 0,
            average_time_per_test: 0.0,
            total_lessons_viewed: 0,
            total_lesson_time: 0,
            average_time_per_lesson: 0.0,
            subjects: HashMap::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.total_tests > 0 || self.total_lessons_viewed > 0
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubjectProgress {
    pub tests: i64,
    pub avg_score: f64,
    pub lessons_viewed: i64,
    pub total_time_seconds: i64,
}

/// Population-wide figures. Averages are submission-weighted: total
/// aggregated time/score divided by the total row count, not a mean of
/// per-student means.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalStats {
    pub average_time_per_test: f64,
    pub average_time_per_lesson: f64,
    pub average_score: f64,
    pub total_active_students: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    pub students: Vec<StudentProgress>,
    pub global: GlobalStats,
}
