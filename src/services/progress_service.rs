use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::profile::Profile;
use crate::models::progress::{GlobalStats, ProgressReport, StudentProgress};

#[derive(Debug, Clone, FromRow)]
pub struct SubmissionRecord {
    pub user_id: Uuid,
    pub score: i32,
    pub total_questions: i32,
    pub time_spent_seconds: i32,
    pub subject: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ViewRecord {
    pub user_id: Uuid,
    pub time_spent_seconds: i32,
    pub subject: String,
    pub category: String,
}

/// Read-only batch aggregation; the three loads carry no snapshot guarantee.
#[derive(Clone)]
pub struct ProgressService {
    pool: PgPool,
}

impl ProgressService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn report(&self) -> Result<ProgressReport> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"SELECT id, name, email, role, is_active, created_at, updated_at
               FROM profiles ORDER BY name"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let submissions = sqlx::query_as::<_, SubmissionRecord>(
            r#"SELECT s.user_id, s.score, s.total_questions, s.time_spent_seconds, m.subject
               FROM submissions s
               JOIN materials m ON m.id = s.material_id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let views = sqlx::query_as::<_, ViewRecord>(
            r#"SELECT v.user_id, v.time_spent_seconds, m.subject, m.category
               FROM lesson_views v
               JOIN materials m ON m.id = v.material_id
               WHERE v.time_spent_seconds IS NOT NULL"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(compute_report(&profiles, &submissions, &views))
    }

    pub async fn report_for(&self, user_id: Uuid) -> Result<StudentProgress> {
        let report = self.report().await?;
        report
            .students
            .into_iter()
            .find(|s| s.user_id == user_id)
            .ok_or_else(|| Error::NotFound("Profile not found".to_string()))
    }
}

pub fn score_percentage(score: i32, total_questions: i32) -> f64 {
    if total_questions > 0 {
        score as f64 / total_questions as f64 * 100.0
    } else {
        0.0
    }
}

/// Two-pass: the fold keeps per-subject incremental means, the second pass
/// recomputes headline averages from the filtered rows. Global averages are
/// submission-weighted.
pub fn compute_report(
    profiles: &[Profile],
    submissions: &[SubmissionRecord],
    views: &[ViewRecord],
) -> ProgressReport {
    let mut by_user: HashMap<Uuid, StudentProgress> = profiles
        .iter()
        .map(|p| (p.id, StudentProgress::new(p.id, p.name.clone())))
        .collect();

    for s in submissions {
        if let Some(acc) = by_user.get_mut(&s.user_id) {
            acc.total_tests += 1;
            acc.total_time_on_tests += s.time_spent_seconds as i64;

            let subject = acc.subjects.entry(s.subject.clone()).or_default();
            subject.tests += 1;
            subject.total_time_seconds += s.time_spent_seconds as i64;
            let n = subject.tests as f64;
            subject.avg_score = (subject.avg_score * (n - 1.0)
                + score_percentage(s.score, s.total_questions))
                / n;
        }
    }

    for v in views {
        if let Some(acc) = by_user.get_mut(&v.user_id) {
            acc.total_lessons_viewed += 1;
            acc.total_lesson_time += v.time_spent_seconds as i64;

            let subject = acc.subjects.entry(v.subject.clone()).or_default();
            subject.lessons_viewed += 1;
            subject.total_time_seconds += v.time_spent_seconds as i64;
        }
    }

    for acc in by_user.values_mut() {
        let mine: Vec<&SubmissionRecord> = submissions
            .iter()
            .filter(|s| s.user_id == acc.user_id)
            .collect();
        if !mine.is_empty() {
            let n = mine.len() as f64;
            acc.average_score = mine
                .iter()
                .map(|s| score_percentage(s.score, s.total_questions))
                .sum::<f64>()
                / n;
            acc.average_time_per_test =
                mine.iter().map(|s| s.time_spent_seconds as f64).sum::<f64>() / n;
        }

        let my_views: Vec<&ViewRecord> =
            views.iter().filter(|v| v.user_id == acc.user_id).collect();
        if !my_views.is_empty() {
            acc.average_time_per_lesson = my_views
                .iter()
                .map(|v| v.time_spent_seconds as f64)
                .sum::<f64>()
                / my_views.len() as f64;
        }
    }

    let submission_count = submissions.len() as f64;
    let view_count = views.len() as f64;
    let global = GlobalStats {
        average_time_per_test: if submission_count > 0.0 {
            submissions
                .iter()
                .map(|s| s.time_spent_seconds as f64)
                .sum::<f64>()
                / submission_count
        } else {
            0.0
        },
        average_time_per_lesson: if view_count > 0.0 {
            views
                .iter()
                .map(|v| v.time_spent_seconds as f64)
                .sum::<f64>()
                / view_count
        } else {
            0.0
        },
        average_score: if submission_count > 0.0 {
            submissions
                .iter()
                .map(|s| score_percentage(s.score, s.total_questions))
                .sum::<f64>()
                / submission_count
        } else {
            0.0
        },
        total_active_students: by_user.values().filter(|s| s.is_active()).count() as i64,
    };

    let mut students: Vec<StudentProgress> = by_user.into_values().collect();
    students.sort_by(|a, b| a.name.cmp(&b.name));

    ProgressReport { students, global }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn profile(name: &str) -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: format!("{}@example.com", name),
            role: "student".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn submission(user_id: Uuid, score: i32, total: i32, time: i32, subject: &str) -> SubmissionRecord {
        SubmissionRecord {
            user_id,
            score,
            total_questions: total,
            time_spent_seconds: time,
            subject: subject.to_string(),
        }
    }

    fn view(user_id: Uuid, time: i32, subject: &str) -> ViewRecord {
        ViewRecord {
            user_id,
            time_spent_seconds: time,
            subject: subject.to_string(),
            category: "lesson".to_string(),
        }
    }

    #[test]
    fn averages_two_submissions() {
        let alice = profile("alice");
        let submissions = vec![
            submission(alice.id, 2, 4, 60, "math"),
            submission(alice.id, 4, 4, 120, "math"),
        ];

        let report = compute_report(&[alice.clone()], &submissions, &[]);
        let student = &report.students[0];
        assert_eq!(student.total_tests, 2);
        assert_eq!(student.average_score, 75.0);
        assert_eq!(student.average_time_per_test, 90.0);
        assert_eq!(student.total_time_on_tests, 180);
    }

    #[test]
    fn zero_activity_student_is_inactive_with_zero_averages() {
        let idle = profile("idle");
        let report = compute_report(&[idle], &[], &[]);
        let student = &report.students[0];
        assert_eq!(student.average_score, 0.0);
        assert_eq!(student.average_time_per_test, 0.0);
        assert_eq!(student.average_time_per_lesson, 0.0);
        assert_eq!(report.global.total_active_students, 0);
    }

    #[test]
    fn viewing_alone_counts_as_active() {
        let bob = profile("bob");
        let views = vec![view(bob.id, 300, "history")];
        let report = compute_report(&[bob.clone()], &[], &views);
        let student = &report.students[0];
        assert_eq!(student.total_lessons_viewed, 1);
        assert_eq!(student.total_lesson_time, 300);
        assert_eq!(student.average_time_per_lesson, 300.0);
        assert_eq!(report.global.total_active_students, 1);
        assert_eq!(student.subjects["history"].lessons_viewed, 1);
    }

    #[test]
    fn incremental_subject_mean_matches_full_recomputation() {
        let alice = profile("alice");
        let submissions = vec![
            submission(alice.id, 1, 4, 10, "math"),
            submission(alice.id, 3, 4, 20, "math"),
            submission(alice.id, 4, 4, 30, "math"),
        ];

        let report = compute_report(&[alice.clone()], &submissions, &[]);
        let student = &report.students[0];
        // All rows are in one subject, so the running per-subject mean and
        // the recomputed per-student mean must coincide.
        let expected = (25.0 + 75.0 + 100.0) / 3.0;
        assert!((student.subjects["math"].avg_score - expected).abs() < 1e-9);
        assert!((student.average_score - expected).abs() < 1e-9);
    }

    #[test]
    fn global_average_is_submission_weighted() {
        let alice = profile("alice");
        let bob = profile("bob");
        let submissions = vec![
            // Alice: three perfect scores. Bob: one zero.
            submission(alice.id, 4, 4, 10, "math"),
            submission(alice.id, 4, 4, 10, "math"),
            submission(alice.id, 4, 4, 10, "math"),
            submission(bob.id, 0, 4, 10, "math"),
        ];

        let report = compute_report(&[alice, bob], &submissions, &[]);
        // Student-weighted would be (100 + 0) / 2 = 50; submission-weighted
        // is 300 / 4 = 75.
        assert_eq!(report.global.average_score, 75.0);
        assert_eq!(report.global.total_active_students, 2);
    }

    #[test]
    fn rows_for_unknown_users_are_skipped_in_student_pass() {
        let alice = profile("alice");
        let stranger = Uuid::new_v4();
        let submissions = vec![submission(stranger, 4, 4, 10, "math")];

        let report = compute_report(&[alice], &submissions, &[]);
        assert_eq!(report.students[0].total_tests, 0);
        // Global figures still count every row.
        assert_eq!(report.global.average_score, 100.0);
    }
}
