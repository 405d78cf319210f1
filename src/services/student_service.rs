use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::student_dto::CreateStudentRequest;
use crate::error::{Error, Result};
use crate::models::profile::{Profile, ROLE_ADMIN, ROLE_PROFESSOR, ROLE_STUDENT};

#[derive(Clone)]
pub struct StudentService {
    pool: PgPool,
}

impl StudentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_students(&self) -> Result<Vec<Profile>> {
        let rows = sqlx::query_as::<_, Profile>(
            r#"SELECT id, name, email, role, is_active, created_at, updated_at
               FROM profiles WHERE role = $1 ORDER BY name"#,
        )
        .bind(ROLE_STUDENT)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, req: CreateStudentRequest) -> Result<Profile> {
        let role = req.role.unwrap_or_else(|| ROLE_STUDENT.to_string());
        if ![ROLE_STUDENT, ROLE_PROFESSOR, ROLE_ADMIN].contains(&role.as_str()) {
            return Err(Error::BadRequest(format!("Unknown role '{}'", role)));
        }

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE email = $1)")
                .bind(&req.email)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(Error::BadRequest(
                "A profile with this email already exists".to_string(),
            ));
        }

        let profile = sqlx::query_as::<_, Profile>(
            r#"INSERT INTO profiles (name, email, role) VALUES ($1, $2, $3) RETURNING *"#,
        )
        .bind(req.name)
        .bind(req.email)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn set_active(&self, id: Uuid, is_active: bool) -> Result<Profile> {
        sqlx::query_as::<_, Profile>(
            r#"UPDATE profiles SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *"#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))
    }
}
