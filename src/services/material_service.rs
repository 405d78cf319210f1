use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::material_dto::{CreateMaterialRequest, MaterialFilter, UpdateMaterialRequest};
use crate::error::{Error, Result};
use crate::models::material::{Material, CATEGORIES, CATEGORY_TVC};

const MATERIAL_COLUMNS: &str =
    "id, title, subject, category, file_url, answer_key, created_by, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct MaterialService {
    pool: PgPool,
}

impl MaterialService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        filter: &MaterialFilter,
        include_inactive: bool,
    ) -> Result<Vec<Material>> {
        let rows = sqlx::query_as::<_, Material>(&format!(
            r#"SELECT {MATERIAL_COLUMNS} FROM materials
               WHERE ($1::text IS NULL OR subject = $1)
                 AND ($2::text IS NULL OR category = $2)
                 AND ($3 OR is_active)
               ORDER BY created_at DESC"#
        ))
        .bind(filter.subject.clone())
        .bind(filter.category.clone())
        .bind(include_inactive)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: Uuid) -> Result<Material> {
        sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Material not found".to_string()))
    }

    pub async fn create(&self, req: CreateMaterialRequest, created_by: Uuid) -> Result<Material> {
        if !CATEGORIES.contains(&req.category.as_str()) {
            return Err(Error::BadRequest(format!(
                "Unknown category '{}'",
                req.category
            )));
        }

        if req.category == CATEGORY_TVC
            && req.answer_key.as_ref().map(|k| k.is_empty()).unwrap_or(true)
        {
            return Err(Error::BadRequest(
                "TVC quiz materials require a non-empty answer key".to_string(),
            ));
        }

        let answer_key_json = req
            .answer_key
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let material = sqlx::query_as::<_, Material>(
            r#"INSERT INTO materials (title, subject, category, file_url, answer_key, created_by)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING *"#,
        )
        .bind(req.title)
        .bind(req.subject)
        .bind(req.category)
        .bind(req.file_url)
        .bind(answer_key_json)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(material)
    }

    pub async fn update(&self, id: Uuid, req: UpdateMaterialRequest) -> Result<Material> {
        // Fetch first so a missing id surfaces as NotFound rather than a
        // silent zero-row update.
        let existing = self.get(id).await?;

        if existing.category == CATEGORY_TVC {
            if let Some(key) = &req.answer_key {
                if key.is_empty() {
                    return Err(Error::BadRequest(
                        "TVC quiz materials require a non-empty answer key".to_string(),
                    ));
                }
            }
        }

        let answer_key_json = req
            .answer_key
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let material = sqlx::query_as::<_, Material>(
            r#"UPDATE materials
               SET title = COALESCE($2, title),
                   subject = COALESCE($3, subject),
                   file_url = COALESCE($4, file_url),
                   answer_key = COALESCE($5, answer_key),
                   is_active = COALESCE($6, is_active),
                   updated_at = NOW()
               WHERE id = $1
               RETURNING *"#,
        )
        .bind(id)
        .bind(req.title)
        .bind(req.subject)
        .bind(req.file_url)
        .bind(answer_key_json)
        .bind(req.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(material)
    }

    /// Soft delete; submissions and views keep referencing the row.
    pub async fn deactivate(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            "UPDATE materials SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Material not found".to_string()));
        }
        Ok(())
    }
}
