use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::material::Material;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub subject: String,
    pub category: String,
    pub file_url: Option<String>,
    pub answer_key: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub subject: Option<String>,
    pub file_url: Option<String>,
    pub answer_key: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Outward shape of a material. The answer key itself is only serialized
/// for staff; students see whether one exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialResponse {
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    pub category: String,
    pub file_url: Option<String>,
    pub has_answer_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MaterialResponse {
    pub fn from_material(material: Material, include_key: bool) -> Self {
        let key: Option<Vec<String>> = material
            .answer_key
            .and_then(|v| serde_json::from_value(v).ok());
        Self {
            id: material.id,
            title: material.title,
            subject: material.subject,
            category: material.category,
            file_url: material.file_url,
            has_answer_key: key.as_ref().map(|k| !k.is_empty()).unwrap_or(false),
            answer_key: if include_key { key } else { None },
            is_active: material.is_active,
            created_at: material.created_at,
            updated_at: material.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialFilter {
    pub subject: Option<String>,
    pub category: Option<String>,
}
