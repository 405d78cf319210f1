use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::student_dto::{CreateStudentRequest, UpdateStudentStatusRequest};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_students(State(state): State<AppState>) -> crate::error::Result<Response> {
    let students = state.student_service.list_students().await?;
    Ok(Json(students).into_response())
}

#[axum::debug_handler]
pub async fn create_student(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateStudentRequest>,
) -> crate::error::Result<Response> {
    if !claims.is_admin() {
        return Err(Error::Forbidden(
            "Only admins can create accounts".to_string(),
        ));
    }
    req.validate()?;

    let profile = state.student_service.create(req).await?;
    tracing::info!(profile_id = %profile.id, "Profile created");
    Ok((StatusCode::CREATED, Json(profile)).into_response())
}

#[axum::debug_handler]
pub async fn update_student_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStudentStatusRequest>,
) -> crate::error::Result<Response> {
    if !claims.is_admin() {
        return Err(Error::Forbidden(
            "Only admins can change account status".to_string(),
        ));
    }

    let profile = state.student_service.set_active(id, req.is_active).await?;
    Ok(Json(profile).into_response())
}
