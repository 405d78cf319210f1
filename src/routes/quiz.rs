use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};
use validator::Validate;

use crate::dto::quiz_dto::{VerifyQuizRequest, VerifyQuizResponse};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn verify_quiz(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<VerifyQuizRequest>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;
    req.validate()?;

    tracing::info!(
        %user_id,
        material_id = %req.material_id,
        answers = req.answers.len(),
        "Verifying quiz submission"
    );

    let graded = state
        .verification_service
        .verify(user_id, req.material_id, &req.answers, req.time_spent_seconds)
        .await?;

    let resp = VerifyQuizResponse {
        success: true,
        score: graded.score,
        total_questions: graded.total_questions,
        results: graded.results,
        time_spent_seconds: req.time_spent_seconds,
    };
    Ok(Json(resp).into_response())
}

#[axum::debug_handler]
pub async fn list_my_submissions(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;

    let submissions = state.verification_service.list_for_user(user_id).await?;
    Ok(Json(submissions).into_response())
}
