use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};

use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

/// Full report across every profile, for professors/admins.
#[axum::debug_handler]
pub async fn get_progress(State(state): State<AppState>) -> crate::error::Result<Response> {
    let report = state.progress_service.report().await?;
    Ok(Json(report).into_response())
}

/// A caller's own rollup.
#[axum::debug_handler]
pub async fn get_my_progress(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;

    let progress = state.progress_service.report_for(user_id).await?;
    Ok(Json(progress).into_response())
}
