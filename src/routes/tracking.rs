use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;

use crate::dto::tracking_dto::{
    StartViewRequest, StartViewResponse, StopViewRequest, StopViewResponse, ViewStatusResponse,
};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn start_view(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<StartViewRequest>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;

    let material = state.material_service.get(req.material_id).await?;
    if !material.is_active {
        return Err(Error::NotFound("Material not found".to_string()));
    }

    let outcome = state
        .tracking_service
        .start_tracking(user_id, material.id, &material.category)
        .await;

    Ok(Json(StartViewResponse {
        tracking: true,
        already_tracking: outcome.already_tracking,
        started_at: outcome.started_at,
        records_view: outcome.records_view,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn stop_view(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Json(req): Json<StopViewRequest>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;

    let reason = req.reason.as_deref().unwrap_or("manual");
    let elapsed = state
        .tracking_service
        .stop_tracking(user_id, req.material_id, reason)
        .await;

    Ok(Json(StopViewResponse {
        stopped: elapsed.is_some(),
        time_spent_seconds: elapsed,
    })
    .into_response())
}

#[axum::debug_handler]
pub async fn view_status(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(material_id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };
    let user_id = claims.user_id()?;

    let elapsed = state.tracking_service.status(user_id, material_id).await;
    Ok(Json(ViewStatusResponse {
        tracking: elapsed.is_some(),
        elapsed_seconds: elapsed,
    })
    .into_response())
}

/// Staff view of rows that never received a duration (crashed sessions or
/// views still in progress).
#[axum::debug_handler]
pub async fn list_open_views(State(state): State<AppState>) -> crate::error::Result<Response> {
    let views = state.tracking_service.open_views().await?;
    Ok(Json(views).into_response())
}
