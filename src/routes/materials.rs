use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::material_dto::{
    CreateMaterialRequest, MaterialFilter, MaterialResponse, UpdateMaterialRequest,
};
use crate::error::Error;
use crate::middleware::auth::Claims;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_materials(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Query(filter): Query<MaterialFilter>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };

    let staff = claims.is_staff();
    let materials = state.material_service.list(&filter, staff).await?;
    let body: Vec<MaterialResponse> = materials
        .into_iter()
        .map(|m| MaterialResponse::from_material(m, staff))
        .collect();

    Ok(Json(body).into_response())
}

#[axum::debug_handler]
pub async fn get_material(
    State(state): State<AppState>,
    claims: Option<Extension<Claims>>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    let Some(Extension(claims)) = claims else {
        return Err(Error::Unauthorized("Authentication required".to_string()));
    };

    let material = state.material_service.get(id).await?;
    if !material.is_active && !claims.is_staff() {
        return Err(Error::NotFound("Material not found".to_string()));
    }

    Ok(Json(MaterialResponse::from_material(material, claims.is_staff())).into_response())
}

#[axum::debug_handler]
pub async fn create_material(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateMaterialRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let created_by = claims.user_id()?;

    let material = state.material_service.create(req, created_by).await?;
    tracing::info!(material_id = %material.id, %created_by, "Material created");

    Ok((
        StatusCode::CREATED,
        Json(MaterialResponse::from_material(material, true)),
    )
        .into_response())
}

#[axum::debug_handler]
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMaterialRequest>,
) -> crate::error::Result<Response> {
    req.validate()?;
    let material = state.material_service.update(id, req).await?;
    Ok(Json(MaterialResponse::from_material(material, true)).into_response())
}

#[axum::debug_handler]
pub async fn delete_material(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> crate::error::Result<Response> {
    if !claims.is_admin() {
        return Err(Error::Forbidden(
            "Only admins can delete materials".to_string(),
        ));
    }

    state.material_service.deactivate(id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
