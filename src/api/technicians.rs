use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::middleware::{ApiResult, AppState};
use crate::models::{CreatePersonRequest, PersonKind, PersonResponse, UpdatePersonRequest};
use crate::services::person_service;

pub async fn create_technician(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<PersonResponse>)> {
    let technician =
        person_service::create_person(&state.db, PersonKind::Tecnico, request).await?;
    Ok((StatusCode::CREATED, Json(technician)))
}

pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let technician = person_service::get_person(&state.db, PersonKind::Tecnico, &id).await?;
    Ok(Json(technician))
}

pub async fn list_technicians(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let technicians = person_service::list_persons(&state.db, PersonKind::Tecnico).await?;
    Ok(Json(technicians))
}

pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let technician =
        person_service::update_person(&state.db, PersonKind::Tecnico, &id, request).await?;
    Ok(Json(technician))
}

pub async fn delete_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    person_service::delete_person(&state.db, PersonKind::Tecnico, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
