use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::middleware::{ApiResult, AppState};
use crate::models::{CreatePersonRequest, PersonKind, PersonResponse, UpdatePersonRequest};
use crate::services::person_service;

pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreatePersonRequest>,
) -> ApiResult<(StatusCode, Json<PersonResponse>)> {
    let client = person_service::create_person(&state.db, PersonKind::Cliente, request).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PersonResponse>> {
    let client = person_service::get_person(&state.db, PersonKind::Cliente, &id).await?;
    Ok(Json(client))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let clients = person_service::list_persons(&state.db, PersonKind::Cliente).await?;
    Ok(Json(clients))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let client =
        person_service::update_person(&state.db, PersonKind::Cliente, &id, request).await?;
    Ok(Json(client))
}

pub async fn delete_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    person_service::delete_person(&state.db, PersonKind::Cliente, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
