use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    Json,
};
use serde::Deserialize;

use crate::api::middleware::{ApiResult, AppState};
use crate::models::{
    AssignTechnicianRequest, ChangeStatusRequest, OpenTicketRequest, Priority, TicketResponse,
    TicketStatus, UpdateTicketRequest,
};
use crate::services::ticket_service;

/// Open a new ticket
pub async fn open_ticket(
    State(state): State<AppState>,
    Json(request): Json<OpenTicketRequest>,
) -> ApiResult<(StatusCode, [(header::HeaderName, String); 1], Json<TicketResponse>)> {
    let ticket =
        ticket_service::open_ticket(&state.db, request, Some(&state.event_bus)).await?;

    let location = format!("/tickets/{}", ticket.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ticket),
    ))
}

/// Get ticket by ID
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service::get_ticket(&state.db, &id).await?;
    Ok(Json(ticket))
}

#[derive(Deserialize)]
pub struct ListTicketsParams {
    pub status: Option<TicketStatus>,
    pub priority: Option<Priority>,
}

/// List tickets with optional status and priority filters
pub async fn list_tickets(
    State(state): State<AppState>,
    Query(params): Query<ListTicketsParams>,
) -> ApiResult<Json<Vec<TicketResponse>>> {
    let tickets =
        ticket_service::list_tickets(&state.db, params.status, params.priority).await?;
    Ok(Json(tickets))
}

/// Full update of a ticket
pub async fn update_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTicketRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service::update_ticket(&state.db, &id, request).await?;
    Ok(Json(ticket))
}

/// Change ticket status
pub async fn change_ticket_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ChangeStatusRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket =
        ticket_service::change_status(&state.db, &id, request.status, Some(&state.event_bus))
            .await?;
    Ok(Json(ticket))
}

/// Assign a technician to a ticket
pub async fn assign_technician(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignTechnicianRequest>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service::assign_technician(
        &state.db,
        &id,
        &request.technician_id,
        Some(&state.event_bus),
    )
    .await?;
    Ok(Json(ticket))
}

/// Close a ticket
pub async fn close_ticket(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TicketResponse>> {
    let ticket = ticket_service::close_ticket(&state.db, &id, Some(&state.event_bus)).await?;
    Ok(Json(ticket))
}
