use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::events::{EventBus, SystemEvent};
use crate::models::{
    now_rfc3339, OpenTicketRequest, Person, PersonKind, Priority, Ticket, TicketResponse,
    TicketStatus, UpdateTicketRequest,
};
use crate::services::state_machine::{execute_transition, TransitionContext};
use crate::services::validation;

async fn load_ticket(db: &Database, id: &str) -> ApiResult<Ticket> {
    db.get_ticket_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Ticket not found: {}", id)))
}

async fn load_client(db: &Database, id: &str) -> ApiResult<Person> {
    db.get_person_by_id_and_kind(id, PersonKind::Cliente)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Client not found: {}", id)))
}

async fn load_technician(db: &Database, id: &str) -> ApiResult<Person> {
    db.get_person_by_id_and_kind(id, PersonKind::Tecnico)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Technician not found: {}", id)))
}

async fn with_names(db: &Database, ticket: Ticket) -> ApiResult<TicketResponse> {
    let client_name = db
        .get_person_by_id(&ticket.client_id)
        .await?
        .map(|p| p.name);

    let technician_name = match &ticket.technician_id {
        Some(id) => db.get_person_by_id(id).await?.map(|p| p.name),
        None => None,
    };

    Ok(TicketResponse::from_ticket(ticket, client_name, technician_name))
}

/// Open a new ticket. A technician supplied at open time puts the ticket
/// straight into EM_ANDAMENTO.
pub async fn open_ticket(
    db: &Database,
    request: OpenTicketRequest,
    event_bus: Option<&EventBus>,
) -> ApiResult<TicketResponse> {
    validation::validate_ticket_fields(&request.title, request.notes.as_deref())?;

    let client = load_client(db, &request.client_id).await?;

    let technician = match &request.technician_id {
        Some(id) => Some(load_technician(db, id).await?),
        None => None,
    };

    let mut ticket = Ticket::new(
        request.priority,
        request.title,
        request.notes,
        client.id.clone(),
        technician.as_ref().map(|t| t.id.clone()),
    );

    if ticket.technician_id.is_some() && ticket.status == TicketStatus::Aberto {
        ticket.status = TicketStatus::EmAndamento;
    }

    db.create_ticket(&ticket).await?;

    tracing::info!(
        "Ticket opened: id={}, status={:?}, priority={:?}",
        ticket.id,
        ticket.status,
        ticket.priority
    );

    if let Some(event_bus) = event_bus {
        event_bus.publish(SystemEvent::TicketOpened {
            ticket_id: ticket.id.clone(),
            client_id: ticket.client_id.clone(),
            technician_id: ticket.technician_id.clone(),
            timestamp: now_rfc3339(),
        });
    }

    Ok(TicketResponse::from_ticket(
        ticket,
        Some(client.name),
        technician.map(|t| t.name),
    ))
}

pub async fn get_ticket(db: &Database, id: &str) -> ApiResult<TicketResponse> {
    let ticket = load_ticket(db, id).await?;
    with_names(db, ticket).await
}

pub async fn list_tickets(
    db: &Database,
    status: Option<TicketStatus>,
    priority: Option<Priority>,
) -> ApiResult<Vec<TicketResponse>> {
    let tickets = db.list_tickets(status, priority).await?;

    let mut responses = Vec::with_capacity(tickets.len());
    for ticket in tickets {
        responses.push(with_names(db, ticket).await?);
    }
    Ok(responses)
}

/// Full update of title/notes/priority/client/technician. Closed tickets
/// reject any mutation; attaching a technician to an open ticket re-applies
/// the auto-promotion rule.
pub async fn update_ticket(
    db: &Database,
    id: &str,
    request: UpdateTicketRequest,
) -> ApiResult<TicketResponse> {
    validation::validate_ticket_fields(&request.title, request.notes.as_deref())?;

    let mut ticket = load_ticket(db, id).await?;

    if ticket.status == TicketStatus::Encerrado {
        return Err(ApiError::DomainRule(
            "cannot alter a closed ticket".to_string(),
        ));
    }

    let client = load_client(db, &request.client_id).await?;
    let technician = match &request.technician_id {
        Some(id) => Some(load_technician(db, id).await?),
        None => None,
    };

    ticket.title = request.title;
    ticket.notes = request.notes;
    ticket.priority = request.priority;
    ticket.client_id = client.id.clone();
    ticket.technician_id = technician.as_ref().map(|t| t.id.clone());

    if ticket.technician_id.is_some() && ticket.status == TicketStatus::Aberto {
        ticket.status = TicketStatus::EmAndamento;
    }

    db.update_ticket(&ticket).await?;

    tracing::info!("Ticket updated: id={}, status={:?}", ticket.id, ticket.status);

    Ok(TicketResponse::from_ticket(
        ticket,
        Some(client.name),
        technician.map(|t| t.name),
    ))
}

/// Change a ticket's status, applying the transition rules. Closing stamps
/// closed_at.
pub async fn change_status(
    db: &Database,
    id: &str,
    new_status: TicketStatus,
    event_bus: Option<&EventBus>,
) -> ApiResult<TicketResponse> {
    let mut ticket = load_ticket(db, id).await?;

    let result = execute_transition(
        TransitionContext {
            ticket_id: ticket.id.clone(),
            from_status: ticket.status,
            to_status: new_status,
        },
        event_bus,
    )?;

    ticket.status = result.new_status;
    if result.closes_ticket {
        ticket.closed_at = Some(now_rfc3339());
    }

    db.update_ticket(&ticket).await?;

    with_names(db, ticket).await
}

/// Assign a technician. A closed ticket rejects assignment; an open ticket
/// auto-promotes to EM_ANDAMENTO, any other status is left unchanged.
pub async fn assign_technician(
    db: &Database,
    id: &str,
    technician_id: &str,
    event_bus: Option<&EventBus>,
) -> ApiResult<TicketResponse> {
    let mut ticket = load_ticket(db, id).await?;
    let technician = load_technician(db, technician_id).await?;

    if ticket.status == TicketStatus::Encerrado {
        return Err(ApiError::DomainRule(
            "cannot assign a technician to a closed ticket".to_string(),
        ));
    }

    ticket.technician_id = Some(technician.id.clone());
    if ticket.status == TicketStatus::Aberto {
        ticket.status = TicketStatus::EmAndamento;
    }

    db.update_ticket(&ticket).await?;

    tracing::info!(
        "Technician {} assigned to ticket {}",
        technician.id,
        ticket.id
    );

    if let Some(event_bus) = event_bus {
        event_bus.publish(SystemEvent::TicketAssigned {
            ticket_id: ticket.id.clone(),
            technician_id: technician.id.clone(),
            timestamp: now_rfc3339(),
        });
    }

    with_names(db, ticket).await
}

pub async fn close_ticket(
    db: &Database,
    id: &str,
    event_bus: Option<&EventBus>,
) -> ApiResult<TicketResponse> {
    change_status(db, id, TicketStatus::Encerrado, event_bus).await
}
