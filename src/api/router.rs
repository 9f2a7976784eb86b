use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::middleware::{attach_request_path, AppState};
use crate::api::{clients, technicians, tickets};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Tickets
        .route(
            "/tickets",
            post(tickets::open_ticket).get(tickets::list_tickets),
        )
        .route(
            "/tickets/:id",
            get(tickets::get_ticket).put(tickets::update_ticket),
        )
        .route("/tickets/:id/status", patch(tickets::change_ticket_status))
        .route("/tickets/:id/assign", patch(tickets::assign_technician))
        .route("/tickets/:id/close", patch(tickets::close_ticket))
        // Clients
        .route(
            "/clients",
            post(clients::create_client).get(clients::list_clients),
        )
        .route(
            "/clients/:id",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        // Technicians
        .route(
            "/technicians",
            post(technicians::create_technician).get(technicians::list_technicians),
        )
        .route(
            "/technicians/:id",
            get(technicians::get_technician)
                .put(technicians::update_technician)
                .delete(technicians::delete_technician),
        )
        .layer(middleware::from_fn(attach_request_path))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> &'static str {
    "OK"
}
