#![allow(unused_imports, dead_code)]
pub mod test_db;

pub use test_db::*;

use chamados::database::Database;
use chamados::models::{
    CreatePersonRequest, OpenTicketRequest, PersonKind, PersonResponse, Priority, TicketResponse,
};
use chamados::services::{person_service, ticket_service};

pub async fn create_test_client(
    db: &Database,
    name: &str,
    cpf: &str,
    email: &str,
) -> PersonResponse {
    person_service::create_person(
        db,
        PersonKind::Cliente,
        CreatePersonRequest {
            name: name.to_string(),
            cpf: cpf.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            profiles: Vec::new(),
        },
    )
    .await
    .expect("Failed to create test client")
}

pub async fn create_test_technician(
    db: &Database,
    name: &str,
    cpf: &str,
    email: &str,
) -> PersonResponse {
    person_service::create_person(
        db,
        PersonKind::Tecnico,
        CreatePersonRequest {
            name: name.to_string(),
            cpf: cpf.to_string(),
            email: email.to_string(),
            password: "secret123".to_string(),
            profiles: Vec::new(),
        },
    )
    .await
    .expect("Failed to create test technician")
}

pub async fn open_test_ticket(
    db: &Database,
    client_id: &str,
    technician_id: Option<String>,
) -> TicketResponse {
    ticket_service::open_ticket(
        db,
        OpenTicketRequest {
            priority: Priority::Media,
            title: "Printer does not print".to_string(),
            notes: None,
            client_id: client_id.to_string(),
            technician_id,
        },
        None,
    )
    .await
    .expect("Failed to open test ticket")
}
