use crate::api::middleware::{ApiResult, AppState};
use crate::config::Config;
use crate::database::Database;
use crate::events::EventBus;
use crate::models::{CreatePersonRequest, PersonKind};
use crate::services::person_service;

pub async fn build_app_state(
    db: Database,
    _config: &Config,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let event_bus = EventBus::new(100);
    tracing::info!("Event bus initialized with capacity 100");

    Ok(AppState { db, event_bus })
}

/// Load demo clients and technicians. Records whose CPF already exists are
/// skipped, so repeated startups are safe.
pub async fn seed_demo_data(db: &Database) -> ApiResult<()> {
    let clients = [
        ("João Silva", "12345678901", "joao@email.com", "senha123"),
        ("Maria Santos", "98765432100", "maria@email.com", "senha456"),
    ];
    let technicians = [
        ("Carlos Pereira", "11122233344", "carlos@chamados.dev", "tecnico123"),
        ("Ana Souza", "55566677788", "ana@chamados.dev", "suporte456"),
    ];

    for (name, cpf, email, password) in clients {
        if db.person_cpf_exists(cpf, None).await? {
            continue;
        }
        person_service::create_person(
            db,
            PersonKind::Cliente,
            CreatePersonRequest {
                name: name.to_string(),
                cpf: cpf.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                profiles: Vec::new(),
            },
        )
        .await?;
    }

    for (name, cpf, email, password) in technicians {
        if db.person_cpf_exists(cpf, None).await? {
            continue;
        }
        person_service::create_person(
            db,
            PersonKind::Tecnico,
            CreatePersonRequest {
                name: name.to_string(),
                cpf: cpf.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                profiles: Vec::new(),
            },
        )
        .await?;
    }

    tracing::info!("Demo seed data loaded");

    Ok(())
}
