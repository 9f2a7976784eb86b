use crate::api::middleware::error::{ApiError, ApiResult};
use crate::database::Database;
use crate::models::{CreatePersonRequest, Person, PersonKind, PersonResponse, UpdatePersonRequest};
use crate::services::validation;

const BCRYPT_COST: u32 = 12;

pub fn hash_password(password: &str) -> ApiResult<String> {
    Ok(bcrypt::hash(password, BCRYPT_COST)?)
}

/// Create a client or technician. CPF uniqueness is checked before email,
/// so the first failing check wins.
pub async fn create_person(
    db: &Database,
    kind: PersonKind,
    request: CreatePersonRequest,
) -> ApiResult<PersonResponse> {
    validation::validate_create_person(&request)?;

    if db.person_cpf_exists(&request.cpf, None).await? {
        return Err(ApiError::Duplicate("CPF already registered".to_string()));
    }

    let email = validation::normalize_email(&request.email);
    if db.person_email_exists(&email, None).await? {
        return Err(ApiError::Duplicate("Email already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let person = match kind {
        PersonKind::Cliente => Person::new_client(
            request.name,
            request.cpf,
            email,
            password_hash,
            request.profiles,
        ),
        PersonKind::Tecnico => Person::new_technician(
            request.name,
            request.cpf,
            email,
            password_hash,
            request.profiles,
        ),
    };

    db.create_person(&person).await?;

    tracing::info!("{} created: id={}", kind.label(), person.id);

    Ok(person.into())
}

pub async fn get_person(
    db: &Database,
    kind: PersonKind,
    id: &str,
) -> ApiResult<PersonResponse> {
    let person = db
        .get_person_by_id_and_kind(id, kind)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found: {}", kind.label(), id)))?;

    Ok(person.into())
}

pub async fn list_persons(db: &Database, kind: PersonKind) -> ApiResult<Vec<PersonResponse>> {
    let persons = db.list_persons(kind).await?;
    Ok(persons.into_iter().map(PersonResponse::from).collect())
}

/// Update a person. CPF and email uniqueness are re-validated only when the
/// value is changing, excluding the record's own id from the scan. A blank
/// password keeps the stored hash.
pub async fn update_person(
    db: &Database,
    kind: PersonKind,
    id: &str,
    request: UpdatePersonRequest,
) -> ApiResult<PersonResponse> {
    validation::validate_update_person(&request)?;

    let mut person = db
        .get_person_by_id_and_kind(id, kind)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found: {}", kind.label(), id)))?;

    if person.cpf != request.cpf && db.person_cpf_exists(&request.cpf, Some(&person.id)).await? {
        return Err(ApiError::Duplicate("CPF already registered".to_string()));
    }

    let email = validation::normalize_email(&request.email);
    if person.email != email && db.person_email_exists(&email, Some(&person.id)).await? {
        return Err(ApiError::Duplicate("Email already registered".to_string()));
    }

    person.name = request.name;
    person.cpf = request.cpf;
    person.email = email;

    if let Some(password) = request.password.as_deref() {
        if !password.trim().is_empty() {
            person.password_hash = hash_password(password)?;
        }
    }

    db.update_person(&person).await?;

    tracing::info!("{} updated: id={}", kind.label(), person.id);

    Ok(person.into())
}

/// Delete a person. Deletion is blocked while tickets still reference the
/// record, as client or as technician.
pub async fn delete_person(db: &Database, kind: PersonKind, id: &str) -> ApiResult<()> {
    let person = db
        .get_person_by_id_and_kind(id, kind)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("{} not found: {}", kind.label(), id)))?;

    let referencing = db.count_tickets_for_person(&person.id).await?;
    if referencing > 0 {
        return Err(ApiError::DomainRule(format!(
            "cannot delete {}: {} ticket(s) still reference it",
            kind.label().to_lowercase(),
            referencing
        )));
    }

    db.delete_person(&person.id).await?;

    tracing::info!("{} deleted: id={}", kind.label(), person.id);

    Ok(())
}
