use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::now_rfc3339;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Cliente,
    Tecnico,
}

impl PersonKind {
    /// Discriminator value as stored in the persons table.
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonKind::Cliente => "cliente",
            PersonKind::Tecnico => "tecnico",
        }
    }

    /// Human-readable entity name used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            PersonKind::Cliente => "Client",
            PersonKind::Tecnico => "Technician",
        }
    }
}

impl std::fmt::Display for PersonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for PersonKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "tecnico" => PersonKind::Tecnico,
            _ => PersonKind::Cliente,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Profile {
    Cliente,
    Tecnico,
    Admin,
}

/// A client or technician record. The kind discriminator replaces subtype
/// tables; profiles are role labels only, no enforcement attaches to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub kind: PersonKind,
    pub name: String,
    pub cpf: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profiles: Vec<Profile>,
    pub created_at: String,
}

impl Person {
    pub fn new_client(
        name: String,
        cpf: String,
        email: String,
        password_hash: String,
        profiles: Vec<Profile>,
    ) -> Self {
        Self::new(PersonKind::Cliente, Profile::Cliente, name, cpf, email, password_hash, profiles)
    }

    pub fn new_technician(
        name: String,
        cpf: String,
        email: String,
        password_hash: String,
        profiles: Vec<Profile>,
    ) -> Self {
        Self::new(PersonKind::Tecnico, Profile::Tecnico, name, cpf, email, password_hash, profiles)
    }

    fn new(
        kind: PersonKind,
        default_profile: Profile,
        name: String,
        cpf: String,
        email: String,
        password_hash: String,
        mut profiles: Vec<Profile>,
    ) -> Self {
        if profiles.is_empty() {
            profiles.push(default_profile);
        }
        profiles.sort();
        profiles.dedup();

        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            name,
            cpf,
            email: email.to_lowercase(),
            password_hash,
            profiles,
            created_at: now_rfc3339(),
        }
    }
}

// DTOs for API requests/responses
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePersonRequest {
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePersonRequest {
    pub name: String,
    pub cpf: String,
    pub email: String,
    // Blank or absent keeps the stored password
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonResponse {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub email: String,
    pub profiles: Vec<Profile>,
    pub created_at: String,
}

impl From<Person> for PersonResponse {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            cpf: person.cpf,
            email: person.email,
            profiles: person.profiles,
            created_at: person.created_at,
        }
    }
}
