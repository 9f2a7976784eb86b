use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{Person, PersonKind, Profile};

fn encode_profiles(profiles: &[Profile]) -> String {
    serde_json::to_string(profiles).unwrap_or_else(|_| "[]".to_string())
}

fn decode_profiles(raw: &str) -> Vec<Profile> {
    serde_json::from_str(raw).unwrap_or_default()
}

fn person_from_row(row: &AnyRow) -> ApiResult<Person> {
    let kind: String = row.try_get("kind")?;
    let profiles: String = row.try_get("profiles")?;

    Ok(Person {
        id: row.try_get("id")?,
        kind: PersonKind::from(kind),
        name: row.try_get("name")?,
        cpf: row.try_get("cpf")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        profiles: decode_profiles(&profiles),
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_person(&self, person: &Person) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO persons (id, kind, name, cpf, email, password_hash, profiles, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&person.id)
        .bind(person.kind.as_str())
        .bind(&person.name)
        .bind(&person.cpf)
        .bind(&person.email)
        .bind(&person.password_hash)
        .bind(encode_profiles(&person.profiles))
        .bind(&person.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_person_by_id(&self, id: &str) -> ApiResult<Option<Person>> {
        let row = sqlx::query(
            "SELECT id, kind, name, cpf, email, password_hash, profiles, created_at
             FROM persons
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(person_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_person_by_id_and_kind(
        &self,
        id: &str,
        kind: PersonKind,
    ) -> ApiResult<Option<Person>> {
        let row = sqlx::query(
            "SELECT id, kind, name, cpf, email, password_hash, profiles, created_at
             FROM persons
             WHERE id = ? AND kind = ?",
        )
        .bind(id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(person_from_row(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_persons(&self, kind: PersonKind) -> ApiResult<Vec<Person>> {
        let rows = sqlx::query(
            "SELECT id, kind, name, cpf, email, password_hash, profiles, created_at
             FROM persons
             WHERE kind = ?
             ORDER BY created_at DESC",
        )
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut persons = Vec::new();
        for row in rows {
            persons.push(person_from_row(&row)?);
        }
        Ok(persons)
    }

    /// Check CPF uniqueness, optionally excluding one record (its own id on update).
    pub async fn person_cpf_exists(
        &self,
        cpf: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<bool> {
        let mut query = String::from("SELECT COUNT(*) as count FROM persons WHERE cpf = ?");
        if exclude_id.is_some() {
            query.push_str(" AND id != ?");
        }

        let mut sql_query = sqlx::query(&query).bind(cpf);
        if let Some(id) = exclude_id {
            sql_query = sql_query.bind(id);
        }

        let row = sql_query.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    pub async fn person_email_exists(
        &self,
        email: &str,
        exclude_id: Option<&str>,
    ) -> ApiResult<bool> {
        let mut query = String::from("SELECT COUNT(*) as count FROM persons WHERE email = ?");
        if exclude_id.is_some() {
            query.push_str(" AND id != ?");
        }

        let mut sql_query = sqlx::query(&query).bind(email);
        if let Some(id) = exclude_id {
            sql_query = sql_query.bind(id);
        }

        let row = sql_query.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    pub async fn update_person(&self, person: &Person) -> ApiResult<()> {
        sqlx::query(
            "UPDATE persons
             SET name = ?, cpf = ?, email = ?, password_hash = ?, profiles = ?
             WHERE id = ?",
        )
        .bind(&person.name)
        .bind(&person.cpf)
        .bind(&person.email)
        .bind(&person.password_hash)
        .bind(encode_profiles(&person.profiles))
        .bind(&person.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_person(&self, id: &str) -> ApiResult<()> {
        sqlx::query("DELETE FROM persons WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
