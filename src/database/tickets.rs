use sqlx::any::AnyRow;
use sqlx::Row;

use crate::api::middleware::error::ApiResult;
use crate::database::Database;
use crate::models::{Priority, Ticket, TicketStatus};

fn ticket_from_row(row: &AnyRow) -> ApiResult<Ticket> {
    let status: String = row.try_get("status")?;
    let priority: String = row.try_get("priority")?;

    Ok(Ticket {
        id: row.try_get("id")?,
        opened_at: row.try_get("opened_at")?,
        closed_at: row.try_get("closed_at").ok(),
        priority: Priority::from(priority),
        status: TicketStatus::from(status),
        title: row.try_get("title")?,
        notes: row.try_get("notes").ok(),
        client_id: row.try_get("client_id")?,
        technician_id: row.try_get("technician_id").ok(),
    })
}

impl Database {
    pub async fn create_ticket(&self, ticket: &Ticket) -> ApiResult<()> {
        tracing::debug!(
            "Creating ticket for client_id={}, technician_id={:?}",
            ticket.client_id,
            ticket.technician_id
        );

        sqlx::query(
            "INSERT INTO tickets (id, opened_at, closed_at, priority, status, title, notes, client_id, technician_id)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&ticket.id)
        .bind(&ticket.opened_at)
        .bind(&ticket.closed_at)
        .bind(ticket.priority.to_string())
        .bind(ticket.status.to_string())
        .bind(&ticket.title)
        .bind(&ticket.notes)
        .bind(&ticket.client_id)
        .bind(&ticket.technician_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_ticket_by_id(&self, id: &str) -> ApiResult<Option<Ticket>> {
        let row = sqlx::query(
            "SELECT id, opened_at, closed_at, priority, status, title, notes, client_id, technician_id
             FROM tickets
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(ticket_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// List tickets with optional status and priority filters
    pub async fn list_tickets(
        &self,
        status: Option<TicketStatus>,
        priority: Option<Priority>,
    ) -> ApiResult<Vec<Ticket>> {
        let mut query = String::from(
            "SELECT id, opened_at, closed_at, priority, status, title, notes, client_id, technician_id
             FROM tickets
             WHERE 1=1",
        );

        if status.is_some() {
            query.push_str(" AND status = ?");
        }
        if priority.is_some() {
            query.push_str(" AND priority = ?");
        }

        query.push_str(" ORDER BY opened_at DESC");

        let mut sql_query = sqlx::query(&query);

        if let Some(s) = status {
            sql_query = sql_query.bind(s.to_string());
        }
        if let Some(p) = priority {
            sql_query = sql_query.bind(p.to_string());
        }

        let rows = sql_query.fetch_all(&self.pool).await?;

        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(ticket_from_row(&row)?);
        }
        Ok(tickets)
    }

    /// Persist the full ticket record back to the store
    pub async fn update_ticket(&self, ticket: &Ticket) -> ApiResult<()> {
        sqlx::query(
            "UPDATE tickets
             SET closed_at = ?, priority = ?, status = ?, title = ?, notes = ?, client_id = ?, technician_id = ?
             WHERE id = ?",
        )
        .bind(&ticket.closed_at)
        .bind(ticket.priority.to_string())
        .bind(ticket.status.to_string())
        .bind(&ticket.title)
        .bind(&ticket.notes)
        .bind(&ticket.client_id)
        .bind(&ticket.technician_id)
        .bind(&ticket.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of tickets referencing a person as client or technician
    pub async fn count_tickets_for_person(&self, person_id: &str) -> ApiResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM tickets WHERE client_id = ? OR technician_id = ?",
        )
        .bind(person_id)
        .bind(person_id)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count)
    }
}
