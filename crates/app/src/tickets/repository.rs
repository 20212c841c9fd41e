//! Tickets Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Row, Sqlite, SqlitePool, query, query_as, sqlite::SqliteRow};

use crate::tickets::models::{Ticket, TicketNumber, TicketPatch};

const CREATE_TICKETS_TABLE_SQL: &str = "\
CREATE TABLE IF NOT EXISTS tickets (
    ticket_number TEXT PRIMARY KEY,
    issue_title TEXT NOT NULL,
    issue_description TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Open', 'In-progress', 'Closed')),
    priority TEXT NOT NULL CHECK (priority IN ('Critical', 'High', 'Medium', 'Low')),
    email TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    notes TEXT DEFAULT '',
    created TEXT NOT NULL,
    changed TEXT NOT NULL
)";

const LIST_TICKETS_SQL: &str = "SELECT * FROM tickets ORDER BY created DESC";

const GET_TICKET_SQL: &str = "SELECT * FROM tickets WHERE ticket_number = ?";

const CREATE_TICKET_SQL: &str = "\
INSERT INTO tickets (ticket_number, issue_title, issue_description, status, priority, \
email, phone_number, notes, created, changed) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const DELETE_TICKET_SQL: &str = "DELETE FROM tickets WHERE ticket_number = ?";

/// Ensures the tickets table exists, with enum CHECK constraints on
/// `status` and `priority`. Idempotent; safe to run on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    query(CREATE_TICKETS_TABLE_SQL).execute(pool).await?;

    Ok(())
}

/// SQLite-backed tickets repository.
#[derive(Debug, Clone)]
pub(crate) struct SqliteTicketsRepository {
    pool: SqlitePool,
}

impl SqliteTicketsRepository {
    /// Creates a new repository instance.
    #[must_use]
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub(crate) async fn list_tickets(&self) -> Result<Vec<Ticket>, sqlx::Error> {
        query_as::<Sqlite, Ticket>(LIST_TICKETS_SQL)
            .fetch_all(&self.pool)
            .await
    }

    pub(crate) async fn get_ticket(
        &self,
        ticket: &TicketNumber,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        query_as::<Sqlite, Ticket>(GET_TICKET_SQL)
            .bind(ticket.as_str())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn create_ticket(&self, ticket: &Ticket) -> Result<(), sqlx::Error> {
        query(CREATE_TICKET_SQL)
            .bind(ticket.ticket_number.as_str())
            .bind(&ticket.issue_title)
            .bind(&ticket.issue_description)
            .bind(ticket.status.as_str())
            .bind(ticket.priority.as_str())
            .bind(&ticket.email)
            .bind(&ticket.phone_number)
            .bind(&ticket.notes)
            .bind(SqlxTimestamp::from(ticket.created))
            .bind(SqlxTimestamp::from(ticket.changed))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Applies a partial update, unconditionally refreshing `changed`.
    ///
    /// The SET list is assembled only from the patch's present fields; the
    /// ticket number and creation timestamp are not representable in
    /// [`TicketPatch`], so they can never be overwritten here. Returns the
    /// number of rows affected; zero means the ticket does not exist.
    pub(crate) async fn update_ticket(
        &self,
        ticket: &TicketNumber,
        patch: &TicketPatch,
        changed: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let mut assignments = Vec::new();

        if patch.issue_title.is_some() {
            assignments.push("issue_title = ?");
        }
        if patch.issue_description.is_some() {
            assignments.push("issue_description = ?");
        }
        if patch.status.is_some() {
            assignments.push("status = ?");
        }
        if patch.priority.is_some() {
            assignments.push("priority = ?");
        }
        if patch.email.is_some() {
            assignments.push("email = ?");
        }
        if patch.phone_number.is_some() {
            assignments.push("phone_number = ?");
        }
        if patch.notes.is_some() {
            assignments.push("notes = ?");
        }

        assignments.push("changed = ?");

        let sql = format!(
            "UPDATE tickets SET {} WHERE ticket_number = ?",
            assignments.join(", ")
        );

        let mut update = query(&sql);

        if let Some(issue_title) = &patch.issue_title {
            update = update.bind(issue_title);
        }
        if let Some(issue_description) = &patch.issue_description {
            update = update.bind(issue_description);
        }
        if let Some(status) = patch.status {
            update = update.bind(status.as_str());
        }
        if let Some(priority) = patch.priority {
            update = update.bind(priority.as_str());
        }
        if let Some(email) = &patch.email {
            update = update.bind(email);
        }
        if let Some(phone_number) = &patch.phone_number {
            update = update.bind(phone_number);
        }
        if let Some(notes) = &patch.notes {
            update = update.bind(notes);
        }

        let result = update
            .bind(SqlxTimestamp::from(changed))
            .bind(ticket.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a ticket by number. Returns the number of rows affected.
    pub(crate) async fn delete_ticket(&self, ticket: &TicketNumber) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_TICKET_SQL)
            .bind(ticket.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl<'r> FromRow<'r, SqliteRow> for Ticket {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;
        let priority: String = row.try_get("priority")?;

        Ok(Self {
            ticket_number: TicketNumber::from(row.try_get::<String, _>("ticket_number")?),
            issue_title: row.try_get("issue_title")?,
            issue_description: row.try_get("issue_description")?,
            status: status.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?,
            priority: priority.parse().map_err(|e| sqlx::Error::ColumnDecode {
                index: "priority".to_string(),
                source: Box::new(e),
            })?,
            email: row.try_get("email")?,
            phone_number: row.try_get("phone_number")?,
            notes: row.try_get("notes")?,
            created: row.try_get::<SqlxTimestamp, _>("created")?.to_jiff(),
            changed: row.try_get::<SqlxTimestamp, _>("changed")?.to_jiff(),
        })
    }
}
