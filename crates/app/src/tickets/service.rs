//! Tickets service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::SqlitePool;

use crate::{
    tickets::{
        errors::TicketsServiceError,
        models::{NewTicket, Status, Ticket, TicketNumber, TicketPatch},
        repository::SqliteTicketsRepository,
    },
    webhook::{TicketNotifier, WebhookAction},
};

/// Maximum title length before truncation kicks in.
const TITLE_MAX_CHARS: usize = 100;

/// Marker appended to titles derived from an over-long description.
const TITLE_ELLIPSIS: &str = "...";

/// Derives a title from the description: the first 100 characters, with an
/// ellipsis marker when anything was cut off.
fn derive_title(description: &str) -> String {
    let mut title: String = description.chars().take(TITLE_MAX_CHARS).collect();

    if description.chars().count() > TITLE_MAX_CHARS {
        title.push_str(TITLE_ELLIPSIS);
    }

    title
}

/// SQLite-backed tickets service.
#[derive(Clone)]
pub struct SqliteTicketsService {
    repository: SqliteTicketsRepository,
    notifier: Arc<dyn TicketNotifier>,
}

impl SqliteTicketsService {
    #[must_use]
    pub fn new(pool: SqlitePool, notifier: Arc<dyn TicketNotifier>) -> Self {
        Self {
            repository: SqliteTicketsRepository::new(pool),
            notifier,
        }
    }
}

#[async_trait]
impl TicketsService for SqliteTicketsService {
    async fn list_tickets(&self) -> Result<Vec<Ticket>, TicketsServiceError> {
        self.repository.list_tickets().await.map_err(Into::into)
    }

    async fn get_ticket(&self, ticket: TicketNumber) -> Result<Ticket, TicketsServiceError> {
        self.repository
            .get_ticket(&ticket)
            .await?
            .ok_or(TicketsServiceError::NotFound)
    }

    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, TicketsServiceError> {
        let now = Timestamp::now();

        let issue_title = new
            .issue_title
            .unwrap_or_else(|| derive_title(&new.issue_description));

        let ticket = Ticket {
            ticket_number: TicketNumber::generate(),
            issue_title,
            issue_description: new.issue_description,
            status: new.status.unwrap_or(Status::Open),
            priority: new.priority,
            email: new.email,
            phone_number: new.phone_number,
            notes: new.notes.unwrap_or_default(),
            created: now,
            changed: now,
        };

        self.repository.create_ticket(&ticket).await?;

        self.notifier.submit(WebhookAction::Create, &ticket);

        Ok(ticket)
    }

    async fn update_ticket(
        &self,
        ticket: TicketNumber,
        mut patch: TicketPatch,
    ) -> Result<Ticket, TicketsServiceError> {
        // Same derived defaults as create: a patch without a title but with a
        // description gets a derived title, and a patch without a status
        // falls back to Open.
        if patch.issue_title.is_none() {
            if let Some(description) = &patch.issue_description {
                patch.issue_title = Some(derive_title(description));
            }
        }

        if patch.status.is_none() {
            patch.status = Some(Status::Open);
        }

        let affected = self
            .repository
            .update_ticket(&ticket, &patch, Timestamp::now())
            .await?;

        if affected == 0 {
            return Err(TicketsServiceError::NotFound);
        }

        let updated = self
            .repository
            .get_ticket(&ticket)
            .await?
            .ok_or(TicketsServiceError::NotFound)?;

        self.notifier.submit(WebhookAction::Update, &updated);

        Ok(updated)
    }

    async fn delete_ticket(&self, ticket: TicketNumber) -> Result<Ticket, TicketsServiceError> {
        // The snapshot is fetched first so the event can carry the final
        // state of the ticket.
        let snapshot = self
            .repository
            .get_ticket(&ticket)
            .await?
            .ok_or(TicketsServiceError::NotFound)?;

        let affected = self.repository.delete_ticket(&ticket).await?;

        if affected == 0 {
            return Err(TicketsServiceError::NotFound);
        }

        self.notifier.submit(WebhookAction::Delete, &snapshot);

        Ok(snapshot)
    }
}

/// Ticket persistence and mutation operations.
#[automock]
#[async_trait]
pub trait TicketsService: Send + Sync {
    /// Retrieves all tickets, newest first.
    async fn list_tickets(&self) -> Result<Vec<Ticket>, TicketsServiceError>;

    /// Retrieves a single ticket.
    async fn get_ticket(&self, ticket: TicketNumber) -> Result<Ticket, TicketsServiceError>;

    /// Creates a ticket, synthesising the number, derived defaults, and
    /// timestamps.
    async fn create_ticket(&self, new: NewTicket) -> Result<Ticket, TicketsServiceError>;

    /// Applies a partial update and returns the resulting full record.
    async fn update_ticket(
        &self,
        ticket: TicketNumber,
        patch: TicketPatch,
    ) -> Result<Ticket, TicketsServiceError>;

    /// Deletes a ticket, returning the pre-delete snapshot.
    async fn delete_ticket(&self, ticket: TicketNumber) -> Result<Ticket, TicketsServiceError>;
}
