//! Webhook event payloads.

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;

use crate::tickets::models::{Priority, Status, Ticket, TicketNumber};

/// Ticket mutation that triggered the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WebhookAction {
    Create,
    Update,
    Delete,
}

impl WebhookAction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for WebhookAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body posted to the configured webhook endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
    pub ticket_number: TicketNumber,
    pub action: WebhookAction,
    pub issue_title: String,
    pub issue_description: String,
    pub status: Status,
    pub priority: Priority,
    pub email: String,
    pub phone_number: String,
    pub notes: String,
    pub created: Timestamp,
    pub changed: Timestamp,
}

impl WebhookPayload {
    #[must_use]
    pub fn new(ticket: &Ticket, action: WebhookAction) -> Self {
        Self {
            ticket_number: ticket.ticket_number.clone(),
            action,
            issue_title: ticket.issue_title.clone(),
            issue_description: ticket.issue_description.clone(),
            status: ticket.status,
            priority: ticket.priority,
            email: ticket.email.clone(),
            phone_number: ticket.phone_number.clone(),
            notes: ticket.notes.clone(),
            created: ticket.created,
            changed: ticket.changed,
        }
    }
}
