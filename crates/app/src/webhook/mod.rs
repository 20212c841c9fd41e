//! Webhook notification subsystem.

mod notifier;
mod payload;

pub use notifier::{
    MockTicketNotifier, TicketNotifier, WebhookConfig, WebhookDeliveryError, WebhookNotifier,
};
pub use payload::{WebhookAction, WebhookPayload};
