//! Outbound webhook delivery.

use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use mockall::automock;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    tickets::models::Ticket,
    webhook::payload::{WebhookAction, WebhookPayload},
};

/// Configuration for the outbound webhook endpoint.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Target URL, e.g. `"https://hooks.example.com/tickets"`.
    pub url: String,

    /// Whether deliveries are performed at all.
    pub enabled: bool,

    /// Per-delivery send timeout.
    pub timeout: Duration,
}

/// Seam between ticket mutations and webhook delivery.
///
/// Submission must not block the caller; implementations schedule delivery
/// and absorb every failure on their side of the boundary.
#[automock]
pub trait TicketNotifier: Send + Sync {
    /// Submits a mutation event for best-effort delivery.
    fn submit(&self, action: WebhookAction, ticket: &Ticket);
}

/// Best-effort webhook notifier.
///
/// One HTTP POST per event, no retries and no queue. Delivery runs on a
/// detached task, so the triggering request never waits for the network.
#[derive(Debug)]
pub struct WebhookNotifier {
    url: String,
    enabled: AtomicBool,
    timeout: Duration,
    http: Client,
}

/// Webhook delivery failure, only ever logged.
#[derive(Debug, Error)]
pub enum WebhookDeliveryError {
    /// Connection, timeout, or protocol failure.
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("webhook endpoint returned status {0}")]
    UnexpectedStatus(reqwest::StatusCode),
}

impl WebhookNotifier {
    /// Create a notifier from the given configuration.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        info!(
            url = %config.url,
            enabled = config.enabled,
            timeout_ms = config.timeout.as_millis(),
            "webhook notifier initialised"
        );

        Self {
            url: config.url,
            enabled: AtomicBool::new(config.enabled),
            timeout: config.timeout,
            http: Client::new(),
        }
    }

    /// Whether deliveries are currently performed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Toggles delivery at runtime. Deliveries already in flight are not
    /// cancelled.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);

        info!(enabled, "webhook notifier toggled");
    }

    /// Target endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl TicketNotifier for WebhookNotifier {
    fn submit(&self, action: WebhookAction, ticket: &Ticket) {
        if !self.is_enabled() {
            debug!(
                %action,
                ticket_number = %ticket.ticket_number,
                "webhook disabled, skipping delivery"
            );

            return;
        }

        let payload = WebhookPayload::new(ticket, action);
        let http = self.http.clone();
        let url = self.url.clone();
        let timeout = self.timeout;

        tokio::spawn(async move {
            let ticket_number = payload.ticket_number.clone();

            match deliver(&http, &url, timeout, &payload).await {
                Ok(status) => {
                    info!(%action, %ticket_number, %status, "webhook delivered");
                }
                Err(delivery_error) => {
                    error!(
                        %action,
                        %ticket_number,
                        "webhook delivery failed: {delivery_error}"
                    );
                }
            }
        });
    }
}

async fn deliver(
    http: &Client,
    url: &str,
    timeout: Duration,
    payload: &WebhookPayload,
) -> Result<reqwest::StatusCode, WebhookDeliveryError> {
    let response = http
        .post(url)
        .timeout(timeout)
        .json(payload)
        .send()
        .await?;

    let status = response.status();

    if !status.is_success() {
        return Err(WebhookDeliveryError::UnexpectedStatus(status));
    }

    Ok(status)
}
