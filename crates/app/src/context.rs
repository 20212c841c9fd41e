//! App Context

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;

use crate::{
    tickets::{self, SqliteTicketsService, TicketsService},
    webhook::{TicketNotifier, WebhookConfig, WebhookNotifier},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to initialize database schema")]
    Schema(#[source] sqlx::Error),
}

/// Explicitly constructed service graph handed to request handlers.
#[derive(Clone)]
pub struct AppContext {
    pub tickets: Arc<dyn TicketsService>,
    pub webhook: Arc<WebhookNotifier>,
}

impl AppContext {
    /// Builds the context from already-constructed parts.
    #[must_use]
    pub fn new(tickets: Arc<dyn TicketsService>, webhook: Arc<WebhookNotifier>) -> Self {
        Self { tickets, webhook }
    }

    /// Ensures the schema exists and wires the service graph over the pool.
    ///
    /// # Errors
    ///
    /// Returns an error when schema initialization fails; callers treat this
    /// as fatal at startup.
    pub async fn initialize(
        pool: SqlitePool,
        webhook: WebhookConfig,
    ) -> Result<Self, AppInitError> {
        tickets::init_schema(&pool).await.map_err(AppInitError::Schema)?;

        let webhook = Arc::new(WebhookNotifier::new(webhook));
        let notifier: Arc<dyn TicketNotifier> = webhook.clone();
        let tickets = Arc::new(SqliteTicketsService::new(pool, notifier));

        Ok(Self { tickets, webhook })
    }
}
