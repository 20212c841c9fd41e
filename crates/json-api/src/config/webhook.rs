//! Webhook Config

use std::time::Duration;

use clap::Args;

use ticketflow_app::webhook::WebhookConfig;

/// Outbound webhook settings.
#[derive(Debug, Args)]
pub struct WebhookSettings {
    /// Webhook endpoint URL
    #[arg(long = "webhook-url", env = "WEBHOOK_URL")]
    pub url: String,

    /// Whether webhook delivery starts enabled
    #[arg(long = "webhook-enabled", env = "WEBHOOK_ENABLED", default_value_t = true)]
    pub enabled: bool,

    /// Per-delivery timeout in milliseconds
    #[arg(long = "webhook-timeout-ms", env = "WEBHOOK_TIMEOUT_MS", default_value_t = 5_000)]
    pub timeout_ms: u64,
}

impl WebhookSettings {
    /// Convert to the notifier's configuration type.
    #[must_use]
    pub fn to_config(&self) -> WebhookConfig {
        WebhookConfig {
            url: self.url.clone(),
            enabled: self.enabled,
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }
}
