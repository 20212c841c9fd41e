//! Get Webhook Status Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

/// Webhook Status Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct WebhookStatusResponse {
    /// Whether ticket events are currently delivered
    pub enabled: bool,
}

/// Get Webhook Status Handler
///
/// Reports whether outbound delivery is currently enabled. The stored flag
/// is authoritative; clients never cache it.
#[endpoint(tags("webhook"), summary = "Get Webhook Status")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<WebhookStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    Ok(Json(WebhookStatusResponse {
        enabled: state.app.webhook.is_enabled(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::webhook_service;

    use super::*;

    #[tokio::test]
    async fn test_status_reports_enabled() -> TestResult {
        let (service, _webhook) =
            webhook_service(true, Router::with_path("rest/webhook/status").get(handler));

        let body: WebhookStatusResponse = TestClient::get("http://example.com/rest/webhook/status")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert!(body.enabled);

        Ok(())
    }

    #[tokio::test]
    async fn test_status_reports_disabled() -> TestResult {
        let (service, _webhook) =
            webhook_service(false, Router::with_path("rest/webhook/status").get(handler));

        let body: WebhookStatusResponse = TestClient::get("http://example.com/rest/webhook/status")
            .send(&service)
            .await
            .take_json()
            .await?;

        assert!(!body.enabled);

        Ok(())
    }
}
