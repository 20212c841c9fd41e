//! Update Webhook Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, webhook::get::WebhookStatusResponse};

/// Update Webhook Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateWebhookStatusRequest {
    /// Desired delivery flag
    pub enabled: bool,
}

/// Update Webhook Status Handler
///
/// Flips outbound delivery on or off at runtime and echoes the new state.
#[endpoint(
    tags("webhook"),
    summary = "Update Webhook Status",
    responses(
        (status_code = StatusCode::OK, description = "Webhook status updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<UpdateWebhookStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<WebhookStatusResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let enabled = json.into_inner().enabled;

    state.app.webhook.set_enabled(enabled);

    Ok(Json(WebhookStatusResponse { enabled }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use crate::test_helpers::webhook_service;

    use super::*;

    #[tokio::test]
    async fn test_update_disables_delivery() -> TestResult {
        let (service, webhook) =
            webhook_service(true, Router::with_path("rest/webhook/status").put(handler));

        let body: WebhookStatusResponse = TestClient::put("http://example.com/rest/webhook/status")
            .json(&json!({ "enabled": false }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert!(!body.enabled);
        assert!(!webhook.is_enabled());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_enables_delivery() -> TestResult {
        let (service, webhook) =
            webhook_service(false, Router::with_path("rest/webhook/status").put(handler));

        let body: WebhookStatusResponse = TestClient::put("http://example.com/rest/webhook/status")
            .json(&json!({ "enabled": true }))
            .send(&service)
            .await
            .take_json()
            .await?;

        assert!(body.enabled);
        assert!(webhook.is_enabled());

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejects_non_boolean_flag() -> TestResult {
        let (service, webhook) =
            webhook_service(true, Router::with_path("rest/webhook/status").put(handler));

        let res = TestClient::put("http://example.com/rest/webhook/status")
            .json(&json!({ "enabled": "yes" }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(webhook.is_enabled(), "flag must be untouched on bad input");

        Ok(())
    }
}
