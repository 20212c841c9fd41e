//! Update Ticket Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use ticketflow_app::tickets::models::{Priority, Status, TicketPatch};

use crate::{
    extensions::*, state::State, tickets::errors::into_status_error, tickets::get::TicketResponse,
};

/// Update Ticket Request
///
/// Every field is optional; absent fields keep their stored value. The
/// ticket number and creation timestamp are not part of the request shape,
/// so they cannot be overwritten.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateTicketRequest {
    #[serde(default)]
    pub issue_title: Option<String>,

    #[serde(default)]
    pub issue_description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl UpdateTicketRequest {
    /// Parse the enum-valued fields, rejecting unknown labels.
    fn into_patch(self) -> Result<TicketPatch, StatusError> {
        let status = self
            .status
            .map(|status| status.parse::<Status>())
            .transpose()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        let priority = self
            .priority
            .map(|priority| priority.parse::<Priority>())
            .transpose()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        Ok(TicketPatch {
            issue_title: self.issue_title,
            issue_description: self.issue_description,
            status,
            priority,
            email: self.email,
            phone_number: self.phone_number,
            notes: self.notes,
        })
    }
}

/// Update Ticket Handler
#[endpoint(
    tags("tickets"),
    summary = "Update Ticket",
    responses(
        (status_code = StatusCode::OK, description = "Ticket updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<String>,
    json: JsonBody<UpdateTicketRequest>,
    depot: &mut Depot,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let updated = state
        .app
        .tickets
        .update_ticket(ticket.into_inner().into(), json.into_inner().into_patch()?)
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use ticketflow_app::tickets::{MockTicketsService, TicketsServiceError, models::TicketNumber};

    use crate::test_helpers::{make_ticket, tickets_service};

    use super::*;

    fn make_service(repo: MockTicketsService) -> Service {
        tickets_service(repo, Router::with_path("rest/ticket/{ticket}").put(handler))
    }

    #[tokio::test]
    async fn test_update_ticket_success() -> TestResult {
        let mut repo = MockTicketsService::new();

        let updated = {
            let mut ticket = make_ticket("1700000000000");
            ticket.status = Status::Closed;
            ticket
        };

        repo.expect_update_ticket()
            .once()
            .withf(|number, patch| {
                *number == TicketNumber::from("1700000000000")
                    && patch.status == Some(Status::Closed)
                    && patch.issue_title.is_none()
                    && patch.priority.is_none()
            })
            .return_once(|_, _| Ok(updated));

        repo.expect_list_tickets().never();
        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_delete_ticket().never();

        let mut res = TestClient::put("http://example.com/rest/ticket/1700000000000")
            .json(&json!({ "status": "Closed" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: TicketResponse = res.take_json().await?;

        assert_eq!(body.status, "Closed");
        assert_eq!(body.ticket_number, "1700000000000");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_ticket_returns_404() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_update_ticket()
            .once()
            .return_once(|_, _| Err(TicketsServiceError::NotFound));

        repo.expect_list_tickets().never();
        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::put("http://example.com/rest/ticket/1700000000000")
            .json(&json!({ "notes": "ping" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_unknown_status_returns_400() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_list_tickets().never();
        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::put("http://example.com/rest/ticket/1700000000000")
            .json(&json!({ "status": "Done" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_ignores_protected_fields() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_update_ticket()
            .once()
            .withf(|number, patch| {
                // The request tried to rewrite the key and creation time;
                // neither survives into the patch.
                *number == TicketNumber::from("1700000000000")
                    && *patch
                        == TicketPatch {
                            notes: Some("escalated".to_string()),
                            ..TicketPatch::default()
                        }
            })
            .return_once(|_, _| Ok(make_ticket("1700000000000")));

        repo.expect_list_tickets().never();
        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::put("http://example.com/rest/ticket/1700000000000")
            .json(&json!({
                "ticket_number": "9999999999999",
                "created": "2020-01-01T00:00:00Z",
                "notes": "escalated"
            }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
