//! Get Ticket Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use ticketflow_app::tickets::models::Ticket;

use crate::{extensions::*, state::State, tickets::errors::into_status_error};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketResponse {
    /// The unique ticket identifier
    pub ticket_number: String,

    /// Brief issue summary
    pub issue_title: String,

    /// Detailed issue description
    pub issue_description: String,

    /// Workflow status: `Open`, `In-progress` or `Closed`
    pub status: String,

    /// Priority: `Critical`, `High`, `Medium` or `Low`
    pub priority: String,

    /// Contact email address
    pub email: String,

    /// Contact phone number
    pub phone_number: String,

    /// Agent notes
    pub notes: String,

    /// Creation timestamp, RFC 3339
    pub created: String,

    /// Last modification timestamp, RFC 3339
    pub changed: String,
}

impl From<Ticket> for TicketResponse {
    fn from(ticket: Ticket) -> Self {
        TicketResponse {
            ticket_number: ticket.ticket_number.into_string(),
            issue_title: ticket.issue_title,
            issue_description: ticket.issue_description,
            status: ticket.status.as_str().to_string(),
            priority: ticket.priority.as_str().to_string(),
            email: ticket.email,
            phone_number: ticket.phone_number,
            notes: ticket.notes,
            created: ticket.created.to_string(),
            changed: ticket.changed.to_string(),
        }
    }
}

/// Get Ticket Handler
///
/// Returns a single ticket by its number.
#[endpoint(
    tags("tickets"),
    summary = "Get Ticket",
    responses(
        (status_code = StatusCode::OK, description = "Ticket found"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let ticket = state
        .app
        .tickets
        .get_ticket(ticket.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(ticket.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use ticketflow_app::tickets::{MockTicketsService, TicketsServiceError, models::TicketNumber};

    use crate::test_helpers::{make_ticket, tickets_service};

    use super::*;

    fn make_service(repo: MockTicketsService) -> Service {
        tickets_service(repo, Router::with_path("rest/ticket/{ticket}").get(handler))
    }

    #[tokio::test]
    async fn test_get_returns_ticket() -> TestResult {
        let mut repo = MockTicketsService::new();
        let ticket = make_ticket("1700000000000");

        repo.expect_get_ticket()
            .once()
            .withf(|number| *number == TicketNumber::from("1700000000000"))
            .return_once(move |_| Ok(ticket));

        repo.expect_list_tickets().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let mut res = TestClient::get("http://example.com/rest/ticket/1700000000000")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: TicketResponse = res.take_json().await?;

        assert_eq!(body.ticket_number, "1700000000000");
        assert_eq!(body.status, "Open");
        assert_eq!(body.priority, "Medium");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_ticket_returns_404() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_get_ticket()
            .once()
            .return_once(|_| Err(TicketsServiceError::NotFound));

        repo.expect_list_tickets().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::get("http://example.com/rest/ticket/1700000000000")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_store_error_returns_500() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_get_ticket()
            .once()
            .return_once(|_| Err(TicketsServiceError::Sql(sqlx::Error::PoolClosed)));

        repo.expect_list_tickets().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::get("http://example.com/rest/ticket/1700000000000")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
