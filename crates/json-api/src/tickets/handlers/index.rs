//! Ticket Index Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{extensions::*, state::State, tickets::errors::into_status_error, tickets::get::TicketResponse};

/// Ticket Index Handler
///
/// Returns every ticket in the store, newest first.
#[endpoint(tags("tickets"), summary = "List Tickets")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<TicketResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let tickets = state
        .app
        .tickets
        .list_tickets()
        .await
        .map_err(into_status_error)?;

    Ok(Json(tickets.into_iter().map(Into::into).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use ticketflow_app::tickets::MockTicketsService;

    use crate::test_helpers::{make_ticket, tickets_service};

    use super::*;

    fn make_service(repo: MockTicketsService) -> Service {
        tickets_service(repo, Router::with_path("rest/ticket").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_empty_array() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_list_tickets().once().return_once(|| Ok(vec![]));

        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let mut res = TestClient::get("http://example.com/rest/ticket")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: Vec<TicketResponse> = res.take_json().await?;

        assert!(body.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_tickets() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_list_tickets().once().return_once(|| {
            Ok(vec![
                make_ticket("1700000000001"),
                make_ticket("1700000000000"),
            ])
        });

        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let body: Vec<TicketResponse> = TestClient::get("http://example.com/rest/ticket")
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert_eq!(body.len(), 2, "expected two tickets");
        assert_eq!(body[0].ticket_number, "1700000000001");
        assert_eq!(body[1].ticket_number, "1700000000000");

        Ok(())
    }

    #[tokio::test]
    async fn test_index_store_error_returns_500() -> TestResult {
        let mut repo = MockTicketsService::new();

        repo.expect_list_tickets()
            .once()
            .return_once(|| Err(sqlx::Error::PoolClosed.into()));

        repo.expect_get_ticket().never();
        repo.expect_create_ticket().never();
        repo.expect_update_ticket().never();
        repo.expect_delete_ticket().never();

        let res = TestClient::get("http://example.com/rest/ticket")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
