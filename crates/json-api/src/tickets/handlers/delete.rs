//! Delete Ticket Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State, tickets::errors::into_status_error};

/// Ticket Deleted Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TicketDeletedResponse {
    /// Confirmation message
    pub message: String,
}

/// Delete Ticket Handler
#[endpoint(
    tags("tickets"),
    summary = "Delete Ticket",
    responses(
        (status_code = StatusCode::OK, description = "Ticket deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Ticket not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    ticket: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<TicketDeletedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .tickets
        .delete_ticket(ticket.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(TicketDeletedResponse {
        message: "Ticket deleted successfully".to_string(),
    }))
}
