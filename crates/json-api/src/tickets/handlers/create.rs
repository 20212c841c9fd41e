//! Create Ticket Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use ticketflow_app::tickets::models::{NewTicket, Priority, Status};

use crate::{
    extensions::*, state::State, tickets::errors::into_status_error, tickets::get::TicketResponse,
};

/// Create Ticket Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateTicketRequest {
    /// Optional title; derived from the description when absent
    #[serde(default)]
    pub issue_title: Option<String>,

    /// Detailed issue description
    pub issue_description: String,

    /// Optional status; defaults to `Open` when absent
    #[serde(default)]
    pub status: Option<String>,

    /// Priority: `Critical`, `High`, `Medium` or `Low`
    pub priority: String,

    /// Contact email address
    pub email: String,

    /// Contact phone number
    pub phone_number: String,

    /// Optional agent notes
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreateTicketRequest {
    /// Parse the enum-valued fields, rejecting unknown labels.
    fn into_new_ticket(self) -> Result<NewTicket, StatusError> {
        let status = self
            .status
            .map(|status| status.parse::<Status>())
            .transpose()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        let priority = self
            .priority
            .parse::<Priority>()
            .map_err(|error| StatusError::bad_request().brief(error.to_string()))?;

        Ok(NewTicket {
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

/// Create Ticket Handler
#[endpoint(
    tags("tickets"),
    summary = "Create Ticket",
    responses(
        (status_code = StatusCode::CREATED, description = "Ticket created"),
        (status_code = StatusCode::CONFLICT, description = "Ticket already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateTicketRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<TicketResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let ticket = state
        .app
        .tickets
        .create_ticket(json.into_inner().into_new_ticket()?)
        .await
        .map_err(into_status_error)?;

    res.add_header(
        LOCATION,
        format!("/rest/ticket/{}", ticket.ticket_number),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(ticket.into()))
}
