//! Ticket Errors

use salvo::http::StatusError;
use tracing::error;

use ticketflow_app::tickets::TicketsServiceError;

pub(crate) fn into_status_error(error: TicketsServiceError) -> StatusError {
    match error {
        TicketsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Ticket already exists")
        }
        TicketsServiceError::InvalidReference
        | TicketsServiceError::MissingRequiredData
        | TicketsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid ticket payload")
        }
        TicketsServiceError::Sql(source) => {
            error!("ticket store operation failed: {source}");

            StatusError::internal_server_error()
        }
        TicketsServiceError::NotFound => {
            error!("ticket not found");

            StatusError::not_found()
        }
    }
}
