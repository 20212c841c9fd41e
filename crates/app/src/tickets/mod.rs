//! Tickets

pub mod errors;
pub mod models;
mod repository;
pub mod service;

pub use errors::TicketsServiceError;
pub use repository::init_schema;
pub use service::*;
