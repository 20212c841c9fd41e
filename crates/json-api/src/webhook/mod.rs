//! Webhook status endpoints

mod handlers;

pub(crate) use handlers::*;
