//! Shared ticket domain, persistence, webhook, and migration modules.

pub mod context;
pub mod database;
pub mod migration;
pub mod tickets;
pub mod webhook;
