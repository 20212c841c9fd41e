//! TicketFlow JSON API Server

use std::process;

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ticketflow_app::{
    context::AppContext,
    database,
    migration::{self, ImportOutcome},
};

use crate::{config::ServerConfig, state::State};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod config;
mod extensions;
mod healthcheck;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;
mod tickets;
mod webhook;

/// TicketFlow JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    // Initialize logging
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.log_level));

    if config.logging.log_json {
        tracing_subscriber::fmt().json().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let pool = match database::connect(&config.database.database_url).await {
        Ok(pool) => pool,
        Err(db_error) => {
            error!("failed to open ticket database: {db_error}");

            process::exit(1);
        }
    };

    let app = match AppContext::initialize(pool.clone(), config.webhook.to_config()).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    // One-shot legacy import. A failure here leaves the store untouched, so
    // the server still comes up.
    match migration::import_legacy_json(&pool, &config.migration.legacy_db_path).await {
        Ok(ImportOutcome::MissingFile) => {}
        Ok(ImportOutcome::NothingToImport) => info!("legacy store holds no records"),
        Ok(ImportOutcome::AlreadyPopulated { existing }) => {
            info!("store already holds {existing} tickets, legacy import skipped");
        }
        Ok(ImportOutcome::Imported { source, migrated }) => {
            info!("imported {migrated} of {source} legacy tickets");
        }
        Err(import_error) => warn!("legacy import failed: {import_error}"),
    }

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(Router::with_path("health").get(healthcheck::handler))
        .push(
            Router::with_path("rest")
                .push(
                    Router::with_path("ticket")
                        .get(tickets::index::handler)
                        .post(tickets::create::handler)
                        .push(
                            Router::with_path("{ticket}")
                                .get(tickets::get::handler)
                                .put(tickets::update::handler)
                                .delete(tickets::delete::handler),
                        ),
                )
                .push(
                    Router::with_path("webhook/status")
                        .get(webhook::get::handler)
                        .put(webhook::update::handler),
                ),
        );

    let doc = OpenApi::new("TicketFlow API", "0.1.0").merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    // Start serving requests
    server.serve(router).await;

    // Drain the pool once the server has stopped accepting work
    database::close(&pool).await;
}
