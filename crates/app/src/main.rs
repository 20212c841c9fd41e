//! TicketFlow operational CLI
//!
//! Out-of-band database maintenance: the legacy JSON import and the
//! key-column rename. Neither runs in the serving path.

use std::{path::PathBuf, process};

use clap::{Args, Parser, Subcommand};
use ticketflow_app::{
    database,
    migration::{self, ImportOutcome, RenameOutcome},
    tickets,
};

#[derive(Debug, Parser)]
#[command(name = "ticketflow-app", about = "TicketFlow CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(DbCommand),
}

#[derive(Debug, Args)]
struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Import the legacy flat-file JSON store into SQLite.
    ImportJson(ImportJsonArgs),

    /// Rename the legacy `_id` key column to `ticket_number`.
    RenameKey(RenameKeyArgs),
}

#[derive(Debug, Args)]
struct ImportJsonArgs {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:tickets.db?mode=rwc")]
    database_url: String,

    /// Path to the legacy JSON file
    #[arg(long, default_value = "db.json")]
    legacy_path: PathBuf,
}

#[derive(Debug, Args)]
struct RenameKeyArgs {
    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:tickets.db?mode=rwc")]
    database_url: String,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber_init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

fn tracing_subscriber_init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Db(DbCommand {
            command: DbSubcommand::ImportJson(args),
        }) => import_json(args).await,
        Commands::Db(DbCommand {
            command: DbSubcommand::RenameKey(args),
        }) => rename_key(args).await,
    }
}

async fn import_json(args: ImportJsonArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to open database: {error}"))?;

    tickets::init_schema(&pool)
        .await
        .map_err(|error| format!("failed to initialize schema: {error}"))?;

    let outcome = migration::import_legacy_json(&pool, &args.legacy_path)
        .await
        .map_err(|error| format!("import failed: {error}"))?;

    match outcome {
        ImportOutcome::MissingFile => println!("no legacy file found, nothing to import"),
        ImportOutcome::NothingToImport => println!("legacy file holds no records"),
        ImportOutcome::AlreadyPopulated { existing } => {
            println!("store already holds {existing} tickets, import skipped");
        }
        ImportOutcome::Imported { source, migrated } => {
            println!("imported {migrated} of {source} legacy tickets");
        }
    }

    database::close(&pool).await;

    Ok(())
}

async fn rename_key(args: RenameKeyArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to open database: {error}"))?;

    let outcome = migration::rename_key_column(&pool)
        .await
        .map_err(|error| format!("rename failed: {error}"))?;

    match outcome {
        RenameOutcome::AlreadyMigrated => println!("table already keyed by ticket_number"),
        RenameOutcome::NothingToMigrate => println!("no legacy table to migrate"),
        RenameOutcome::Migrated { rows } => println!("migrated {rows} tickets"),
    }

    database::close(&pool).await;

    Ok(())
}
