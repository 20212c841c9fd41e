//! Legacy Import Config

use std::path::PathBuf;

use clap::Args;

/// Legacy flat-file store import settings.
#[derive(Debug, Args)]
pub struct MigrationConfig {
    /// Path to the legacy JSON store checked at startup
    #[arg(long, env = "LEGACY_DB_PATH", default_value = "db.json")]
    pub legacy_db_path: PathBuf,
}
