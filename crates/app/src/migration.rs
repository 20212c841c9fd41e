//! One-shot migrations from the legacy stores.
//!
//! Two distinct procedures live here: the legacy flat-file JSON import that
//! runs on every server startup, and the rarer key-column rename that is only
//! ever invoked by hand through the CLI.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use sqlx::{Row, SqlitePool, query, query_as};
use thiserror::Error;
use tracing::{error, info, warn};

const COUNT_TICKETS_SQL: &str = "SELECT COUNT(*) FROM tickets";

const IMPORT_TICKET_SQL: &str = "\
INSERT OR IGNORE INTO tickets (ticket_number, issue_title, issue_description, status, \
priority, email, phone_number, notes, created, changed) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

const TABLE_INFO_SQL: &str = "PRAGMA table_info(tickets)";

const SELECT_LEGACY_ROWS_SQL: &str = "SELECT * FROM tickets";

const CREATE_RENAMED_TABLE_SQL: &str = "\
CREATE TABLE tickets_new (
    ticket_number TEXT PRIMARY KEY,
    issue_title TEXT NOT NULL,
    issue_description TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('Open', 'In-progress', 'Closed')),
    priority TEXT NOT NULL CHECK (priority IN ('Critical', 'High', 'Medium', 'Low')),
    email TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    notes TEXT DEFAULT '',
    created TEXT NOT NULL,
    changed TEXT NOT NULL
)";

const COPY_RENAMED_ROW_SQL: &str = "\
INSERT INTO tickets_new (ticket_number, issue_title, issue_description, status, \
priority, email, phone_number, notes, created, changed) \
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

/// Migration failure. Never fatal to server startup; the caller logs it and
/// keeps going.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Reading or backing up the legacy file failed.
    #[error("legacy file I/O failed")]
    Io(#[from] std::io::Error),

    /// The legacy file is not valid JSON.
    #[error("legacy file could not be parsed")]
    Parse(#[from] serde_json::Error),

    /// The underlying store rejected the batch.
    #[error("storage error during migration")]
    Sql(#[from] sqlx::Error),
}

/// Result of a legacy JSON import attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No legacy file was present.
    MissingFile,

    /// The legacy file held zero records.
    NothingToImport,

    /// The store already holds rows; the import never re-runs.
    AlreadyPopulated { existing: i64 },

    /// Records were transferred.
    Imported { source: usize, migrated: u64 },
}

/// Legacy flat-file document: `{ "ticket": [ ... ] }`.
#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    ticket: Vec<LegacyTicket>,
}

/// A record under the legacy schema, keyed by `_id`.
///
/// Field values are carried over verbatim as text; the table's CHECK
/// constraints are the only gate on enum values, exactly as for the rows the
/// legacy store produced.
#[derive(Debug, Deserialize)]
struct LegacyTicket {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    issue_title: String,
    #[serde(default)]
    issue_description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    priority: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    created: String,
    #[serde(default)]
    changed: String,
}

/// Imports the legacy flat-file JSON store into the tickets table.
///
/// Idempotent at the database level: once the table holds any row the import
/// is skipped entirely, so repeated invocations after a successful (or
/// partial) run never duplicate data. The whole batch runs in one
/// transaction with insert-or-ignore per record, and the source file is
/// copied to `<path>.backup` afterwards.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed, or when the
/// transaction itself fails. Individual bad records are logged and skipped.
pub async fn import_legacy_json(
    pool: &SqlitePool,
    path: &Path,
) -> Result<ImportOutcome, MigrationError> {
    if !tokio::fs::try_exists(path).await? {
        info!(path = %path.display(), "no legacy file found, skipping import");

        return Ok(ImportOutcome::MissingFile);
    }

    let raw = tokio::fs::read_to_string(path).await?;
    let document: LegacyDocument = serde_json::from_str(&raw)?;
    let records = document.ticket;

    if records.is_empty() {
        info!(path = %path.display(), "legacy file holds no records, skipping import");

        return Ok(ImportOutcome::NothingToImport);
    }

    let (existing,): (i64,) = query_as(COUNT_TICKETS_SQL).fetch_one(pool).await?;

    if existing > 0 {
        info!(existing, "store already populated, skipping legacy import");

        return Ok(ImportOutcome::AlreadyPopulated { existing });
    }

    info!(
        count = records.len(),
        path = %path.display(),
        "importing legacy records"
    );

    let mut migrated: u64 = 0;
    let mut tx = pool.begin().await?;

    for record in &records {
        let insert = query(IMPORT_TICKET_SQL)
            .bind(&record.id)
            .bind(&record.issue_title)
            .bind(&record.issue_description)
            .bind(&record.status)
            .bind(&record.priority)
            .bind(&record.email)
            .bind(&record.phone_number)
            .bind(&record.notes)
            .bind(&record.created)
            .bind(&record.changed)
            .execute(&mut *tx)
            .await;

        match insert {
            Ok(result) => migrated += result.rows_affected(),
            Err(insert_error) => {
                error!(ticket_number = %record.id, "failed to import record: {insert_error}");
            }
        }
    }

    tx.commit().await?;

    if migrated as usize != records.len() {
        warn!(
            source = records.len(),
            migrated, "imported fewer records than the legacy file holds"
        );
    }

    let backup = PathBuf::from(format!("{}.backup", path.display()));

    match tokio::fs::copy(path, &backup).await {
        Ok(_bytes) => info!(backup = %backup.display(), "created legacy file backup"),
        Err(copy_error) => {
            warn!(backup = %backup.display(), "failed to back up legacy file: {copy_error}");
        }
    }

    info!(migrated, source = records.len(), "legacy import finished");

    Ok(ImportOutcome::Imported {
        source: records.len(),
        migrated,
    })
}

/// Result of a key-column rename attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The table already carries the `ticket_number` column.
    AlreadyMigrated,

    /// There is no tickets table, or it carries neither key column.
    NothingToMigrate,

    /// Rows were copied into the renamed schema.
    Migrated { rows: u64 },
}

/// Renames the legacy `_id` primary-key column to `ticket_number`.
///
/// Copies every row into a freshly-created table with the new column name,
/// then drops the old table and renames the new one in the same
/// transaction. Out-of-band maintenance only; the running service never
/// calls this.
///
/// # Errors
///
/// Returns an error when schema introspection or the table swap fails.
/// Individual rows that cannot be copied are logged and skipped.
pub async fn rename_key_column(pool: &SqlitePool) -> Result<RenameOutcome, sqlx::Error> {
    let columns = query(TABLE_INFO_SQL).fetch_all(pool).await?;

    let mut has_old = false;
    let mut has_new = false;

    for column in &columns {
        match column.try_get::<String, _>("name")?.as_str() {
            "_id" => has_old = true,
            "ticket_number" => has_new = true,
            _ => {}
        }
    }

    if has_new {
        info!("tickets table already keyed by ticket_number, nothing to do");

        return Ok(RenameOutcome::AlreadyMigrated);
    }

    if !has_old {
        warn!("tickets table is missing or carries neither key column");

        return Ok(RenameOutcome::NothingToMigrate);
    }

    let mut tx = pool.begin().await?;

    query(CREATE_RENAMED_TABLE_SQL).execute(&mut *tx).await?;

    let rows = query(SELECT_LEGACY_ROWS_SQL).fetch_all(&mut *tx).await?;
    let mut migrated: u64 = 0;

    for row in &rows {
        let id: String = row.try_get("_id")?;

        let copy = query(COPY_RENAMED_ROW_SQL)
            .bind(&id)
            .bind(row.try_get::<String, _>("issue_title")?)
            .bind(row.try_get::<String, _>("issue_description")?)
            .bind(row.try_get::<String, _>("status")?)
            .bind(row.try_get::<String, _>("priority")?)
            .bind(row.try_get::<String, _>("email")?)
            .bind(row.try_get::<String, _>("phone_number")?)
            .bind(row.try_get::<Option<String>, _>("notes")?.unwrap_or_default())
            .bind(row.try_get::<String, _>("created")?)
            .bind(row.try_get::<String, _>("changed")?)
            .execute(&mut *tx)
            .await;

        match copy {
            Ok(_result) => migrated += 1,
            Err(copy_error) => {
                error!(ticket_number = %id, "failed to copy row: {copy_error}");
            }
        }
    }

    query("DROP TABLE tickets").execute(&mut *tx).await?;
    query("ALTER TABLE tickets_new RENAME TO tickets")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(rows = migrated, "renamed key column to ticket_number");

    Ok(RenameOutcome::Migrated { rows: migrated })
}
