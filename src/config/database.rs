//! Database configuration module for `CareLog`.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the foreign keys (and their cascade
//! rules) declared on the entities are what ends up in the database file.

use crate::entities::{CalendarEntry, MedicationOrder, Patient};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, EntityName, Schema, Statement};
use std::path::PathBuf;
use tracing::{debug, info};

/// Location of the database file when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/pacientes.db?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Extracts the on-disk file path from a `SQLite` URL.
///
/// Returns `None` for in-memory databases and for non-`SQLite` URLs.
#[must_use]
pub fn database_file_path(database_url: &str) -> Option<PathBuf> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();

    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Creates the directory that will hold the database file, if it is missing.
pub fn ensure_data_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_file_path(database_url) else {
        return Ok(());
    };

    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            info!("Creating data directory {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
        _ => {}
    }
    Ok(())
}

/// Opens a connection to the given database URL with foreign keys enforced.
///
/// The data directory is created first so a fresh install can open
/// `data/pacientes.db` without any manual setup.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    ensure_data_dir(database_url)?;
    debug!("Connecting to database at {}", database_url);

    let db = Database::connect(database_url).await?;
    db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
    Ok(db)
}

/// Establishes a connection using `DATABASE_URL`, falling back to the default file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    connect(&get_database_url()).await
}

/// Reports whether the patients table already exists.
///
/// This is the marker used by initialization: the schema (and seed data) is
/// only created when this returns `false`.
pub async fn patients_table_exists<C>(db: &C) -> Result<bool>
where
    C: ConnectionTrait,
{
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
            [Patient.table_name().into()],
        ))
        .await?;
    Ok(row.is_some())
}

/// Creates all tables using `SeaORM`'s schema generation from entity definitions.
///
/// Tables are created parent-first so every foreign key points at an existing table.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let patient_table = schema.create_table_from_entity(Patient);
    let order_table = schema.create_table_from_entity(MedicationOrder);
    let calendar_table = schema.create_table_from_entity(CalendarEntry);

    db.execute(builder.build(&patient_table)).await?;
    db.execute(builder.build(&order_table)).await?;
    db.execute(builder.build(&calendar_table)).await?;

    Ok(())
}
