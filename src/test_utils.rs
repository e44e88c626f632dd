//! Shared test utilities for `CareLog`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{medication, patient, schedule},
    entities,
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date in tests.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a test patient with sensible defaults.
///
/// # Defaults
/// * `age`: 80
/// * `condition`: "Hypertension"
pub async fn create_test_patient(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::patient::Model> {
    patient::add_patient(db, name, 80, "Hypertension").await
}

/// Creates a test medication order from text time input, with empty notes.
pub async fn create_test_order(
    db: &DatabaseConnection,
    patient_id: i64,
    medication: &str,
    time: &str,
    date: NaiveDate,
) -> Result<entities::medication_order::Model> {
    medication::add_medication_order(
        db,
        patient_id,
        medication,
        schedule::parse_time(time)?,
        date,
        "",
    )
    .await
}

/// Sets up a complete test environment with one patient named "Ana".
/// Returns (db, patient) for common test scenarios.
pub async fn setup_with_patient() -> Result<(DatabaseConnection, entities::patient::Model)> {
    let db = setup_test_db().await?;
    let patient = create_test_patient(&db, "Ana").await?;
    Ok((db, patient))
}
