//! Store initialization - schema creation and first-run seeding.
//!
//! Initialization keys off the patients table: when it is missing, all three
//! tables are created and the seed data is inserted in one database
//! transaction. When it exists, nothing happens, so this is safe to run on
//! every startup.

use crate::{
    config::{
        database::{create_tables, patients_table_exists},
        seed::SeedConfig,
    },
    core::{medication::add_medication_order, patient::add_patient, schedule},
    errors::{Error, Result},
};
use chrono::{NaiveDate, TimeDelta};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::info;

/// Rows inserted by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    /// Patients created
    pub patients: usize,
    /// Medication orders created
    pub orders: usize,
}

/// Creates the schema and seeds it if the store is empty.
///
/// Seed orders are dated relative to today. Returns `true` when the schema
/// was created by this call.
pub async fn initialize(db: &DatabaseConnection, seed: &SeedConfig) -> Result<bool> {
    initialize_on(db, seed, schedule::today()).await
}

/// Same as [`initialize`], with an explicit base date for seed orders.
pub async fn initialize_on(
    db: &DatabaseConnection,
    seed: &SeedConfig,
    base_date: NaiveDate,
) -> Result<bool> {
    if patients_table_exists(db).await? {
        info!("Database already initialized, skipping schema creation");
        return Ok(false);
    }

    // Schema and seed rows succeed or fail together
    let txn = db.begin().await?;
    create_tables(&txn).await?;
    let summary = seed_records(&txn, seed, base_date).await?;
    txn.commit().await?;

    info!(
        "Created schema and seeded {} patients with {} medication orders",
        summary.patients, summary.orders
    );
    Ok(true)
}

/// Inserts the seed patients and their orders.
pub async fn seed_records<C>(db: &C, seed: &SeedConfig, base_date: NaiveDate) -> Result<SeedSummary>
where
    C: ConnectionTrait,
{
    let mut summary = SeedSummary::default();

    for patient_seed in &seed.patients {
        let patient = add_patient(
            db,
            &patient_seed.name,
            patient_seed.age,
            &patient_seed.condition,
        )
        .await?;
        summary.patients += 1;

        for dose in &patient_seed.medications {
            let time = schedule::parse_time(&dose.time)?;
            let date = TimeDelta::try_days(dose.day_offset)
                .and_then(|offset| base_date.checked_add_signed(offset))
                .ok_or_else(|| Error::InvalidDate {
                    value: format!("{base_date} + {} days", dose.day_offset),
                })?;
            add_medication_order(db, patient.id, &dose.medication, time, date, &dose.notes).await?;
            summary.orders += 1;
        }
    }

    Ok(summary)
}
