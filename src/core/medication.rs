//! Medication order business logic - Scheduling doses and toggling their administered flag.
//!
//! Orders are created for an existing patient with the flag cleared. After
//! that the only mutation is [`update_administered_status`]; orders disappear
//! only when their patient is removed.

use crate::{
    core::schedule::format_time,
    entities::{MedicationOrder, Patient, medication_order},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Schedules a dose of `medication` for a patient at `time` on `date`.
///
/// The medication name and notes are trimmed; an empty name is rejected
/// before anything is written. Fails with [`Error::PatientNotFound`] when the
/// patient does not exist.
pub async fn add_medication_order<C>(
    db: &C,
    patient_id: i64,
    medication: &str,
    time: NaiveTime,
    date: NaiveDate,
    notes: &str,
) -> Result<medication_order::Model>
where
    C: ConnectionTrait,
{
    if medication.trim().is_empty() {
        return Err(Error::EmptyMedicationName);
    }

    Patient::find_by_id(patient_id)
        .one(db)
        .await?
        .ok_or(Error::PatientNotFound { id: patient_id })?;

    let order = medication_order::ActiveModel {
        patient_id: Set(patient_id),
        medication: Set(medication.trim().to_string()),
        scheduled_time: Set(format_time(time)),
        scheduled_date: Set(date),
        administered: Set(false),
        notes: Set(Some(notes.trim().to_string())),
        ..Default::default()
    };

    let result = order.insert(db).await?;
    info!(
        "Scheduled {} for patient {} at {} on {}",
        result.medication, patient_id, result.scheduled_time, result.scheduled_date
    );
    Ok(result)
}

/// Finds a medication order by id.
pub async fn get_order_by_id(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Option<medication_order::Model>> {
    MedicationOrder::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every order of one patient, by date then time.
pub async fn list_orders_for_patient(
    db: &DatabaseConnection,
    patient_id: i64,
) -> Result<Vec<medication_order::Model>> {
    MedicationOrder::find()
        .filter(medication_order::Column::PatientId.eq(patient_id))
        .order_by_asc(medication_order::Column::ScheduledDate)
        .order_by_asc(medication_order::Column::ScheduledTime)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Marks a dose as administered (or not) and returns the updated order.
///
/// Setting the same value twice is harmless. No history is kept here; see
/// [`crate::core::calendar`] for per-day status records.
pub async fn update_administered_status(
    db: &DatabaseConnection,
    order_id: i64,
    administered: bool,
) -> Result<medication_order::Model> {
    let order = MedicationOrder::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let mut active_model: medication_order::ActiveModel = order.into();
    active_model.administered = Set(administered);
    let updated = active_model.update(db).await?;

    debug!("Order {} administered = {}", order_id, administered);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::schedule::parse_time;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_add_medication_order_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();
        let time = parse_time("08:00")?;

        let result = add_medication_order(&db, 1, "", time, date(2024, 1, 1), "").await;
        assert!(matches!(result.unwrap_err(), Error::EmptyMedicationName));

        let result = add_medication_order(&db, 1, " \t ", time, date(2024, 1, 1), "").await;
        assert!(matches!(result.unwrap_err(), Error::EmptyMedicationName));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_medication_order_integration() -> Result<()> {
        let (db, patient) = setup_with_patient().await?;

        let order = add_medication_order(
            &db,
            patient.id,
            " Captopril 25mg ",
            parse_time("08:00")?,
            date(2024, 3, 15),
            " Before breakfast ",
        )
        .await?;

        assert_eq!(order.patient_id, patient.id);
        assert_eq!(order.medication, "Captopril 25mg");
        assert_eq!(order.scheduled_time, "08:00");
        assert_eq!(order.time_of_day(), Some(parse_time("08:00")?));
        assert_eq!(order.scheduled_date, date(2024, 3, 15));
        assert!(!order.administered);
        assert_eq!(order.notes.as_deref(), Some("Before breakfast"));

        let retrieved = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(retrieved, order);

        Ok(())
    }

    #[tokio::test]
    async fn test_add_medication_order_unknown_patient() -> Result<()> {
        let db = setup_test_db().await?;

        let time = parse_time("10:00")?;
        let result = add_medication_order(&db, 77, "Aspirin", time, date(2024, 1, 1), "").await;
        assert!(matches!(
            result.unwrap_err(),
            Error::PatientNotFound { id: 77 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_administered_status_idempotent() -> Result<()> {
        let (db, patient) = setup_with_patient().await?;
        let day = date(2024, 1, 1);
        let order = create_test_order(&db, patient.id, "Aspirin", "10:00", day).await?;

        let first = update_administered_status(&db, order.id, true).await?;
        assert!(first.administered);
        let second = update_administered_status(&db, order.id, true).await?;
        assert_eq!(first, second);

        let retrieved = get_order_by_id(&db, order.id).await?.unwrap();
        assert!(retrieved.administered);

        let reverted = update_administered_status(&db, order.id, false).await?;
        assert!(!reverted.administered);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_administered_status_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_administered_status(&db, 5, true).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::OrderNotFound { id: 5 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_for_patient() -> Result<()> {
        let (db, patient) = setup_with_patient().await?;
        let other = create_test_patient(&db, "Bruno").await?;

        create_test_order(&db, patient.id, "Late", "08:00", date(2024, 1, 2)).await?;
        create_test_order(&db, patient.id, "Early", "20:00", date(2024, 1, 1)).await?;
        create_test_order(&db, other.id, "Not mine", "08:00", date(2024, 1, 1)).await?;

        let orders = list_orders_for_patient(&db, patient.id).await?;
        let names: Vec<&str> = orders.iter().map(|o| o.medication.as_str()).collect();
        assert_eq!(names, ["Early", "Late"]);

        Ok(())
    }
}
