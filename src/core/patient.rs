//! Patient business logic - Handles registering, listing, editing and removing residents.
//!
//! Input is validated before any write: names must be non-empty after trimming
//! and ages must be positive. Removing a patient also removes all of their
//! medication orders through the cascading foreign key.

use crate::{
    entities::{Patient, patient},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{debug, info};

fn validate_patient(name: &str, age: i32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::EmptyPatientName);
    }
    if age <= 0 {
        return Err(Error::InvalidAge { age });
    }
    Ok(())
}

/// Registers a new patient and returns the stored row.
///
/// Name and condition are trimmed. The registration timestamp is assigned
/// by the database.
pub async fn add_patient<C>(db: &C, name: &str, age: i32, condition: &str) -> Result<patient::Model>
where
    C: ConnectionTrait,
{
    validate_patient(name, age)?;

    let patient = patient::ActiveModel {
        name: Set(name.trim().to_string()),
        age: Set(age),
        condition: Set(Some(condition.trim().to_string())),
        ..Default::default()
    };

    let result = patient.insert(db).await?;
    info!("Registered patient {} ({})", result.name, result.id);
    Ok(result)
}

/// Retrieves all patients ordered alphabetically by name.
pub async fn list_patients(db: &DatabaseConnection) -> Result<Vec<patient::Model>> {
    Patient::find()
        .order_by_asc(patient::Column::Name)
        .order_by_asc(patient::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a patient by id.
pub async fn get_patient_by_id(
    db: &DatabaseConnection,
    patient_id: i64,
) -> Result<Option<patient::Model>> {
    Patient::find_by_id(patient_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Counts registered patients.
pub async fn count_patients(db: &DatabaseConnection) -> Result<u64> {
    Patient::find().count(db).await.map_err(Into::into)
}

/// Overwrites name, age and condition of an existing patient.
///
/// Applies the same validation as [`add_patient`]. Fails with
/// [`Error::PatientNotFound`] when no patient has this id, so callers can tell
/// a real update from a no-op.
pub async fn update_patient(
    db: &DatabaseConnection,
    patient_id: i64,
    name: &str,
    age: i32,
    condition: &str,
) -> Result<patient::Model> {
    validate_patient(name, age)?;

    let existing = Patient::find_by_id(patient_id)
        .one(db)
        .await?
        .ok_or(Error::PatientNotFound { id: patient_id })?;

    let mut active_model: patient::ActiveModel = existing.into();
    active_model.name = Set(name.trim().to_string());
    active_model.age = Set(age);
    active_model.condition = Set(Some(condition.trim().to_string()));

    let updated = active_model.update(db).await?;
    debug!("Updated patient {}", updated.id);
    Ok(updated)
}

/// Removes a patient and, via cascade, every medication order they own.
///
/// Returns the removed row.
pub async fn remove_patient(db: &DatabaseConnection, patient_id: i64) -> Result<patient::Model> {
    let existing = Patient::find_by_id(patient_id)
        .one(db)
        .await?
        .ok_or(Error::PatientNotFound { id: patient_id })?;

    let result = Patient::delete_by_id(patient_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::PatientNotFound { id: patient_id });
    }

    info!("Removed patient {} ({})", existing.name, existing.id);
    Ok(existing)
}
