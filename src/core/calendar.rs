//! Per-day dose status records.
//!
//! The administered flag on an order only says whether a dose was given.
//! Calendar entries record a richer status (pending, taken, not taken,
//! postponed) for a given order and day, one entry per (order, day).

use crate::{
    entities::{CalendarEntry, DoseStatus, MedicationOrder, calendar_entry},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::debug;

/// Finds the status entry of an order on a given day.
pub async fn dose_status_for(
    db: &DatabaseConnection,
    order_id: i64,
    date: NaiveDate,
) -> Result<Option<calendar_entry::Model>> {
    CalendarEntry::find()
        .filter(calendar_entry::Column::OrderId.eq(order_id))
        .filter(calendar_entry::Column::Date.eq(date))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Records the status of an order on a given day, replacing any earlier record.
///
/// Fails with [`Error::OrderNotFound`] if the order does not exist.
pub async fn record_dose_status(
    db: &DatabaseConnection,
    order_id: i64,
    date: NaiveDate,
    status: DoseStatus,
    notes: &str,
) -> Result<calendar_entry::Model> {
    MedicationOrder::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let notes = Some(notes.trim().to_string());
    let entry = if let Some(existing) = dose_status_for(db, order_id, date).await? {
        let mut active_model: calendar_entry::ActiveModel = existing.into();
        active_model.status = Set(status);
        active_model.notes = Set(notes);
        active_model.update(db).await?
    } else {
        calendar_entry::ActiveModel {
            order_id: Set(order_id),
            date: Set(date),
            status: Set(status),
            notes: Set(notes),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    debug!("Order {} on {}: {:?}", order_id, date, status);
    Ok(entry)
}

/// Lists every status record of an order, oldest day first.
pub async fn status_history(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<calendar_entry::Model>> {
    CalendarEntry::find()
        .filter(calendar_entry::Column::OrderId.eq(order_id))
        .order_by_asc(calendar_entry::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}
