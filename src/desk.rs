//! Presentation-facing facade.
//!
//! [`CareDesk`] is what a form or page layer talks to. It takes raw form
//! input (text dates and times included), calls into [`crate::core`], and
//! never hands an error back: failures are logged and turned into a neutral
//! value (`None`, `false`, an empty list or `0`). Input problems are logged at
//! `warn`, storage problems at `error`.

use crate::{
    core::{calendar, medication, patient, report, schedule},
    entities::{DoseStatus, calendar_entry, medication_order, patient as patient_entity},
    errors::Result,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{error, warn};

/// Shared state for every presentation-layer call: the database handle.
pub struct CareDesk {
    database: DatabaseConnection,
}

fn settle<T>(operation: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_validation() => {
            warn!("Rejected {}: {}", operation, e);
            None
        }
        Err(e) => {
            error!("Failed to {}: {}", operation, e);
            None
        }
    }
}

impl CareDesk {
    /// Creates a desk around an open (and initialized) connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Registers a patient. `None` if the input is invalid or the write fails.
    pub async fn add_patient(
        &self,
        name: &str,
        age: i32,
        condition: &str,
    ) -> Option<patient_entity::Model> {
        settle(
            "add patient",
            patient::add_patient(&self.database, name, age, condition).await,
        )
    }

    /// All patients by name; empty on failure.
    pub async fn list_patients(&self) -> Vec<patient_entity::Model> {
        let patients = patient::list_patients(&self.database).await;
        settle("list patients", patients).unwrap_or_default()
    }

    /// Looks up one patient; `None` if unknown or on failure.
    pub async fn get_patient(&self, patient_id: i64) -> Option<patient_entity::Model> {
        settle(
            "load patient",
            patient::get_patient_by_id(&self.database, patient_id).await,
        )
        .flatten()
    }

    /// Number of registered patients; `0` on failure.
    pub async fn count_patients(&self) -> u64 {
        let count = patient::count_patients(&self.database).await;
        settle("count patients", count).unwrap_or_default()
    }

    /// Overwrites a patient's details. `None` if invalid, unknown or failed.
    pub async fn update_patient(
        &self,
        patient_id: i64,
        name: &str,
        age: i32,
        condition: &str,
    ) -> Option<patient_entity::Model> {
        settle(
            "update patient",
            patient::update_patient(&self.database, patient_id, name, age, condition).await,
        )
    }

    /// Removes a patient and their orders. `false` if unknown or failed.
    pub async fn remove_patient(&self, patient_id: i64) -> bool {
        settle(
            "remove patient",
            patient::remove_patient(&self.database, patient_id).await,
        )
        .is_some()
    }

    async fn add_order_from_input(
        &self,
        patient_id: i64,
        medication_name: &str,
        time: &str,
        date: &str,
        notes: &str,
    ) -> Result<medication_order::Model> {
        let time = schedule::parse_time(time)?;
        let date = schedule::parse_date(date)?;
        medication::add_medication_order(
            &self.database,
            patient_id,
            medication_name,
            time,
            date,
            notes,
        )
        .await
    }

    /// Schedules a dose from form input (`HH:MM` time, `YYYY-MM-DD` date).
    pub async fn add_medication_order(
        &self,
        patient_id: i64,
        medication_name: &str,
        time: &str,
        date: &str,
        notes: &str,
    ) -> Option<medication_order::Model> {
        settle(
            "add medication order",
            self.add_order_from_input(patient_id, medication_name, time, date, notes)
                .await,
        )
    }

    /// Looks up one order; `None` if unknown or on failure.
    pub async fn get_order(&self, order_id: i64) -> Option<medication_order::Model> {
        settle(
            "load medication order",
            medication::get_order_by_id(&self.database, order_id).await,
        )
        .flatten()
    }

    /// Every order of a patient, by date then time; empty on failure.
    pub async fn list_orders_for_patient(&self, patient_id: i64) -> Vec<medication_order::Model> {
        settle(
            "list patient orders",
            medication::list_orders_for_patient(&self.database, patient_id).await,
        )
        .unwrap_or_default()
    }

    /// Sets the administered flag of an order.
    pub async fn update_administered_status(
        &self,
        order_id: i64,
        administered: bool,
    ) -> Option<medication_order::Model> {
        settle(
            "update administered status",
            medication::update_administered_status(&self.database, order_id, administered).await,
        )
    }

    async fn orders_from_input(&self, date: &str) -> Result<Vec<schedule::ScheduledDose>> {
        schedule::list_orders_for_date(&self.database, schedule::parse_date(date)?).await
    }

    /// Doses on a `YYYY-MM-DD` date; empty on bad input or failure.
    pub async fn list_orders_for_date(&self, date: &str) -> Vec<schedule::ScheduledDose> {
        settle("list orders", self.orders_from_input(date).await).unwrap_or_default()
    }

    /// Doses scheduled today; empty on failure.
    pub async fn list_orders_for_today(&self) -> Vec<schedule::ScheduledDose> {
        settle(
            "list today's orders",
            schedule::list_orders_for_today(&self.database).await,
        )
        .unwrap_or_default()
    }

    async fn count_from_input(&self, date: &str) -> Result<u64> {
        schedule::count_orders_for_date(&self.database, schedule::parse_date(date)?).await
    }

    /// Number of doses on a `YYYY-MM-DD` date; `0` on bad input or failure.
    pub async fn count_orders_for_date(&self, date: &str) -> u64 {
        settle("count orders", self.count_from_input(date).await).unwrap_or_default()
    }

    /// Month grid data; `None` for an invalid month or on failure.
    pub async fn month_schedule(&self, year: i32, month: u32) -> Option<schedule::MonthSchedule> {
        settle(
            "load month schedule",
            schedule::month_schedule(&self.database, year, month).await,
        )
    }

    /// Monday-first week rows of a month; empty for an invalid month.
    #[must_use]
    pub fn calendar_weeks(year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
        settle("lay out month", schedule::calendar_weeks(year, month)).unwrap_or_default()
    }

    async fn status_from_input(
        &self,
        order_id: i64,
        date: &str,
    ) -> Result<Option<calendar_entry::Model>> {
        let date = schedule::parse_date(date)?;
        calendar::dose_status_for(&self.database, order_id, date).await
    }

    /// Status recorded for an order on a `YYYY-MM-DD` date, if any.
    pub async fn dose_status_for(
        &self,
        order_id: i64,
        date: &str,
    ) -> Option<calendar_entry::Model> {
        let entry = self.status_from_input(order_id, date).await;
        settle("load dose status", entry).flatten()
    }

    /// Every status recorded for an order, oldest day first; empty on failure.
    pub async fn status_history(&self, order_id: i64) -> Vec<calendar_entry::Model> {
        settle(
            "load status history",
            calendar::status_history(&self.database, order_id).await,
        )
        .unwrap_or_default()
    }

    async fn record_status_from_input(
        &self,
        order_id: i64,
        date: &str,
        status: DoseStatus,
        notes: &str,
    ) -> Result<calendar_entry::Model> {
        let date = schedule::parse_date(date)?;
        calendar::record_dose_status(&self.database, order_id, date, status, notes).await
    }

    /// Records a per-day dose status from form input.
    pub async fn record_dose_status(
        &self,
        order_id: i64,
        date: &str,
        status: DoseStatus,
        notes: &str,
    ) -> Option<calendar_entry::Model> {
        settle(
            "record dose status",
            self.record_status_from_input(order_id, date, status, notes)
                .await,
        )
    }

    /// Today's report; `None` on failure.
    pub async fn report_for_today(&self) -> Option<report::DailyReport> {
        settle(
            "build report",
            report::daily_report(&self.database, schedule::today()).await,
        )
    }

    /// Dose counts for the last `days` days, oldest first; empty on failure.
    pub async fn recent_daily_counts(&self, days: u64) -> Vec<report::DayCount> {
        settle(
            "count recent orders",
            report::recent_daily_counts(&self.database, schedule::today(), days).await,
        )
        .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::database::connect;
    use crate::errors::Error;
    use crate::test_utils::setup_test_db;

    async fn desk() -> Result<CareDesk> {
        Ok(CareDesk::new(setup_test_db().await?))
    }

    #[tokio::test]
    async fn test_invalid_patient_input_is_neutral() -> Result<()> {
        let desk = desk().await?;

        assert!(desk.add_patient("  ", 80, "").await.is_none());
        assert!(desk.add_patient("Ana", 0, "").await.is_none());
        assert!(desk.list_patients().await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_ids_are_neutral() -> Result<()> {
        let desk = desk().await?;

        assert!(desk.update_patient(1, "Ana", 80, "").await.is_none());
        assert!(!desk.remove_patient(1).await);
        assert!(desk.update_administered_status(1, true).await.is_none());
        assert!(
            desk.record_dose_status(1, "2024-01-01", DoseStatus::Taken, "")
                .await
                .is_none()
        );
        assert!(
            desk.add_medication_order(1, "Aspirin", "08:00", "2024-01-01", "")
                .await
                .is_none()
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failures_are_neutral() -> Result<()> {
        // Connection with no tables: every query fails inside the database
        let desk = CareDesk::new(connect("sqlite::memory:").await?);
        assert!(matches!(
            patient::list_patients(&desk.database).await,
            Err(Error::Database(_))
        ));

        assert!(desk.list_patients().await.is_empty());
        assert!(desk.add_patient("Ana", 80, "Asthma").await.is_none());
        assert!(!desk.remove_patient(1).await);
        assert_eq!(desk.count_patients().await, 0);
        assert_eq!(desk.count_orders_for_date("2024-01-01").await, 0);
        assert!(desk.list_orders_for_date("2024-01-01").await.is_empty());
        assert!(desk.list_orders_for_today().await.is_empty());
        assert!(desk.month_schedule(2024, 1).await.is_none());
        assert!(desk.status_history(1).await.is_empty());
        assert!(desk.report_for_today().await.is_none());
        assert!(desk.recent_daily_counts(7).await.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_lookups_through_desk() -> Result<()> {
        let desk = desk().await?;
        let Some(ana) = desk.add_patient("Ana", 80, "Asthma").await else {
            panic!("patient should be created");
        };
        let Some(order) = desk
            .add_medication_order(ana.id, "Salbutamol", "08:00", "2024-04-01", "")
            .await
        else {
            panic!("order should be created");
        };

        assert_eq!(desk.get_patient(ana.id).await, Some(ana.clone()));
        assert!(desk.get_patient(ana.id + 1).await.is_none());
        assert_eq!(desk.count_patients().await, 1);
        assert_eq!(desk.get_order(order.id).await, Some(order.clone()));
        assert!(desk.get_order(order.id + 1).await.is_none());
        let orders = desk.list_orders_for_patient(ana.id).await;
        assert_eq!(orders, vec![order.clone()]);

        assert!(desk.dose_status_for(order.id, "2024-04-01").await.is_none());
        assert!(
            desk.record_dose_status(order.id, "2024-04-01", DoseStatus::NotTaken, "Refused")
                .await
                .is_some()
        );
        let recorded = desk.dose_status_for(order.id, "2024-04-01").await;
        assert!(recorded.is_some_and(|e| e.status == DoseStatus::NotTaken));
        assert!(desk.dose_status_for(order.id, "April 1").await.is_none());
        assert_eq!(desk.status_history(order.id).await.len(), 1);

        let weeks = CareDesk::calendar_weeks(2024, 4);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], NaiveDate::from_ymd_opt(2024, 4, 1));
        assert!(CareDesk::calendar_weeks(2024, 13).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_bad_dates_and_times_are_neutral() -> Result<()> {
        let desk = desk().await?;
        let Some(ana) = desk.add_patient("Ana", 80, "Asthma").await else {
            panic!("patient should be created");
        };

        assert!(
            desk.add_medication_order(ana.id, "Salbutamol", "8am", "2024-01-01", "")
                .await
                .is_none()
        );
        assert!(
            desk.add_medication_order(ana.id, "Salbutamol", "08:00", "01/01/2024", "")
                .await
                .is_none()
        );
        assert!(desk.list_orders_for_date("yesterday").await.is_empty());
        assert_eq!(desk.count_orders_for_date("2024-13-01").await, 0);
        assert!(desk.month_schedule(2024, 0).await.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_end_to_end_through_desk() -> Result<()> {
        let desk = desk().await?;
        let today = crate::core::schedule::format_date(crate::core::schedule::today());

        let Some(ana) = desk.add_patient("Ana", 80, "Asthma").await else {
            panic!("patient should be created");
        };
        let Some(order) = desk
            .add_medication_order(ana.id, "Salbutamol", "08:00", &today, "")
            .await
        else {
            panic!("order should be created");
        };

        let doses = desk.list_orders_for_today().await;
        assert_eq!(doses.len(), 1);
        assert_eq!(doses[0].patient_name, "Ana");
        assert_eq!(doses[0].order.medication, "Salbutamol");
        assert_eq!(doses[0].order.scheduled_time, "08:00");
        assert!(!doses[0].order.administered);
        assert_eq!(desk.count_orders_for_date(&today).await, 1);

        let updated = desk.update_administered_status(order.id, true).await;
        assert!(updated.is_some_and(|o| o.administered));
        assert!(desk.list_orders_for_date(&today).await[0].order.administered);

        let report = desk.report_for_today().await;
        assert!(report.is_some_and(|r| r.doses_administered == 1));
        assert_eq!(desk.recent_daily_counts(7).await.len(), 7);

        assert!(desk.remove_patient(ana.id).await);
        assert!(desk.list_orders_for_today().await.is_empty());

        Ok(())
    }
}
