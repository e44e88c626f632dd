//! Report generation business logic.
//!
//! This module provides the numbers behind the reports view: patient totals,
//! doses scheduled and administered on a day, the adherence rate, and per-day
//! dose counts for a recent window. All functions return structured data that
//! a presentation layer can format or chart.

use crate::{
    core::{patient::count_patients, schedule::count_orders_for_date},
    entities::{MedicationOrder, medication_order},
    errors::{Error, Result},
};
use chrono::{Days, NaiveDate};
use sea_orm::{DatabaseConnection, PaginatorTrait, prelude::*};
use serde::Serialize;

/// Summary of one day of care.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    /// The day being reported on
    pub date: NaiveDate,
    /// Registered patients (all days)
    pub total_patients: u64,
    /// Doses scheduled on this day
    pub doses_scheduled: u64,
    /// Doses marked as administered on this day
    pub doses_administered: u64,
    /// Administered share of scheduled doses, 0-100
    pub adherence_percent: f64,
}

/// Number of doses scheduled on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayCount {
    /// The day
    pub date: NaiveDate,
    /// Doses scheduled on it
    pub count: u64,
}

/// Builds the report for `date`.
pub async fn daily_report(db: &DatabaseConnection, date: NaiveDate) -> Result<DailyReport> {
    let total_patients = count_patients(db).await?;
    let doses_scheduled = count_orders_for_date(db, date).await?;
    let doses_administered = MedicationOrder::find()
        .filter(medication_order::Column::ScheduledDate.eq(date))
        .filter(medication_order::Column::Administered.eq(true))
        .count(db)
        .await?;

    Ok(DailyReport {
        date,
        total_patients,
        doses_scheduled,
        doses_administered,
        adherence_percent: calculate_adherence(doses_administered, doses_scheduled),
    })
}

/// Percentage of scheduled doses that were administered.
///
/// Returns 0 when nothing is scheduled.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn calculate_adherence(administered: u64, scheduled: u64) -> f64 {
    if scheduled == 0 {
        return 0.0;
    }

    (administered as f64 / scheduled as f64) * 100.0
}

/// Dose counts for the `days` days ending at `end`, oldest first.
pub async fn recent_daily_counts(
    db: &DatabaseConnection,
    end: NaiveDate,
    days: u64,
) -> Result<Vec<DayCount>> {
    let mut counts = Vec::new();
    for offset in (0..days).rev() {
        let date = end
            .checked_sub_days(Days::new(offset))
            .ok_or_else(|| Error::InvalidDate {
                value: format!("{end} - {offset} days"),
            })?;
        counts.push(DayCount {
            date,
            count: count_orders_for_date(db, date).await?,
        });
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::medication::update_administered_status;
    use crate::test_utils::*;

    #[test]
    fn test_calculate_adherence() {
        assert_eq!(calculate_adherence(0, 0), 0.0);
        assert_eq!(calculate_adherence(0, 4), 0.0);
        assert_eq!(calculate_adherence(1, 4), 25.0);
        assert_eq!(calculate_adherence(3, 3), 100.0);
    }

    #[tokio::test]
    async fn test_daily_report() -> Result<()> {
        let (db, patient) = setup_with_patient().await?;
        create_test_patient(&db, "Bruno").await?;
        let day = date(2024, 8, 20);

        let a = create_test_order(&db, patient.id, "A", "08:00", day).await?;
        create_test_order(&db, patient.id, "B", "12:00", day).await?;
        create_test_order(&db, patient.id, "C", "08:00", date(2024, 8, 21)).await?;
        update_administered_status(&db, a.id, true).await?;

        let report = daily_report(&db, day).await?;
        assert_eq!(report.date, day);
        assert_eq!(report.total_patients, 2);
        assert_eq!(report.doses_scheduled, 2);
        assert_eq!(report.doses_administered, 1);
        assert_eq!(report.adherence_percent, 50.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_daily_report_empty_day() -> Result<()> {
        let db = setup_test_db().await?;

        let report = daily_report(&db, date(2024, 8, 20)).await?;
        assert_eq!(report.total_patients, 0);
        assert_eq!(report.doses_scheduled, 0);
        assert_eq!(report.adherence_percent, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_recent_daily_counts() -> Result<()> {
        let (db, patient) = setup_with_patient().await?;
        let end = date(2024, 3, 2);

        create_test_order(&db, patient.id, "A", "08:00", end).await?;
        create_test_order(&db, patient.id, "B", "09:00", end).await?;
        create_test_order(&db, patient.id, "C", "08:00", date(2024, 2, 25)).await?;
        create_test_order(&db, patient.id, "Too old", "08:00", date(2024, 2, 24)).await?;

        let counts = recent_daily_counts(&db, end, 7).await?;
        assert_eq!(counts.len(), 7);
        assert_eq!(
            counts[0],
            DayCount {
                date: date(2024, 2, 25),
                count: 1
            }
        );
        assert_eq!(
            counts[6],
            DayCount {
                date: end,
                count: 2
            }
        );
        assert_eq!(counts.iter().map(|c| c.count).sum::<u64>(), 3);

        Ok(())
    }
}
