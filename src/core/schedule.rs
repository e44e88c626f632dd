//! Date-scoped medication queries.
//!
//! Answers "which doses are scheduled on day D" for the daily view and the
//! month grid. Dates and times are `chrono` values inside the crate; the
//! `YYYY-MM-DD` / `HH:MM` text forms only appear at the boundary helpers
//! below and in the storage layer.

use crate::{
    entities::{MedicationOrder, Patient, PatientModel, medication_order},
    errors::{Error, Result},
};
use chrono::{Datelike, Local, Months, NaiveDate, NaiveTime};
use sea_orm::{PaginatorTrait, QueryOrder, prelude::*};
use serde::Serialize;

/// Storage format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Storage format for times of day
pub const TIME_FORMAT: &str = "%H:%M";

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Parses a 24-hour `HH:MM` time.
pub fn parse_time(value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|_| Error::InvalidTime {
        value: value.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats a time as `HH:MM`, dropping seconds.
#[must_use]
pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// The current local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A medication order together with the name of the patient it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledDose {
    /// The order row
    pub order: medication_order::Model,
    /// Name of the owning patient
    pub patient_name: String,
}

impl ScheduledDose {
    fn from_row((order, patient): (medication_order::Model, Option<PatientModel>)) -> Self {
        Self {
            patient_name: patient.map(|p| p.name).unwrap_or_default(),
            order,
        }
    }
}

/// Lists every dose scheduled on `date`, earliest time first.
///
/// Each dose carries its patient's name so a daily view can render it
/// without a second lookup.
pub async fn list_orders_for_date(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<ScheduledDose>> {
    let rows = MedicationOrder::find()
        .find_also_related(Patient)
        .filter(medication_order::Column::ScheduledDate.eq(date))
        .order_by_asc(medication_order::Column::ScheduledTime)
        .order_by_asc(medication_order::Column::Id)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(ScheduledDose::from_row).collect())
}

/// Lists the doses scheduled for the current local date.
pub async fn list_orders_for_today(db: &DatabaseConnection) -> Result<Vec<ScheduledDose>> {
    list_orders_for_date(db, today()).await
}

/// Counts the doses scheduled on `date`.
pub async fn count_orders_for_date(db: &DatabaseConnection, date: NaiveDate) -> Result<u64> {
    MedicationOrder::find()
        .filter(medication_order::Column::ScheduledDate.eq(date))
        .count(db)
        .await
        .map_err(Into::into)
}

/// All doses of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    /// The day
    pub date: NaiveDate,
    /// Doses on that day, earliest time first
    pub doses: Vec<ScheduledDose>,
}

impl DaySchedule {
    /// Number of doses on this day
    #[must_use]
    pub fn count(&self) -> usize {
        self.doses.len()
    }

    /// Whether the month grid should mark this day as having medication
    #[must_use]
    pub fn has_medication(&self) -> bool {
        !self.doses.is_empty()
    }
}

/// One bucket per day of a calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSchedule {
    /// Calendar year
    pub year: i32,
    /// Month number, 1-12
    pub month: u32,
    /// Every day of the month in order, including days with no doses
    pub days: Vec<DaySchedule>,
}

impl MonthSchedule {
    /// Looks up the bucket for `date`, if it falls in this month.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Total doses scheduled in the month
    #[must_use]
    pub fn total_doses(&self) -> usize {
        self.days.iter().map(DaySchedule::count).sum()
    }
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let invalid = || Error::InvalidDate {
        value: format!("{year}-{month:02}"),
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

/// Loads a whole month of doses with a single range query and buckets them by day.
///
/// This replaces one count query per grid cell plus one list query per
/// populated cell.
pub async fn month_schedule(
    db: &DatabaseConnection,
    year: i32,
    month: u32,
) -> Result<MonthSchedule> {
    let (first, last) = month_bounds(year, month)?;

    let mut doses: Vec<ScheduledDose> = MedicationOrder::find()
        .find_also_related(Patient)
        .filter(medication_order::Column::ScheduledDate.between(first, last))
        .order_by_asc(medication_order::Column::ScheduledDate)
        .order_by_asc(medication_order::Column::ScheduledTime)
        .order_by_asc(medication_order::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(ScheduledDose::from_row)
        .collect();

    let days = first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(|date| {
            let split = doses
                .iter()
                .position(|dose| dose.order.scheduled_date != date)
                .unwrap_or(doses.len());
            let rest = doses.split_off(split);
            DaySchedule {
                date,
                doses: std::mem::replace(&mut doses, rest),
            }
        })
        .collect();

    Ok(MonthSchedule { year, month, days })
}

/// Lays out a month as Monday-first weeks for a calendar grid.
///
/// Cells before the first and after the last day of the month are `None`.
pub fn calendar_weeks(year: i32, month: u32) -> Result<Vec<[Option<NaiveDate>; 7]>> {
    let (first, last) = month_bounds(year, month)?;
    let lead = first.weekday().num_days_from_monday() as usize;

    let mut cells: Vec<Option<NaiveDate>> = vec![None; lead];
    cells.extend(first.iter_days().take_while(|date| *date <= last).map(Some));
    cells.resize(cells.len().div_ceil(7) * 7, None);

    Ok(cells
        .chunks(7)
        .map(|chunk| {
            let mut week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect())
}
