//! Medication order entity - A scheduled dose of a medication for one patient.
//!
//! Each order has a patient, a medication name, a time of day (`HH:MM`), a
//! calendar date (`YYYY-MM-DD`) and an administered flag. Orders are removed
//! together with their patient through the `ON DELETE CASCADE` foreign key.

use chrono::NaiveTime;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Medication order database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "medicamentos")]
pub struct Model {
    /// Unique identifier, assigned by the database
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the patient this dose belongs to
    #[sea_orm(column_name = "paciente_id")]
    pub patient_id: i64,
    /// Medication name and strength (e.g., "Captopril 25mg")
    #[sea_orm(column_name = "medicamento", column_type = "Text")]
    pub medication: String,
    /// Scheduled time of day, stored as `HH:MM`
    #[sea_orm(column_name = "horario", column_type = "Text")]
    pub scheduled_time: String,
    /// Scheduled calendar date, stored as `YYYY-MM-DD`
    #[sea_orm(column_name = "data")]
    pub scheduled_date: Date,
    /// Whether the dose was given
    #[sea_orm(column_name = "tomou")]
    pub administered: bool,
    /// Free-text administration notes (e.g., "Take before breakfast")
    #[sea_orm(column_name = "observacoes", column_type = "Text", nullable)]
    pub notes: Option<String>,
}

impl Model {
    /// Parses the stored `HH:MM` time, returning `None` for malformed legacy rows.
    #[must_use]
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.scheduled_time, "%H:%M").ok()
    }
}

/// Defines relationships between `MedicationOrder` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each order belongs to one patient
    #[sea_orm(
        belongs_to = "super::patient::Entity",
        from = "Column::PatientId",
        to = "super::patient::Column::Id",
        on_delete = "Cascade"
    )]
    Patient,
    /// One order has many per-day status entries
    #[sea_orm(has_many = "super::calendar_entry::Entity")]
    CalendarEntries,
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patient.def()
    }
}

impl Related<super::calendar_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CalendarEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
