//! Calendar entry entity - Per-day administration status of a medication order.
//!
//! Stored in `calendario_medicamentos`. The status column keeps the legacy
//! Portuguese values so existing rows decode.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Administration status of a dose on a given day
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DoseStatus {
    /// Not yet handled
    #[sea_orm(string_value = "pendente")]
    Pending,
    /// Dose was given
    #[sea_orm(string_value = "tomado")]
    Taken,
    /// Dose was refused or missed
    #[sea_orm(string_value = "nao_tomado")]
    NotTaken,
    /// Dose was moved to a later time
    #[sea_orm(string_value = "adiado")]
    Postponed,
}

/// Calendar entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "calendario_medicamentos")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the medication order this status refers to
    #[sea_orm(column_name = "medicamento_id")]
    pub order_id: i64,
    /// Day the status applies to
    #[sea_orm(column_name = "data")]
    pub date: Date,
    /// Recorded status
    pub status: DoseStatus,
    /// Optional notes about this dose
    #[sea_orm(column_name = "observacoes", column_type = "Text", nullable)]
    pub notes: Option<String>,
}

/// Defines relationships between `CalendarEntry` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one medication order
    #[sea_orm(
        belongs_to = "super::medication_order::Entity",
        from = "Column::OrderId",
        to = "super::medication_order::Column::Id",
        on_delete = "Cascade"
    )]
    MedicationOrder,
}

impl Related<super::medication_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicationOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
