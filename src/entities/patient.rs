//! Patient entity - A cared-for resident of the facility.
//!
//! Mapped onto the `pacientes` table so databases created by earlier versions
//! of the application open unchanged.

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::Expr;
use serde::{Deserialize, Serialize};

/// Patient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pacientes")]
pub struct Model {
    /// Unique identifier, assigned by the database
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name, never empty
    #[sea_orm(column_name = "nome", column_type = "Text")]
    pub name: String,
    /// Age in years, always positive
    #[sea_orm(column_name = "idade")]
    pub age: i32,
    /// Free-text medical conditions and notes
    #[sea_orm(column_name = "condicao", column_type = "Text", nullable)]
    pub condition: Option<String>,
    /// When the patient was registered (UTC), set once on insert
    #[sea_orm(
        column_name = "data_cadastro",
        default_expr = "Expr::current_timestamp()"
    )]
    pub registered_at: DateTime,
}

/// Defines relationships between Patient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One patient has many medication orders
    #[sea_orm(has_many = "super::medication_order::Entity")]
    MedicationOrders,
}

impl Related<super::medication_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MedicationOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
