//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities map the facility's tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod calendar_entry;
pub mod medication_order;
pub mod patient;

// Re-export specific types to avoid conflicts
pub use calendar_entry::{DoseStatus, Entity as CalendarEntry, Model as CalendarEntryModel};
pub use medication_order::{Entity as MedicationOrder, Model as MedicationOrderModel};
pub use patient::{Entity as Patient, Model as PatientModel};
