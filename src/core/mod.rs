//! Core business logic - framework-agnostic patient, medication, schedule and
//! report operations. Every function takes the database handle explicitly and
//! returns a [`crate::errors::Result`].

/// Per-day dose status records
pub mod calendar;
/// Scheduling doses and toggling the administered flag
pub mod medication;
/// Patient registration and maintenance
pub mod patient;
/// Daily summaries and recent dose counts
pub mod report;
/// Date-scoped dose queries and calendar layout
pub mod schedule;
/// Schema creation and first-run seeding
pub mod setup;
