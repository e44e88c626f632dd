//! Unified error types for `CareLog`.
//!
//! Core operations return [`Result`]; the [`crate::desk`] facade turns these
//! errors into log lines and neutral values for the presentation layer.

use thiserror::Error;

/// Every failure the core layer can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage-level failure (constraint violation, I/O inside `SQLite`, ...)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure, e.g. while creating the data directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// Patient name was empty or whitespace-only
    #[error("Patient name cannot be empty")]
    EmptyPatientName,

    /// Patient age was zero or negative
    #[error("Invalid age: {age}. Age must be greater than zero")]
    InvalidAge {
        /// The rejected age
        age: i32,
    },

    /// Medication name was empty or whitespace-only
    #[error("Medication name cannot be empty")]
    EmptyMedicationName,

    /// No patient with this id
    #[error("Patient not found: {id}")]
    PatientNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// No medication order with this id
    #[error("Medication order not found: {id}")]
    OrderNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Date string was not `YYYY-MM-DD`
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input
        value: String,
    },

    /// Time string was not `HH:MM`
    #[error("Invalid time '{value}': expected HH:MM")]
    InvalidTime {
        /// The rejected input
        value: String,
    },
}

impl Error {
    /// True for input problems caught before any write was attempted.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyPatientName
                | Self::InvalidAge { .. }
                | Self::EmptyMedicationName
                | Self::InvalidDate { .. }
                | Self::InvalidTime { .. }
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
