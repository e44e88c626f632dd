//! Seed data loading from seed.toml
//!
//! The patients and medication orders defined here are inserted once, when the
//! schema is first created. Without a seed file the built-in example
//! residents are used.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Seed file used when `CARELOG_SEED_FILE` is not set
pub const DEFAULT_SEED_FILE: &str = "seed.toml";

/// Configuration structure representing the entire seed.toml file
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    /// Patients to create on first run
    #[serde(default)]
    pub patients: Vec<PatientSeed>,
}

/// A patient to seed, with the medication orders scheduled for them
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PatientSeed {
    /// Full name
    pub name: String,
    /// Age in years
    pub age: i32,
    /// Medical conditions and notes
    #[serde(default)]
    pub condition: String,
    /// Orders for this patient
    #[serde(default)]
    pub medications: Vec<MedicationSeed>,
}

/// A medication order to seed, dated relative to the day of initialization
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MedicationSeed {
    /// Medication name and strength
    pub medication: String,
    /// Time of day as `HH:MM`
    pub time: String,
    /// Days after the initialization date (0 = today)
    #[serde(default)]
    pub day_offset: i64,
    /// Administration notes
    #[serde(default)]
    pub notes: String,
}

impl SeedConfig {
    /// The example residents shipped with the application: two patients and
    /// three orders, all scheduled for the day of initialization.
    #[must_use]
    pub fn builtin() -> Self {
        let dose = |medication: &str, time: &str, notes: &str| MedicationSeed {
            medication: medication.to_string(),
            time: time.to_string(),
            day_offset: 0,
            notes: notes.to_string(),
        };

        Self {
            patients: vec![
                PatientSeed {
                    name: "Maria da Silva".to_string(),
                    age: 78,
                    condition: "Hipertensão, Diabetes".to_string(),
                    medications: vec![
                        dose("Captopril 25mg", "08:00", "Tomar antes do café"),
                        dose("Metformina 850mg", "12:00", "Tomar após almoço"),
                    ],
                },
                PatientSeed {
                    name: "João Oliveira".to_string(),
                    age: 82,
                    condition: "Demência moderada".to_string(),
                    medications: vec![dose("Donepezila 10mg", "09:00", "Com leite")],
                },
            ],
        }
    }

    /// Total number of medication orders across all seeded patients
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.patients.iter().map(|p| p.medications.len()).sum()
    }
}

/// Loads seed configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_seed_config<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read seed file {:?}: {e}", path.as_ref()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file {:?}: {e}", path.as_ref()),
    })
}

/// Loads the seed file if it exists, otherwise returns [`SeedConfig::builtin`].
///
/// A file that exists but does not parse is still an error.
pub fn load_seed_or_builtin<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let path = path.as_ref();
    if path.exists() {
        info!("Loading seed data from {:?}", path);
        load_seed_config(path)
    } else {
        debug!("No seed file at {:?}, using built-in seed data", path);
        Ok(SeedConfig::builtin())
    }
}

/// Seed file location from `CARELOG_SEED_FILE`, defaulting to `./seed.toml`
#[must_use]
pub fn seed_file_path() -> PathBuf {
    std::env::var("CARELOG_SEED_FILE")
        .map_or_else(|_| PathBuf::from(DEFAULT_SEED_FILE), PathBuf::from)
}
