#![forbid(unsafe_code)]

//! Core domain model and business logic for the Agroflora soil monitor.
//!
//! This crate provides:
//! - Domain types (soil readings, species profiles, pest advisories)
//! - Synthetic reading generation
//! - Rule-based species recommendation
//! - Pest advisory lookup
//! - Spreadsheet export
//! - Configuration, logging and the illustrative access check

pub mod types;
pub mod error;
pub mod catalog;
pub mod pests;
pub mod config;
pub mod logging;
pub mod generator;
pub mod matcher;
pub mod simulator;
pub mod export;
pub mod auth;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use pests::{get_default_pest_table, register_treatment, TreatmentApplication};
pub use config::Config;
pub use generator::{
    current_reading, generate_readings, latest_change, FieldDistributions, MAX_WINDOW_DAYS,
};
pub use matcher::{matching_species, recommend, Recommendation};
pub use simulator::{bounded_partial_reading, simulated_reading};
pub use export::{export_readings, write_readings, ExportFormat};
pub use auth::{default_user_store, AuthenticatedUser, CredentialVerifier};
