//! Core domain types for the soil monitor.
//!
//! This module defines the fundamental types used throughout the system:
//! - Soil fields and readings (full and partial)
//! - Species tolerance profiles and the species catalog
//! - Pest advisories and the sector infestation map
//! - Access levels for the credential table

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Soil Fields
// ============================================================================

/// One of the nine measured soil parameters
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SoilField {
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
    Calcium,
    Magnesium,
    OrganicMatter,
    Humidity,
    Temperature,
}

impl SoilField {
    /// All fields in display/column order
    pub const ALL: [SoilField; 9] = [
        SoilField::Ph,
        SoilField::Nitrogen,
        SoilField::Phosphorus,
        SoilField::Potassium,
        SoilField::Calcium,
        SoilField::Magnesium,
        SoilField::OrganicMatter,
        SoilField::Humidity,
        SoilField::Temperature,
    ];

    /// Column label, including the unit
    pub fn label(self) -> &'static str {
        match self {
            SoilField::Ph => "pH",
            SoilField::Nitrogen => "Nitrogênio (ppm)",
            SoilField::Phosphorus => "Fósforo (ppm)",
            SoilField::Potassium => "Potássio (ppm)",
            SoilField::Calcium => "Cálcio (cmolc/dm³)",
            SoilField::Magnesium => "Magnésio (cmolc/dm³)",
            SoilField::OrganicMatter => "Matéria Orgânica (%)",
            SoilField::Humidity => "Umidade (%)",
            SoilField::Temperature => "Temperatura (°C)",
        }
    }
}

impl fmt::Display for SoilField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ============================================================================
// Readings
// ============================================================================

/// Anything that can supply soil values to the matcher
pub trait SoilValues {
    /// Value for `field`, or None if this reading does not carry it
    fn value(&self, field: SoilField) -> Option<f64>;
}

/// A full daily soil reading
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SoilReading {
    pub date: NaiveDate,
    pub ph: f64,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub calcium: f64,
    pub magnesium: f64,
    pub organic_matter: f64,
    pub humidity: f64,
    pub temperature: f64,
}

impl SoilReading {
    /// Value of a field; every field is always present on a full reading
    pub fn get(&self, field: SoilField) -> f64 {
        match field {
            SoilField::Ph => self.ph,
            SoilField::Nitrogen => self.nitrogen,
            SoilField::Phosphorus => self.phosphorus,
            SoilField::Potassium => self.potassium,
            SoilField::Calcium => self.calcium,
            SoilField::Magnesium => self.magnesium,
            SoilField::OrganicMatter => self.organic_matter,
            SoilField::Humidity => self.humidity,
            SoilField::Temperature => self.temperature,
        }
    }

    /// Share left after organic matter and moisture, in percent
    pub fn other_components_pct(&self) -> f64 {
        100.0 - self.organic_matter - self.humidity
    }
}

impl SoilValues for SoilReading {
    fn value(&self, field: SoilField) -> Option<f64> {
        Some(self.get(field))
    }
}

/// A reading carrying only some fields (e.g. a simulated what-if reading)
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PartialReading {
    pub values: BTreeMap<SoilField, f64>,
}

impl PartialReading {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, field: SoilField, value: f64) -> Self {
        self.values.insert(field, value);
        self
    }

    pub fn set(&mut self, field: SoilField, value: f64) {
        self.values.insert(field, value);
    }

    pub fn remove(&mut self, field: SoilField) -> Option<f64> {
        self.values.remove(&field)
    }
}

impl SoilValues for PartialReading {
    fn value(&self, field: SoilField) -> Option<f64> {
        self.values.get(&field).copied()
    }
}

impl From<&SoilReading> for PartialReading {
    fn from(reading: &SoilReading) -> Self {
        let values = SoilField::ALL
            .iter()
            .map(|&field| (field, reading.get(field)))
            .collect();
        PartialReading { values }
    }
}

// ============================================================================
// Species Catalog Types
// ============================================================================

/// Inclusive tolerance range
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToleranceRange {
    pub min: f64,
    pub max: f64,
}

impl ToleranceRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `min <= value <= max`
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Tolerance of a species for one soil field
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tolerance {
    pub field: SoilField,
    pub range: ToleranceRange,
}

/// Planting notes for a species
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CultivationGuide {
    pub planting_density: String,
    pub spacing: String,
    pub fertilization: Vec<String>,
    pub special_care: String,
}

/// A tree species and the soil it tolerates
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SpeciesProfile {
    pub name: String,
    pub tolerances: Vec<Tolerance>,
    pub productivity: String,
    pub cycle: String,
    pub uses: String,
    #[serde(default)]
    pub cultivation: Option<CultivationGuide>,
}

impl SpeciesProfile {
    /// Tolerance range for a field, if this species defines one
    pub fn tolerance(&self, field: SoilField) -> Option<&ToleranceRange> {
        self.tolerances
            .iter()
            .find(|t| t.field == field)
            .map(|t| &t.range)
    }
}

/// Ordered catalog of species profiles
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct SpeciesCatalog {
    pub species: Vec<SpeciesProfile>,
}

// ============================================================================
// Pest Types
// ============================================================================

/// Severity / infestation level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::None => "Nenhuma",
            Severity::Low => "Baixa",
            Severity::Medium => "Média",
            Severity::High => "Alta",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Advisory for a detected pest
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PestAdvisory {
    pub name: String,
    pub severity: Severity,
    pub affected_sector: String,
    pub days_since_detection: u32,
    pub treatment: String,
}

/// Infestation level of one field sector, with its map position
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SectorInfestation {
    pub sector: String,
    pub level: Severity,
    pub latitude: f64,
    pub longitude: f64,
}

/// Pest advisories plus the sector map
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PestTable {
    pub pests: Vec<PestAdvisory>,
    #[serde(default)]
    pub sectors: Vec<SectorInfestation>,
}

// ============================================================================
// Access
// ============================================================================

/// Dashboard access level
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Full,
    Limited,
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Full => f.pad("full"),
            AccessLevel::Limited => f.pad("limited"),
        }
    }
}
