//! Pest advisories and the sector infestation map.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

static DEFAULT_PESTS: Lazy<PestTable> = Lazy::new(build_default_pest_table);

/// Get a reference to the cached default pest table
pub fn get_default_pest_table() -> &'static PestTable {
    &DEFAULT_PESTS
}

fn advisory(
    name: &str,
    severity: Severity,
    sector: &str,
    days: u32,
    treatment: &str,
) -> PestAdvisory {
    PestAdvisory {
        name: name.into(),
        severity,
        affected_sector: sector.into(),
        days_since_detection: days,
        treatment: treatment.into(),
    }
}

fn sector(name: &str, level: Severity, latitude: f64, longitude: f64) -> SectorInfestation {
    SectorInfestation {
        sector: name.into(),
        level,
        latitude,
        longitude,
    }
}

/// Builds the default advisory table and sector map
pub fn build_default_pest_table() -> PestTable {
    PestTable {
        pests: vec![
            advisory(
                "Cupins",
                Severity::Medium,
                "Setor B",
                3,
                "Aplicação de Fipronil 0.3%",
            ),
            advisory(
                "Broca-do-eucalipto",
                Severity::High,
                "Setor A",
                1,
                "Controle biológico com Beauveria bassiana",
            ),
            advisory(
                "Formigas cortadeiras",
                Severity::Low,
                "Setor C",
                5,
                "Isca formicida a base de sulfluramida",
            ),
        ],
        sectors: vec![
            sector("A", Severity::High, -23.50044, -47.39791),
            sector("B", Severity::Medium, -23.50144, -47.39691),
            sector("C", Severity::Low, -23.49944, -47.39891),
            sector("D", Severity::None, -23.50244, -47.39591),
            sector("E", Severity::None, -23.49844, -47.39991),
        ],
    }
}

impl PestTable {
    /// Parse and validate a pest table from TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let table: PestTable = toml::from_str(contents)?;
        let errors = table.validate();
        if !errors.is_empty() {
            return Err(Error::CatalogValidation(errors.join("; ")));
        }
        Ok(table)
    }

    /// Check names are present and unique, returning every problem found
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let mut seen = HashSet::new();
        for pest in &self.pests {
            if pest.name.trim().is_empty() {
                errors.push("Pest has empty name".to_string());
            } else if !seen.insert(pest.name.as_str()) {
                errors.push(format!("Duplicate pest '{}'", pest.name));
            }
            if pest.affected_sector.trim().is_empty() {
                errors.push(format!("Pest '{}' has no affected sector", pest.name));
            }
        }

        let mut sectors = HashSet::new();
        for sector in &self.sectors {
            if sector.sector.trim().is_empty() {
                errors.push("Sector has empty name".to_string());
            } else if !sectors.insert(sector.sector.as_str()) {
                errors.push(format!("Duplicate sector '{}'", sector.sector));
            }
            if !sector.latitude.is_finite() || !sector.longitude.is_finite() {
                errors.push(format!("Sector '{}' position is not finite", sector.sector));
            }
        }

        errors
    }

    /// Load a pest table file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table = Self::from_toml_str(&contents)?;
        tracing::info!("Loaded {} pest advisories from {:?}", table.pests.len(), path);
        Ok(table)
    }

    /// Exact-name lookup
    pub fn lookup(&self, name: &str) -> Result<&PestAdvisory> {
        self.pests
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::not_found("Pest", name))
    }

    /// Advisories affecting a map sector
    ///
    /// Advisories name the sector as it is displayed ("Setor B"); the map
    /// uses the bare identifier ("B"). Both spellings are accepted.
    pub fn in_sector<'a>(
        &'a self,
        sector: &'a str,
    ) -> impl Iterator<Item = &'a PestAdvisory> + 'a {
        let id = sector.strip_prefix("Setor ").unwrap_or(sector).trim();
        self.pests.iter().filter(move |p| {
            let affected = p.affected_sector.as_str();
            affected.strip_prefix("Setor ").unwrap_or(affected).trim() == id
        })
    }
}

/// Confirmation for a treatment application
///
/// Applications are not persisted; the record only exists for display and
/// the log line.
#[derive(Clone, Debug, PartialEq)]
pub struct TreatmentApplication {
    pub pest: String,
    pub treatment: String,
    pub sector: String,
}

impl TreatmentApplication {
    pub fn message(&self) -> String {
        format!(
            "Aplicação de {} registrada para {} no {}",
            self.treatment, self.pest, self.sector
        )
    }
}

/// Record that the suggested treatment for `pest` was applied
pub fn register_treatment(table: &PestTable, pest: &str) -> Result<TreatmentApplication> {
    let advisory = table.lookup(pest)?;
    let application = TreatmentApplication {
        pest: advisory.name.clone(),
        treatment: advisory.treatment.clone(),
        sector: advisory.affected_sector.clone(),
    };
    tracing::info!(
        pest = %application.pest,
        sector = %application.sector,
        "Registered treatment: {}",
        application.treatment
    );
    Ok(application)
}
