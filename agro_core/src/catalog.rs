//! Default catalog of tree species and their soil tolerances.
//!
//! The catalog is configuration data: built once and shared, or loaded once
//! from a TOML file at startup. The matcher never embeds species literals.

use crate::types::*;
use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<SpeciesCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static SpeciesCatalog {
    &DEFAULT_CATALOG
}

fn npk_tolerances(ph: (f64, f64), n: (f64, f64), p: (f64, f64), k: (f64, f64)) -> Vec<Tolerance> {
    [
        (SoilField::Ph, ph),
        (SoilField::Nitrogen, n),
        (SoilField::Phosphorus, p),
        (SoilField::Potassium, k),
    ]
    .into_iter()
    .map(|(field, (min, max))| Tolerance {
        field,
        range: ToleranceRange::new(min, max),
    })
    .collect()
}

/// Builds the default species catalog
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference.
pub fn build_default_catalog() -> SpeciesCatalog {
    let species = vec![
        SpeciesProfile {
            name: "Eucalipto Grandis".into(),
            tolerances: npk_tolerances((5.5, 7.0), (20.0, 40.0), (10.0, 30.0), (80.0, 150.0)),
            productivity: "Alta".into(),
            cycle: "Curto (5-7 anos)".into(),
            uses: "Celulose, Madeira, Óleos Essenciais".into(),
            cultivation: Some(CultivationGuide {
                planting_density: "1.100 a 1.600 plantas/hectare".into(),
                spacing: "3x2m ou 3x3m".into(),
                fertilization: vec![
                    "Plantio: 300g de NPK 06-30-06 + 50g de FTE BR-12".into(),
                    "6 meses: 200g de NPK 20-05-20".into(),
                ],
                special_care: "Monitoramento constante de brocas e cupins".into(),
            }),
        },
        SpeciesProfile {
            name: "Pinus Taeda".into(),
            tolerances: npk_tolerances((5.0, 6.5), (15.0, 35.0), (8.0, 25.0), (70.0, 130.0)),
            productivity: "Média-Alta".into(),
            cycle: "Médio (10-15 anos)".into(),
            uses: "Madeira, Resina".into(),
            cultivation: Some(CultivationGuide {
                planting_density: "1.600 a 2.500 plantas/hectare".into(),
                spacing: "2.5x2.5m".into(),
                fertilization: vec![
                    "Plantio: 200g de NPK 10-30-10 + 50g de FTE BR-12".into(),
                    "12 meses: 300g de NPK 20-10-10".into(),
                ],
                special_care: "Controle de formigas cortadeiras".into(),
            }),
        },
        SpeciesProfile {
            name: "Teca".into(),
            tolerances: npk_tolerances((6.0, 7.5), (25.0, 45.0), (15.0, 35.0), (100.0, 180.0)),
            productivity: "Alta".into(),
            cycle: "Longo (20-25 anos)".into(),
            uses: "Madeira Nobre".into(),
            cultivation: None,
        },
        SpeciesProfile {
            name: "Mogno Africano".into(),
            tolerances: npk_tolerances((5.8, 7.2), (30.0, 50.0), (20.0, 40.0), (120.0, 200.0)),
            productivity: "Média".into(),
            cycle: "Longo (15-20 anos)".into(),
            uses: "Madeira de Luxo".into(),
            cultivation: None,
        },
    ];

    SpeciesCatalog { species }
}

impl SpeciesCatalog {
    /// Parse a catalog from TOML and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let catalog: SpeciesCatalog = toml::from_str(contents)?;
        catalog.validated()
    }

    /// Load a catalog file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_toml_str(&contents)?;
        tracing::info!(
            "Loaded {} species from {:?}",
            catalog.species.len(),
            path
        );
        Ok(catalog)
    }

    /// Look up a species by exact name
    pub fn get(&self, name: &str) -> Result<&SpeciesProfile> {
        self.species
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::not_found("Species", name))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Every field that at least one species checks
    pub fn checked_fields(&self) -> BTreeSet<SoilField> {
        self.species
            .iter()
            .flat_map(|s| s.tolerances.iter().map(|t| t.field))
            .collect()
    }

    /// Validate the catalog for consistency
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for profile in &self.species {
            if profile.name.trim().is_empty() {
                errors.push("Species has empty name".to_string());
            }
            if !seen.insert(profile.name.as_str()) {
                errors.push(format!("Duplicate species '{}'", profile.name));
            }
            if profile.tolerances.is_empty() {
                errors.push(format!("Species '{}' has no tolerances", profile.name));
            }

            let mut fields = HashSet::new();
            for tolerance in &profile.tolerances {
                let ToleranceRange { min, max } = tolerance.range;
                if !fields.insert(tolerance.field) {
                    errors.push(format!(
                        "Species '{}': {} tolerance defined twice",
                        profile.name, tolerance.field
                    ));
                }
                if !min.is_finite() || !max.is_finite() {
                    errors.push(format!(
                        "Species '{}': {} range is not finite",
                        profile.name, tolerance.field
                    ));
                } else if min > max {
                    errors.push(format!(
                        "Species '{}': {} min {} > max {}",
                        profile.name, tolerance.field, min, max
                    ));
                }
            }
        }

        errors
    }

    /// Consume the catalog, failing if validation reports anything
    pub fn validated(self) -> Result<Self> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(Error::CatalogValidation(errors.join("; ")))
        }
    }
}
