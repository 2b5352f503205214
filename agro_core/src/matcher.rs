//! Rule-based species recommendation.
//!
//! A species is recommended for a reading iff every tolerance range it
//! defines contains the reading's value for that field (inclusive bounds).
//! There is no weighting and no partial credit.

use crate::{CultivationGuide, Error, Result, SoilValues, SpeciesCatalog, SpeciesProfile};
use serde::Serialize;

/// A species that suits the given soil, with what the shell displays
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Recommendation<'a> {
    pub species: &'a str,
    pub productivity: &'a str,
    pub cycle: &'a str,
    pub uses: &'a str,
    pub cultivation: Option<&'a CultivationGuide>,
}

impl<'a> From<&'a SpeciesProfile> for Recommendation<'a> {
    fn from(profile: &'a SpeciesProfile) -> Self {
        Recommendation {
            species: &profile.name,
            productivity: &profile.productivity,
            cycle: &profile.cycle,
            uses: &profile.uses,
            cultivation: profile.cultivation.as_ref(),
        }
    }
}

/// Species from `catalog` whose tolerances all contain the reading's values
///
/// Catalog order is preserved. Every field the catalog checks must be present
/// and finite in `reading`, otherwise the call fails with
/// [`Error::InvalidInput`] before any species is compared.
pub fn matching_species<'a, S>(
    reading: &S,
    catalog: &'a SpeciesCatalog,
) -> Result<Vec<&'a SpeciesProfile>>
where
    S: SoilValues + ?Sized,
{
    for field in catalog.checked_fields() {
        match reading.value(field) {
            None => {
                return Err(Error::InvalidInput(format!(
                    "reading has no value for {}",
                    field
                )))
            }
            Some(value) if !value.is_finite() => {
                return Err(Error::InvalidInput(format!(
                    "{} is not a finite number ({})",
                    field, value
                )))
            }
            Some(_) => {}
        }
    }

    let matches: Vec<_> = catalog
        .species
        .iter()
        .filter(|profile| {
            profile.tolerances.iter().all(|t| {
                reading
                    .value(t.field)
                    .is_some_and(|value| t.range.contains(value))
            })
        })
        .collect();

    tracing::debug!(
        "{} of {} species match the reading",
        matches.len(),
        catalog.len()
    );

    Ok(matches)
}

/// Recommendation cards for a reading
pub fn recommend<'a, S>(reading: &S, catalog: &'a SpeciesCatalog) -> Result<Vec<Recommendation<'a>>>
where
    S: SoilValues + ?Sized,
{
    let matches = matching_species(reading, catalog)?;
    Ok(matches.into_iter().map(Recommendation::from).collect())
}
