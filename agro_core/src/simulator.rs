//! What-if readings built from user-adjusted pH and NPK values.

use crate::{Error, PartialReading, Result, SoilField, ToleranceRange};

/// Adjustable range for each simulated field
pub const SIMULATOR_BOUNDS: [(SoilField, ToleranceRange); 4] = [
    (SoilField::Ph, ToleranceRange::new(4.0, 8.0)),
    (SoilField::Nitrogen, ToleranceRange::new(5.0, 50.0)),
    (SoilField::Phosphorus, ToleranceRange::new(5.0, 40.0)),
    (SoilField::Potassium, ToleranceRange::new(50.0, 250.0)),
];

/// Build a pH/N/P/K reading, rejecting values outside the simulator's range
pub fn simulated_reading(
    ph: f64,
    nitrogen: f64,
    phosphorus: f64,
    potassium: f64,
) -> Result<PartialReading> {
    bounded_partial_reading([Some(ph), Some(nitrogen), Some(phosphorus), Some(potassium)])
}

/// Build a reading from whichever of pH/N/P/K were supplied
///
/// Values are given in `SIMULATOR_BOUNDS` order. Each supplied value must
/// lie in its range; omitted ones are left out of the reading, so the
/// matcher reports them if the catalog checks them.
pub fn bounded_partial_reading(values: [Option<f64>; 4]) -> Result<PartialReading> {
    let mut reading = PartialReading::new();

    for ((field, bounds), value) in SIMULATOR_BOUNDS.iter().zip(values) {
        let Some(value) = value else { continue };
        if !bounds.contains(value) {
            return Err(Error::InvalidInput(format!(
                "{} must be between {} and {}, got {}",
                field, bounds.min, bounds.max, value
            )));
        }
        reading.set(*field, value);
    }

    Ok(reading)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_default_catalog;
    use crate::matcher::recommend;
    use crate::SoilValues;

    #[test]
    fn test_simulated_reading_has_four_fields() {
        let reading = simulated_reading(6.2, 25.0, 15.0, 120.0).unwrap();
        assert_eq!(reading.values.len(), 4);
        assert_eq!(reading.value(SoilField::Nitrogen), Some(25.0));
        assert_eq!(reading.value(SoilField::Calcium), None);
    }

    #[test]
    fn test_simulated_reading_feeds_matcher() {
        let reading = simulated_reading(6.2, 25.0, 15.0, 120.0).unwrap();
        let recs = recommend(&reading, get_default_catalog()).unwrap();
        assert!(recs.iter().any(|r| r.species == "Eucalipto Grandis"));
    }

    #[test]
    fn test_bounds_inclusive() {
        assert!(simulated_reading(4.0, 5.0, 5.0, 50.0).is_ok());
        assert!(simulated_reading(8.0, 50.0, 40.0, 250.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = simulated_reading(8.5, 25.0, 15.0, 120.0).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("pH must be between 4 and 8"), "{}", err);

        assert!(simulated_reading(6.0, 25.0, 15.0, 300.0).is_err());
        assert!(simulated_reading(f64::NAN, 25.0, 15.0, 120.0).is_err());
    }

    #[test]
    fn test_partial_values_still_bounded() {
        let err = bounded_partial_reading([Some(12.0), None, None, None]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("pH must be between 4 and 8"), "{}", err);

        let err = bounded_partial_reading([None, None, Some(41.0), None]).unwrap_err();
        assert!(err.to_string().contains("Fósforo (ppm) must be between 5 and 40"), "{}", err);

        let reading = bounded_partial_reading([Some(6.0), None, None, Some(120.0)]).unwrap();
        assert_eq!(reading.values.len(), 2);
        assert_eq!(reading.value(SoilField::Ph), Some(6.0));
        assert_eq!(reading.value(SoilField::Nitrogen), None);
    }

    #[test]
    fn test_partial_reading_with_missing_field_reaches_matcher() {
        let reading = bounded_partial_reading([Some(6.2), Some(25.0), Some(15.0), None]).unwrap();
        let err = recommend(&reading, get_default_catalog()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
