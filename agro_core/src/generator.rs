//! Synthetic soil readings.
//!
//! Produces one reading per calendar day over a trailing window ending on a
//! given date, newest last. Values are mock data: each field is drawn
//! independently from a normal distribution and never clamped to a
//! physically valid range.

use crate::{Error, Result, SoilField, SoilReading};
use chrono::{Days, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// Mean and standard deviation for one field
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldDistribution {
    pub mean: f64,
    pub spread: f64,
}

impl FieldDistribution {
    pub const fn new(mean: f64, spread: f64) -> Self {
        Self { mean, spread }
    }

    fn normal(&self, field: SoilField) -> Result<Normal<f64>> {
        if !self.mean.is_finite() || !self.spread.is_finite() || self.spread < 0.0 {
            return Err(Error::Config(format!(
                "invalid distribution for {} (mean {}, spread {}): values must be finite and spread non-negative",
                field, self.mean, self.spread
            )));
        }
        Normal::new(self.mean, self.spread).map_err(|e| {
            Error::Config(format!(
                "invalid distribution for {} (mean {}, spread {}): {}",
                field, self.mean, self.spread, e
            ))
        })
    }
}

/// Per-field distributions for the generator
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldDistributions {
    #[serde(default = "default_ph")]
    pub ph: FieldDistribution,
    #[serde(default = "default_nitrogen")]
    pub nitrogen: FieldDistribution,
    #[serde(default = "default_phosphorus")]
    pub phosphorus: FieldDistribution,
    #[serde(default = "default_potassium")]
    pub potassium: FieldDistribution,
    #[serde(default = "default_calcium")]
    pub calcium: FieldDistribution,
    #[serde(default = "default_magnesium")]
    pub magnesium: FieldDistribution,
    #[serde(default = "default_organic_matter")]
    pub organic_matter: FieldDistribution,
    #[serde(default = "default_humidity")]
    pub humidity: FieldDistribution,
    #[serde(default = "default_temperature")]
    pub temperature: FieldDistribution,
}

impl Default for FieldDistributions {
    fn default() -> Self {
        Self {
            ph: default_ph(),
            nitrogen: default_nitrogen(),
            phosphorus: default_phosphorus(),
            potassium: default_potassium(),
            calcium: default_calcium(),
            magnesium: default_magnesium(),
            organic_matter: default_organic_matter(),
            humidity: default_humidity(),
            temperature: default_temperature(),
        }
    }
}

impl FieldDistributions {
    pub fn get(&self, field: SoilField) -> &FieldDistribution {
        match field {
            SoilField::Ph => &self.ph,
            SoilField::Nitrogen => &self.nitrogen,
            SoilField::Phosphorus => &self.phosphorus,
            SoilField::Potassium => &self.potassium,
            SoilField::Calcium => &self.calcium,
            SoilField::Magnesium => &self.magnesium,
            SoilField::OrganicMatter => &self.organic_matter,
            SoilField::Humidity => &self.humidity,
            SoilField::Temperature => &self.temperature,
        }
    }

    /// Check every spread is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for field in SoilField::ALL {
            self.get(field).normal(field)?;
        }
        Ok(())
    }
}

fn default_ph() -> FieldDistribution {
    FieldDistribution::new(6.2, 0.3)
}

fn default_nitrogen() -> FieldDistribution {
    FieldDistribution::new(25.0, 5.0)
}

fn default_phosphorus() -> FieldDistribution {
    FieldDistribution::new(15.0, 3.0)
}

fn default_potassium() -> FieldDistribution {
    FieldDistribution::new(120.0, 20.0)
}

fn default_calcium() -> FieldDistribution {
    FieldDistribution::new(3.5, 0.5)
}

fn default_magnesium() -> FieldDistribution {
    FieldDistribution::new(1.2, 0.2)
}

fn default_organic_matter() -> FieldDistribution {
    FieldDistribution::new(3.8, 0.4)
}

fn default_humidity() -> FieldDistribution {
    FieldDistribution::new(65.0, 8.0)
}

fn default_temperature() -> FieldDistribution {
    FieldDistribution::new(22.0, 2.0)
}

/// Longest window the generator accepts (about a century of daily readings)
pub const MAX_WINDOW_DAYS: u32 = 36_500;

/// Generate `window_days` readings for the days ending on `end_date`
///
/// Dates are strictly increasing, one day apart, and the last reading is
/// dated `end_date`. A window of zero days yields an empty series. Windows
/// above [`MAX_WINDOW_DAYS`], or starting before the calendar range, are
/// [`Error::InvalidInput`].
pub fn generate_readings<R>(
    window_days: u32,
    end_date: NaiveDate,
    distributions: &FieldDistributions,
    rng: &mut R,
) -> Result<Vec<SoilReading>>
where
    R: Rng + ?Sized,
{
    if window_days > MAX_WINDOW_DAYS {
        return Err(Error::InvalidInput(format!(
            "window of {} days exceeds the maximum of {}",
            window_days, MAX_WINDOW_DAYS
        )));
    }
    let start_date = match window_days.checked_sub(1) {
        Some(span) => end_date
            .checked_sub_days(Days::new(u64::from(span)))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "{} days before {} is out of the calendar range",
                    span, end_date
                ))
            })?,
        None => end_date,
    };

    let ph = distributions.ph.normal(SoilField::Ph)?;
    let nitrogen = distributions.nitrogen.normal(SoilField::Nitrogen)?;
    let phosphorus = distributions.phosphorus.normal(SoilField::Phosphorus)?;
    let potassium = distributions.potassium.normal(SoilField::Potassium)?;
    let calcium = distributions.calcium.normal(SoilField::Calcium)?;
    let magnesium = distributions.magnesium.normal(SoilField::Magnesium)?;
    let organic_matter = distributions.organic_matter.normal(SoilField::OrganicMatter)?;
    let humidity = distributions.humidity.normal(SoilField::Humidity)?;
    let temperature = distributions.temperature.normal(SoilField::Temperature)?;

    let mut readings = Vec::with_capacity(window_days as usize);
    for date in start_date.iter_days().take(window_days as usize) {
        readings.push(SoilReading {
            date,
            ph: ph.sample(rng),
            nitrogen: nitrogen.sample(rng),
            phosphorus: phosphorus.sample(rng),
            potassium: potassium.sample(rng),
            calcium: calcium.sample(rng),
            magnesium: magnesium.sample(rng),
            organic_matter: organic_matter.sample(rng),
            humidity: humidity.sample(rng),
            temperature: temperature.sample(rng),
        });
    }

    tracing::debug!(
        "Generated {} readings ending {}",
        readings.len(),
        end_date
    );

    Ok(readings)
}

/// The reading the dashboard treats as current (the newest one)
pub fn current_reading(readings: &[SoilReading]) -> Option<&SoilReading> {
    readings.last()
}

/// Change of `field` between the previous and the current reading
///
/// Returns None when fewer than two readings exist.
pub fn latest_change(readings: &[SoilReading], field: SoilField) -> Option<f64> {
    match readings {
        [.., previous, current] => Some(current.get(field) - previous.get(field)),
        _ => None,
    }
}
