//! Spreadsheet export of the reading history.
//!
//! One row per day, one column per field, with the field labels as headers.
//! The default container is an xlsx workbook with a single `Dados_solo`
//! sheet; CSV is kept for plain-text consumers.

use crate::{Error, Result, SoilField, SoilReading};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Worksheet holding the readings
pub const SHEET_NAME: &str = "Dados_solo";

const DATE_HEADER: &str = "Data";

/// Output container for an export
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Xlsx),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(Error::InvalidInput(format!(
                "Unknown export format: '{}'. Valid options: xlsx, csv",
                other
            ))),
        }
    }
}

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    #[serde(rename = "Data")]
    date: String,
    #[serde(rename = "pH")]
    ph: f64,
    #[serde(rename = "Nitrogênio (ppm)")]
    nitrogen: f64,
    #[serde(rename = "Fósforo (ppm)")]
    phosphorus: f64,
    #[serde(rename = "Potássio (ppm)")]
    potassium: f64,
    #[serde(rename = "Cálcio (cmolc/dm³)")]
    calcium: f64,
    #[serde(rename = "Magnésio (cmolc/dm³)")]
    magnesium: f64,
    #[serde(rename = "Matéria Orgânica (%)")]
    organic_matter: f64,
    #[serde(rename = "Umidade (%)")]
    humidity: f64,
    #[serde(rename = "Temperatura (°C)")]
    temperature: f64,
}

impl From<&SoilReading> for CsvRow {
    fn from(reading: &SoilReading) -> Self {
        CsvRow {
            date: format_date(reading),
            ph: reading.ph,
            nitrogen: reading.nitrogen,
            phosphorus: reading.phosphorus,
            potassium: reading.potassium,
            calcium: reading.calcium,
            magnesium: reading.magnesium,
            organic_matter: reading.organic_matter,
            humidity: reading.humidity,
            temperature: reading.temperature,
        }
    }
}

fn format_date(reading: &SoilReading) -> String {
    reading.date.format("%Y-%m-%d").to_string()
}

/// Write readings as CSV (with header row) to any writer
///
/// Returns the number of data rows written.
pub fn write_csv<W: Write>(readings: &[SoilReading], out: W) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(out);

    for reading in readings {
        writer.serialize(CsvRow::from(reading))?;
    }

    writer.flush()?;
    Ok(readings.len())
}

/// Build the `Dados_solo` workbook: header row, then one row per day
///
/// Dates are text cells; every measurement is a numeric cell.
pub fn build_workbook(readings: &[SoilReading]) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    worksheet.write_string(0, 0, DATE_HEADER)?;
    for (col, field) in (1u16..).zip(SoilField::ALL) {
        worksheet.write_string(0, col, field.label())?;
    }

    for (row, reading) in (1u32..).zip(readings) {
        worksheet.write_string(row, 0, format_date(reading))?;
        for (col, field) in (1u16..).zip(SoilField::ALL) {
            worksheet.write_number(row, col, reading.get(field))?;
        }
    }

    Ok(workbook)
}

/// Write readings as an xlsx workbook to any writer
///
/// Returns the number of data rows written.
pub fn write_xlsx<W: Write>(readings: &[SoilReading], mut out: W) -> Result<usize> {
    let mut workbook = build_workbook(readings)?;
    let bytes = workbook.save_to_buffer()?;
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(readings.len())
}

/// Write readings in `format` to any writer
pub fn write_readings<W: Write>(
    readings: &[SoilReading],
    format: ExportFormat,
    out: W,
) -> Result<usize> {
    match format {
        ExportFormat::Xlsx => write_xlsx(readings, out),
        ExportFormat::Csv => write_csv(readings, out),
    }
}

/// Export readings to a file, replacing any previous export
///
/// The parent directory is created if needed and the file is synced to disk
/// before returning.
pub fn export_readings(
    readings: &[SoilReading],
    path: &Path,
    format: ExportFormat,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let count = write_readings(readings, format, &mut file)?;
    file.sync_all()?;

    tracing::info!("Exported {} readings as {} to {:?}", count, format, path);

    Ok(count)
}
