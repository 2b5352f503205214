//! Configuration file support for the soil monitor.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/agroflora/config.toml`.

use crate::export::ExportFormat;
use crate::generator::{FieldDistributions, MAX_WINDOW_DAYS};
use crate::pests::get_default_pest_table;
use crate::catalog::get_default_catalog;
use crate::{Error, PestTable, Result, SpeciesCatalog};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Synthetic reading parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    /// Fixed seed for a reproducible series
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub fields: FieldDistributions,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            seed: None,
            fields: FieldDistributions::default(),
        }
    }
}

/// Optional replacement tables
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    #[serde(default)]
    pub species_file: Option<PathBuf>,

    #[serde(default)]
    pub pests_file: Option<PathBuf>,
}

/// Spreadsheet export location
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_file_name")]
    pub file_name: String,

    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_name: default_file_name(),
            format: ExportFormat::default(),
        }
    }
}

impl ExportConfig {
    /// Output file, with the extension of the configured format
    pub fn path(&self) -> PathBuf {
        self.output_dir
            .join(&self.file_name)
            .with_extension(self.format.extension())
    }
}

// Default value functions
fn default_window_days() -> u32 {
    30
}

fn default_output_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("agroflora")
}

fn default_file_name() -> String {
    "Solo_export.xlsx".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            other => {
                tracing::info!("No config file found at {:?}, using defaults", other);
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("agroflora").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check generator settings
    pub fn validate(&self) -> Result<()> {
        if self.generator.window_days == 0 {
            return Err(Error::Config("generator.window_days must be at least 1".into()));
        }
        if self.generator.window_days > MAX_WINDOW_DAYS {
            return Err(Error::Config(format!(
                "generator.window_days must be at most {}, got {}",
                MAX_WINDOW_DAYS, self.generator.window_days
            )));
        }
        self.generator.fields.validate()?;
        if self.export.file_name.trim().is_empty() {
            return Err(Error::Config("export.file_name must not be empty".into()));
        }
        Ok(())
    }

    /// Species catalog: the configured file, or the built-in catalog
    pub fn species_catalog(&self) -> Result<Cow<'static, SpeciesCatalog>> {
        match &self.catalog.species_file {
            Some(path) => Ok(Cow::Owned(SpeciesCatalog::load_from(path)?)),
            None => Ok(Cow::Borrowed(get_default_catalog())),
        }
    }

    /// Pest table: the configured file, or the built-in table
    pub fn pest_table(&self) -> Result<Cow<'static, PestTable>> {
        match &self.catalog.pests_file {
            Some(path) => Ok(Cow::Owned(PestTable::load_from(path)?)),
            None => Ok(Cow::Borrowed(get_default_pest_table())),
        }
    }
}
