//! Run settings: which dictionary to load and which flavors to resolve
//!
//! Settings are read from a small TOML file. Every key is optional; omitted
//! keys fall back to the built-in defaults (the calorimeter dictionary with
//! the G and J tower flavors, edge anchoring, lenient checks). Relative paths
//! are resolved against the directory of the settings file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::resolve::{AnchorMode, CatalogConfig, FlavorConfig};

/// Dictionary file used when none is configured
pub const DEFAULT_DICTIONARY: &str = "IdDictCalorimeter_DC3-05.xml";

/// Errors that can occur when loading or parsing settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Everything needed for one resolution run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Identifier dictionary XML file
    pub dictionary: PathBuf,
    /// Options shared by all flavors
    pub catalog: CatalogConfig,
    /// Flavors to resolve, in output order
    pub flavors: Vec<FlavorConfig>,
}

/// TOML structure for deserializing settings
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    dictionary: Option<PathBuf>,
    anchor: Option<AnchorMode>,
    strict: Option<bool>,
    #[serde(rename = "flavor")]
    flavors: Option<Vec<TomlFlavor>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFlavor {
    name: String,
    table: PathBuf,
    region_group: Option<String>,
    region_field: Option<String>,
    subregion: Option<String>,
    sampling: Option<String>,
    eta_field: Option<String>,
    phi_field: Option<String>,
}

impl TomlFlavor {
    fn into_config(self) -> FlavorConfig {
        let mut flavor = FlavorConfig::new(self.name, self.table);
        if let Some(group) = self.region_group {
            flavor = flavor.with_region_group(group);
        }
        if let Some(field) = self.region_field {
            flavor = flavor.with_region_field(field);
        }
        if let Some(subregion) = self.subregion {
            flavor = flavor.with_subregion(subregion);
        }
        if let Some(sampling) = self.sampling {
            flavor = flavor.with_sampling(sampling);
        }
        let eta = self.eta_field.unwrap_or_else(|| flavor.eta_field.clone());
        let phi = self.phi_field.unwrap_or_else(|| flavor.phi_field.clone());
        flavor.with_axis_fields(eta, phi)
    }
}

impl Settings {
    /// Load settings from a TOML file, resolving relative paths against
    /// the file's directory
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_str(&content)?;
        match path.parent() {
            Some(base) => Ok(settings.relative_to(base)),
            None => Ok(settings),
        }
    }

    /// Load settings from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let defaults = Self::default();

        let mut catalog = defaults.catalog;
        if let Some(anchor) = parsed.anchor {
            catalog = catalog.with_anchor(anchor);
        }
        if let Some(strict) = parsed.strict {
            catalog = catalog.with_strict(strict);
        }

        let flavors = match parsed.flavors {
            Some(flavors) => flavors.into_iter().map(TomlFlavor::into_config).collect(),
            None => defaults.flavors,
        };

        Self {
            dictionary: parsed.dictionary.unwrap_or(defaults.dictionary),
            catalog,
            flavors,
        }
        .validated()
    }

    /// Replace the flavor list
    pub fn with_flavors(mut self, flavors: Vec<FlavorConfig>) -> Result<Self, ConfigError> {
        self.flavors = flavors;
        self.validated()
    }

    /// Set the dictionary path
    pub fn with_dictionary(mut self, path: impl Into<PathBuf>) -> Self {
        self.dictionary = path.into();
        self
    }

    /// Set the catalog options
    pub fn with_catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = catalog;
        self
    }

    /// Join relative dictionary and table paths onto `base`
    pub fn relative_to(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_relative() {
                base.join(p)
            } else {
                p.to_path_buf()
            }
        };
        self.dictionary = join(&self.dictionary);
        for flavor in &mut self.flavors {
            flavor.table = join(&flavor.table);
        }
        self
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for flavor in &self.flavors {
            if flavor.name.is_empty() {
                return Err(ConfigError::Invalid("flavor name is empty".to_string()));
            }
            if !seen.insert(flavor.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "flavor '{}' is configured more than once",
                    flavor.name
                )));
            }
        }
        Ok(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dictionary: PathBuf::from(DEFAULT_DICTIONARY),
            catalog: CatalogConfig::default(),
            flavors: vec![
                FlavorConfig::new("G", "gTowerInfo.txt"),
                FlavorConfig::new("J", "jTowerInfo.txt"),
            ],
        }
    }
}

/// Parse a `NAME=TABLE` flavor argument
pub fn parse_flavor_arg(arg: &str) -> Result<FlavorConfig, String> {
    match arg.split_once('=') {
        Some((name, table)) if !name.trim().is_empty() && !table.trim().is_empty() => {
            Ok(FlavorConfig::new(name.trim(), table.trim()))
        }
        _ => Err(format!("expected NAME=TABLE, got '{}'", arg)),
    }
}
