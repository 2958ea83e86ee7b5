//! File configuration and its merge with command-line flags.
//!
//! Precedence, highest first: command-line flag, config file, built-in
//! default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::JurisdictionId;
use thiserror::Error;

/// Config file read from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tax-calc.toml";

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown jurisdiction code '{0}' in config file")]
    UnknownJurisdiction(String),
}

/// Contents of a `tax-calc.toml` file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub jurisdiction: Option<String>,
    pub tables: Option<PathBuf>,
    pub tax_year: Option<i32>,
    pub monthly: Option<bool>,
    pub deduct_contributions: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn from_toml_str(
        contents: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Loads `explicit` if given, otherwise [`DEFAULT_CONFIG_FILE`] from
    /// `dir` if it exists, otherwise an empty config.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    pub fn discover(
        explicit: Option<&Path>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = dir.join(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(&default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Values given on the command line. `None` and `false` mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub jurisdiction: Option<JurisdictionId>,
    pub tables: Option<PathBuf>,
    pub tax_year: Option<i32>,
    pub monthly: bool,
    pub exclude_contributions: bool,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub jurisdiction: JurisdictionId,
    /// Bracket table CSV; the built-in tables are used when unset.
    pub tables: Option<PathBuf>,
    pub tax_year: Option<i32>,
    pub monthly: bool,
    pub deduct_contributions: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            jurisdiction: JurisdictionId::Ontario,
            tables: None,
            tax_year: None,
            monthly: false,
            deduct_contributions: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    pub fn resolve(
        file: FileConfig,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let file_jurisdiction = file
            .jurisdiction
            .map(|code| JurisdictionId::parse(&code).ok_or(ConfigError::UnknownJurisdiction(code)))
            .transpose()?;

        Ok(Self {
            jurisdiction: overrides
                .jurisdiction
                .or(file_jurisdiction)
                .unwrap_or(defaults.jurisdiction),
            tables: overrides.tables.or(file.tables),
            tax_year: overrides.tax_year.or(file.tax_year),
            monthly: overrides.monthly || file.monthly.unwrap_or(defaults.monthly),
            deduct_contributions: !overrides.exclude_contributions
                && file
                    .deduct_contributions
                    .unwrap_or(defaults.deduct_contributions),
            log_level: overrides
                .log_level
                .or(file.log_level)
                .unwrap_or(defaults.log_level),
            log_file: overrides.log_file.or(file.log_file),
        })
    }
}
