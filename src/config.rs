use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FlavorError, Result};

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "FLAVOR_FINDER_DATA_DIR";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data: DataConfig,
    pub matching: MatchConfig,
    /// One of error, warn, info, debug, trace.
    pub log_level: String,
}

/// Where the JSON tables live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
    pub flavor_file: String,
    pub ingredient_file: String,
    pub alias_file: String,
}

/// Cutoffs and result caps for the fuzzy stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Fuzzy flavor lookup.
    pub flavor_cutoff: f64,
    pub flavor_limit: usize,
    /// Fuzzy alias lookup. Stricter, since a wrong alias resolves silently.
    pub alias_cutoff: f64,
    /// "Did you mean" candidates for ingredients.
    pub suggestion_cutoff: f64,
    pub suggestion_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            matching: MatchConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            flavor_file: "flavor_to_ingredients.json".to_string(),
            ingredient_file: "ingredient_to_flavors.json".to_string(),
            alias_file: "ingredient_aliases.json".to_string(),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            flavor_cutoff: 0.5,
            flavor_limit: 5,
            alias_cutoff: 0.6,
            suggestion_cutoff: 0.5,
            suggestion_limit: 5,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, cutoff) in [
            ("flavor_cutoff", self.flavor_cutoff),
            ("alias_cutoff", self.alias_cutoff),
            ("suggestion_cutoff", self.suggestion_cutoff),
        ] {
            if !(0.0..=1.0).contains(&cutoff) {
                return Err(FlavorError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {cutoff}"
                )));
            }
        }
        if self.flavor_limit == 0 || self.suggestion_limit == 0 {
            return Err(FlavorError::InvalidConfig(
                "flavor_limit and suggestion_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/flavor-finder/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        let mut config = Self::load_from(&Self::config_path());
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
            config.data.data_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}; using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or `./data`).
    pub fn data_dir(&self) -> PathBuf {
        self.data
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn flavor_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.flavor_file)
    }

    pub fn ingredient_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.ingredient_file)
    }

    pub fn alias_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.alias_file)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("flavor-finder").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
