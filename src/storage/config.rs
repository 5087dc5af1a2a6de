//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. A missing
//! file yields defaults.

use crate::progression::advisor::DEFAULT_HISTORY_LIMIT;
use crate::progression::e1rm::E1rmFormula;
use crate::workouts::types::ExerciseCategory;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Unit system preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Kilograms
    #[default]
    Metric,
    /// Pounds
    Imperial,
}

impl Units {
    /// Symbol appended to weights in messages.
    pub fn weight_symbol(&self) -> &'static str {
        match self {
            Units::Metric => "kg",
            Units::Imperial => "lbs",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Units::Metric => write!(f, "Metric"),
            Units::Imperial => write!(f, "Imperial"),
        }
    }
}

/// Load increment per exercise category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorySteps {
    pub compound: f64,
    pub accessory: f64,
    pub isolation: f64,
}

impl Default for CategorySteps {
    fn default() -> Self {
        Self {
            compound: ExerciseCategory::Compound.default_step(),
            accessory: ExerciseCategory::Accessory.default_step(),
            isolation: ExerciseCategory::Isolation.default_step(),
        }
    }
}

impl CategorySteps {
    /// Step for a category.
    pub fn step_for(&self, category: ExerciseCategory) -> f64 {
        match category {
            ExerciseCategory::Compound => self.compound,
            ExerciseCategory::Accessory => self.accessory,
            ExerciseCategory::Isolation => self.isolation,
        }
    }
}

/// Progression engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionSettings {
    /// e1RM formula
    pub formula: E1rmFormula,
    /// Weight unit used in advice messages
    pub units: Units,
    /// Sessions considered for trend analysis
    pub history_limit: usize,
    /// Load increments per category
    pub steps: CategorySteps,
}

impl Default for ProgressionSettings {
    fn default() -> Self {
        Self {
            formula: E1rmFormula::default(),
            units: Units::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            steps: CategorySteps::default(),
        }
    }
}

impl ProgressionSettings {
    /// Validate steps and limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "progression.history_limit must be at least 1".into(),
            ));
        }

        for category in ExerciseCategory::ALL {
            let step = self.steps.step_for(category);
            if !step.is_finite() || step <= 0.0 {
                return Err(ConfigError::InvalidValue(format!(
                    "progression.steps.{} must be a positive number, got {step}",
                    category.display_name().to_lowercase()
                )));
            }
        }

        Ok(())
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Progression settings
    #[serde(default)]
    pub progression: ProgressionSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            progression: ProgressionSettings::default(),
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "liftlog", "LiftLog")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&get_config_path())
}

/// Load application configuration from a file.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(AppConfig {
            data_dir: get_data_dir(),
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    config.progression.validate()?;
    config.data_dir = get_data_dir();

    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to a file.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    config.progression.validate()?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    tracing::info!("Saved config to {}", path.display());

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
