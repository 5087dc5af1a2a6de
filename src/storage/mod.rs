//! Storage module for configuration.

pub mod config;

pub use config::{AppConfig, CategorySteps, ConfigError, ProgressionSettings, Units};
