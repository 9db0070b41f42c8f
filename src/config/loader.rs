//! Configuration loading functionality.
//!
//! This module provides the [`SettingsLoader`] type for loading engine
//! settings from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{RosterError, RosterResult};

use super::types::RosterSettings;

/// Loads engine settings from a YAML file.
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::SettingsLoader;
///
/// let settings = SettingsLoader::load("./config/settings.yaml")?;
/// assert!(settings.min_per_shift >= 1);
/// # Ok::<(), roster_engine::error::RosterError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SettingsLoader;

impl SettingsLoader {
    /// Loads settings from the specified file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` when the file cannot be read and
    /// `ConfigParseError` when it contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> RosterResult<RosterSettings> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| RosterError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| RosterError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }
}
