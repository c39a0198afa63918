//! User settings for envelope-rollover
//!
//! Persists the period start day, display preferences and the default user.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::paths::RolloverPaths;
use crate::error::RolloverError;
use crate::services::period::{clamp_start_day, MAX_START_DAY};
use crate::storage::file_io::write_json_atomic;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Day of month on which each budget period begins (1..=28)
    #[serde(default = "default_start_day")]
    pub period_start_day: u32,

    /// Currency symbol used for display
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// User id used when none is given on the command line
    #[serde(default = "default_user")]
    pub default_user: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_start_day() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_user() -> String {
    "default".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            period_start_day: default_start_day(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            default_user: default_user(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// An out-of-range start day in the file is clamped and logged.
    pub fn load_or_create(paths: &RolloverPaths) -> Result<Self, RolloverError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| RolloverError::Io(format!("Failed to read settings file: {}", e)))?;

        let mut settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| RolloverError::Config(format!("Failed to parse settings file: {}", e)))?;

        let clamped = clamp_start_day(settings.period_start_day);
        if clamped != settings.period_start_day {
            warn!(
                configured = settings.period_start_day,
                clamped, "period_start_day out of range, clamping"
            );
            settings.period_start_day = clamped;
        }

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &RolloverPaths) -> Result<(), RolloverError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Set the period start day, rejecting values outside 1..=28
    pub fn set_period_start_day(&mut self, day: u32) -> Result<(), RolloverError> {
        if !(1..=MAX_START_DAY).contains(&day) {
            return Err(RolloverError::Validation(format!(
                "Period start day must be between 1 and {}, got {}",
                MAX_START_DAY, day
            )));
        }
        self.period_start_day = day;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.period_start_day, 1);
        assert_eq!(settings.currency_symbol, "$");
        assert_eq!(settings.default_user, "default");
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_period_start_day(15).unwrap();
        settings.currency_symbol = "€".into();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_out_of_range_start_day_clamped_on_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"period_start_day": 31}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.period_start_day, 28);
        assert_eq!(loaded.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_set_start_day_validation() {
        let mut settings = Settings::default();
        assert!(settings.set_period_start_day(0).is_err());
        assert!(settings.set_period_start_day(29).is_err());
        assert!(settings.set_period_start_day(28).is_ok());
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = RolloverPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, RolloverError::Config(_)));
    }
}
