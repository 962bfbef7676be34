//! Data configuration file support.
//!
//! Reads seed-data locations and policy defaults from a TOML configuration
//! file, with environment variable overrides for container deployments.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::repository::RepositoryError;

/// Fallback zone applied to stores with no timezone assignment.
pub const DEFAULT_TIMEZONE: &str = "America/Chicago";

/// Data configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub data: DataSettings,
}

/// Seed-data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// Directory holding the seed CSV files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Status observation stream file name.
    #[serde(default = "default_store_status_file")]
    pub store_status_file: String,
    /// Business hours file name.
    #[serde(default = "default_business_hours_file")]
    pub business_hours_file: String,
    /// Timezone assignment file name.
    #[serde(default = "default_timezones_file")]
    pub timezones_file: String,
    /// Zone applied to stores with no timezone assignment.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_store_status_file() -> String {
    "store_status.csv".to_string()
}

fn default_business_hours_file() -> String {
    "menu_hours.csv".to_string()
}

fn default_timezones_file() -> String {
    "timezones.csv".to_string()
}

fn default_timezone() -> String {
    DEFAULT_TIMEZONE.to_string()
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_status_file: default_store_status_file(),
            business_hours_file: default_business_hours_file(),
            timezones_file: default_timezones_file(),
            default_timezone: default_timezone(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
        }
    }
}

impl DataConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!(
                "cannot read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            RepositoryError::configuration(format!(
                "cannot parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Load configuration from the environment.
    ///
    /// `STOREWATCH_CONFIG` names a TOML file; without it the defaults apply.
    /// `STOREWATCH_DATA_DIR` and `STOREWATCH_DEFAULT_TZ` override the
    /// corresponding settings either way.
    pub fn from_env() -> Result<Self, RepositoryError> {
        let mut config = match std::env::var("STOREWATCH_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(dir) = std::env::var("STOREWATCH_DATA_DIR") {
            config.data.data_dir = PathBuf::from(dir);
        }
        if let Ok(tz) = std::env::var("STOREWATCH_DEFAULT_TZ") {
            config.data.default_timezone = tz;
        }

        Ok(config)
    }

    /// Path of the status observation seed file.
    pub fn store_status_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.store_status_file)
    }

    /// Path of the business hours seed file.
    pub fn business_hours_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.business_hours_file)
    }

    /// Path of the timezone assignment seed file.
    pub fn timezones_path(&self) -> PathBuf {
        self.data.data_dir.join(&self.data.timezones_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DataConfig::default();
        assert_eq!(config.data.data_dir, PathBuf::from("data"));
        assert_eq!(config.data.default_timezone, "America/Chicago");
        assert_eq!(
            config.store_status_path(),
            PathBuf::from("data/store_status.csv")
        );
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: DataConfig = toml::from_str(
            r#"
            [data]
            data_dir = "/srv/seed"
            default_timezone = "UTC"
            "#,
        )
        .unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/srv/seed"));
        assert_eq!(config.data.default_timezone, "UTC");
        assert_eq!(config.data.store_status_file, "store_status.csv");
    }
}
