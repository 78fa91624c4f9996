use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TutorbaseError};
use crate::model::{Location, SessionType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TutorbaseConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub booking: BookingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Custom path for the SQLite database. Defaults to
    /// `~/.config/tutorbase/tutorbase.db`.
    #[serde(default)]
    pub path: Option<String>,
}

/// Defaults the booking surface pre-fills when flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default = "default_location")]
    pub default_location: Location,
    #[serde(default = "default_session_type")]
    pub default_session_type: SessionType,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            default_location: default_location(),
            default_session_type: default_session_type(),
        }
    }
}

fn default_location() -> Location {
    Location::Centre
}

fn default_session_type() -> SessionType {
    SessionType::OneToOne
}

impl TutorbaseConfig {
    /// Load configuration, layering the global file under the project file.
    ///
    /// Layer 1: `~/.config/tutorbase/config.toml`
    /// Layer 2: `<project>/.tutorbase/config.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".tutorbase").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| TutorbaseError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| TutorbaseError::Config(e.to_string()))
    }

    /// Resolve the database path: explicit config wins, else the default.
    pub fn db_path(&self) -> Result<PathBuf> {
        match &self.storage.path {
            Some(p) => Ok(PathBuf::from(p)),
            None => crate::storage::default_db_path(),
        }
    }
}

/// Global config file: `~/.config/tutorbase/config.toml`
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tutorbase").join("config.toml"))
}

/// Serialize a default config to TOML, for `init` to write out.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&TutorbaseConfig::default())
        .map_err(|e| TutorbaseError::Config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = TutorbaseConfig::default();
        assert!(cfg.storage.path.is_none());
        assert_eq!(cfg.booking.default_location, Location::Centre);
        assert_eq!(cfg.booking.default_session_type, SessionType::OneToOne);
    }

    #[test]
    fn test_default_config_roundtrips_through_toml() {
        let text = default_config_toml().unwrap();
        let parsed: TutorbaseConfig = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.booking.default_location,
            TutorbaseConfig::default().booking.default_location
        );
    }
}
