//! Finding and reading the settings file.
//!
//! The first file found wins: an explicit path (`--config` or
//! `DIRPROBE_CONFIG`), then `./dirprobe.yaml`, then
//! `~/.dirprobe/config.yaml`. An explicit path that does not exist is an
//! error; otherwise a missing file means built-in defaults. Command-line
//! overrides are layered on by the binary, which then calls
//! [`Settings::validate`] on the merged result.

use super::schema::Settings;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "DIRPROBE_CONFIG";

const LOCAL_FILE: &str = "dirprobe.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file {} does not exist", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Where the loaded settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

pub struct ConfigLoader {
    explicit: Option<PathBuf>,
    work_dir: PathBuf,
    home_dir: Option<PathBuf>,
}

impl ConfigLoader {
    /// Search the current directory and the user's home directory.
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self {
            explicit,
            work_dir: PathBuf::from("."),
            home_dir: dirs::home_dir(),
        }
    }

    /// Search `work_dir` and `home_dir` instead of the process defaults.
    pub fn in_dirs(explicit: Option<PathBuf>, work_dir: &Path, home_dir: Option<&Path>) -> Self {
        Self {
            explicit,
            work_dir: work_dir.to_path_buf(),
            home_dir: home_dir.map(Path::to_path_buf),
        }
    }

    /// Files tried when no explicit path is given, in order.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.work_dir.join(LOCAL_FILE)];
        if let Some(home) = &self.home_dir {
            paths.push(home.join(".dirprobe").join("config.yaml"));
        }
        paths
    }

    pub async fn load(&self) -> Result<(Settings, ConfigSource), ConfigError> {
        if let Some(path) = &self.explicit {
            if !path.exists() {
                return Err(ConfigError::Missing(path.clone()));
            }
            let settings = Self::load_from(path).await?;
            return Ok((settings, ConfigSource::File(path.clone())));
        }

        for path in self.search_paths() {
            if path.exists() {
                let settings = Self::load_from(&path).await?;
                return Ok((settings, ConfigSource::File(path)));
            }
            debug!("No config at {}", path.display());
        }
        Ok((Settings::default(), ConfigSource::Defaults))
    }

    pub async fn load_from(path: &Path) -> Result<Settings, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
