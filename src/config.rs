use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    errors::TrackerError,
    routing::mapbox::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
};

const CONFIG_DIR_NAME: &str = "cargotrace";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ACCESS_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub access_token: Option<String>,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            access_token: None,
        }
    }
}

impl DirectionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub directions: DirectionsConfig,
    /// Index into the active shipments of the one selected at startup
    pub initial_selection: usize,
    pub show_past_shipments: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            directions: DirectionsConfig::default(),
            initial_selection: 1,
            show_past_shipments: false,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf, TrackerError> {
        Ok(dirs::config_dir()
            .ok_or(TrackerError::NoConfigDir)?
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self, TrackerError> {
        let file = std::fs::File::open(path).map_err(|e| TrackerError::ConfigIOError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config = serde_json::from_reader(file).map_err(|e| TrackerError::ConfigParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reads the per-user config file if there is one.
    pub fn from_local_file() -> Result<Option<Self>, TrackerError> {
        let config_path = match Self::default_path() {
            Ok(path) => path,
            Err(TrackerError::NoConfigDir) => {
                debug!("No config directory on this platform, using defaults");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if config_path.exists() {
            Self::from_file(&config_path).map(Some)
        } else {
            debug!("No config file at {}", config_path.display());
            Ok(None)
        }
    }

    /// Picks the directions token: command line, then environment, then file.
    /// Blank values count as absent.
    pub fn resolve_access_token(
        &self,
        cli_token: Option<&str>,
        env_token: Option<&str>,
    ) -> Option<String> {
        [cli_token, env_token, self.directions.access_token.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|token| !token.is_empty())
            .map(str::to_string)
    }
}
