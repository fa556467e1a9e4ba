use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use liker_core::{ClearSelection, ControllerSettings, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE};
use liker_engine::GatewaySettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_PATH: &str = "./liker.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Serialized twin of [`ClearSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionPolicy {
    #[default]
    OnSuccess,
    OnSuccessOrPartial,
    Never,
}

impl From<SelectionPolicy> for ClearSelection {
    fn from(policy: SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::OnSuccess => ClearSelection::OnSuccess,
            SelectionPolicy::OnSuccessOrPartial => ClearSelection::OnSuccessOrPartial,
            SelectionPolicy::Never => ClearSelection::Never,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikerConfig {
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub batch_size: usize,
    pub page_size: usize,
    pub initial_collection: Option<String>,
    pub clear_selection: SelectionPolicy,
    pub log_destination: LogDestination,
    pub log_level: String,
}

impl Default for LikerConfig {
    fn default() -> Self {
        let gateway = GatewaySettings::default();
        Self {
            base_url: gateway.base_url,
            connect_timeout_ms: gateway.connect_timeout.as_millis() as u64,
            request_timeout_ms: gateway.request_timeout.as_millis() as u64,
            batch_size: DEFAULT_BATCH_SIZE,
            page_size: DEFAULT_PAGE_SIZE,
            initial_collection: None,
            clear_selection: SelectionPolicy::default(),
            log_destination: LogDestination::default(),
            log_level: "info".to_string(),
        }
    }
}

impl LikerConfig {
    /// Reads the RON file at `path`. A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        ron::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn gateway_settings(&self) -> GatewaySettings {
        GatewaySettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            batch_size: self.batch_size,
            page_size: self.page_size,
            initial_collection: self.initial_collection.clone(),
            clear_selection: self.clear_selection.into(),
        }
    }
}
