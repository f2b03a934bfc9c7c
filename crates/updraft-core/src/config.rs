use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSettings {
    #[serde(default = "default_repository_owner")]
    pub repository_owner: String,

    #[serde(default = "default_repository_name")]
    pub repository_name: String,

    /// Override of the running version, as a version string.
    #[serde(default)]
    pub current_version: Option<String>,

    #[serde(default)]
    pub binary_dir: Option<PathBuf>,

    #[serde(default)]
    pub appdata_dir: Option<PathBuf>,

    #[serde(default)]
    pub rollback_dir: Option<PathBuf>,

    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub debug_logging: bool,
}

fn default_repository_owner() -> String {
    "updraft-app".to_string()
}

fn default_repository_name() -> String {
    "updraft".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            repository_owner: default_repository_owner(),
            repository_name: default_repository_name(),
            current_version: None,
            binary_dir: None,
            appdata_dir: None,
            rollback_dir: None,
            http_timeout_secs: default_http_timeout(),
            debug_logging: false,
        }
    }
}

impl UpdateSettings {
    /// Load settings from a JSON file, falling back to defaults when the
    /// file is absent or malformed.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(error) => {
                    log::warn!(
                        "Ignoring malformed settings file {}: {error}",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}
