// User configuration loaded from YAML

use crate::task::Priority;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "tasklist.yml";

/// Which backend the binary persists through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Sqlite,
}

/// Priority given to new tasks when none is passed explicitly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultPriority {
    None,
    Low,
    #[default]
    Medium,
    High,
}

impl From<DefaultPriority> for Option<Priority> {
    fn from(value: DefaultPriority) -> Self {
        match value {
            DefaultPriority::None => None,
            DefaultPriority::Low => Some(Priority::Low),
            DefaultPriority::Medium => Some(Priority::Medium),
            DefaultPriority::High => Some(Priority::High),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root directory the backend stores under (default: current directory)
    pub store_dir: Option<PathBuf>,
    pub backend: BackendKind,
    pub default_priority: DefaultPriority,
}

impl Config {
    /// Default location: `<config_dir>/tasklist/tasklist.yml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tasklist").join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?path, "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).context(format!("Failed to read config file {}", path.display())),
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).context(format!("Failed to parse config file {}", path.display()))
    }

    /// Load from `path` if given, else from the default location
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }
}
