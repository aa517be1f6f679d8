//! Configuration loading and parsing.
//!
//! Parses `rtedit.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [history]
//! max_operations = 50
//! merge_window_ms = 300
//! skip_unchanged = true
//!
//! [log]
//! file = "rtedit.log"
//! ```
//!
//! Every field is optional. A missing file yields defaults; a file that fails
//! to parse also yields defaults (logged under target `config`). Unknown
//! fields are ignored.

use anyhow::Result;
use core_history::HistoryLimits;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "rtedit.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_max_operations")]
    pub max_operations: usize,
    #[serde(default = "HistoryConfig::default_merge_window_ms")]
    pub merge_window_ms: u64,
    #[serde(default = "HistoryConfig::default_skip_unchanged")]
    pub skip_unchanged: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_operations: Self::default_max_operations(),
            merge_window_ms: Self::default_merge_window_ms(),
            skip_unchanged: Self::default_skip_unchanged(),
        }
    }
}

impl HistoryConfig {
    const fn default_max_operations() -> usize {
        core_history::MAX_OPERATIONS
    }
    const fn default_merge_window_ms() -> u64 {
        300
    }
    const fn default_skip_unchanged() -> bool {
        true
    }

    /// Effective limits. A capacity of zero is raised to one.
    pub fn limits(&self) -> HistoryLimits {
        if self.max_operations == 0 {
            info!(target: "config", raw = self.max_operations, clamped = 1, "history_capacity_clamped");
        }
        HistoryLimits::new(
            self.max_operations,
            Duration::from_millis(self.merge_window_ms),
            self.skip_unchanged,
        )
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct LogConfig {
    #[serde(default = "LogConfig::default_file")]
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: Self::default_file(),
        }
    }
}

impl LogConfig {
    fn default_file() -> String {
        "rtedit.log".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path: `./rtedit.toml`, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("rtedit").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                source: Some(path),
                file,
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    pub fn history_limits(&self) -> HistoryLimits {
        self.file.history.limits()
    }
}
