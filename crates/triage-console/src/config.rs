use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Default)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) storage: StorageConfig,
    #[serde(default)]
    pub(crate) export: ExportConfig,
    #[serde(default)]
    pub(crate) logging: LoggingConfig,
    #[serde(default)]
    pub(crate) ui: UiConfig,
}

impl Config {
    /// A missing file yields defaults; a malformed one is an error.
    pub(crate) fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct StorageConfig {
    pub(crate) data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ExportConfig {
    pub(crate) dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LoggingConfig {
    pub(crate) dir: PathBuf,
    pub(crate) filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            filter: default_log_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct UiConfig {
    pub(crate) history_limit: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { history_limit: 50 }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}
