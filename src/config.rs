use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::controller::DEFAULT_PAGE_SIZE;
use crate::error::{DexError, Result};
use crate::pokeapi::DEFAULT_BASE_URL;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// ~/.cache/dexgrid/dexgrid.log (Linux) or the platform equivalent
pub fn log_path() -> Option<PathBuf> {
    let cache_dir = dirs::cache_dir()?;
    Some(cache_dir.join("dexgrid").join("dexgrid.log"))
}

/// ~/.config/dexgrid/config.toml (Linux) or the platform equivalent
pub fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("dexgrid").join("config.toml"))
}

impl Config {
    /// Load from `path`, or the default location. A missing file yields the
    /// defaults; an unreadable or invalid one is an error the caller may
    /// fall back from.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(config_path) else {
            return Ok(Config::default());
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };

        Self::parse(&content).map_err(|e| match e {
            DexError::Config(msg) => DexError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| DexError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, base_url: Option<String>, page_size: Option<usize>) -> Result<Self> {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if let Some(size) = page_size {
            self.api.page_size = size;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 {
            return Err(DexError::Config("page_size must be at least 1".into()));
        }
        if !(self.api.base_url.starts_with("https://") || self.api.base_url.starts_with("http://")) {
            return Err(DexError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        Ok(())
    }
}
