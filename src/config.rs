// src/config.rs

//! Configuration for dependency resolution
//!
//! # Example config.toml
//!
//! ```toml
//! # Where buckets/ and apps/ live (defaults to $SCOOP or ~/scoop)
//! root = 'D:\scoop'
//!
//! # Use a 7-Zip that is not managed as an app; never queue the 7zip helper
//! use_external_7zip = false
//!
//! # Unpack Inno Setup installers with innoextract instead of innounp
//! innosetup_use_innoextract = true
//! ```

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the configuration inside the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable that overrides the root directory
pub const ROOT_ENV_VAR: &str = "SCOOP";

/// Switches that influence which helper tools are required
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct HelperConfig {
    /// An external 7-Zip handles extraction, so the 7zip helper is never required
    #[serde(default, alias = "7ZIPEXTRACT_USE_EXTERNAL")]
    pub use_external_7zip: bool,

    /// Inno Setup installers are unpacked with innoextract instead of innounp
    #[serde(default, alias = "INNOSETUP_USE_INNOEXTRACT")]
    pub innosetup_use_innoextract: bool,
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub root: Option<PathBuf>,

    #[serde(flatten)]
    pub helpers: HelperConfig,
}

impl Config {
    /// Default configuration path, if the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing default file yields the default configuration; a missing
    /// explicitly given file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Root directory holding `buckets/` and `apps/`
    ///
    /// Explicit `root`, else `$SCOOP`, else `~/scoop`.
    pub fn root_dir(&self) -> PathBuf {
        if let Some(ref root) = self.root {
            return root.clone();
        }
        if let Some(root) = std::env::var_os(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            return PathBuf::from(root);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scoop")
    }
}
