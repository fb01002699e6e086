//! Settings resolution: built-in defaults, optional TOML file, CLI flags

use iconset_pixel::Threshold;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Iconset processed when no directory is configured
pub const DEFAULT_ICONSET: &str = "DevTools.iconset";

/// Root of the optional settings file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub clean: CleanConfig,
}

/// `[clean]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CleanConfig {
    /// Iconset directory, relative paths resolve against the config file's directory
    pub dir: Option<PathBuf>,
    pub threshold: Option<u8>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::parse(&content)?;

        if let Some(dir) = config.clean.dir.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            config.clean.dir = Some(base.join(dir));
        }

        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Fully resolved run settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub dir: PathBuf,
    pub threshold: Threshold,
}

impl Settings {
    /// Merge defaults, the config file named by `--config` (if any) and CLI flags.
    /// Later sources win.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let config = match &cli.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        let threshold = cli
            .threshold
            .or(config.clean.threshold)
            .map(Threshold::from)
            .unwrap_or_default();

        let dir = match cli.dir.clone().or(config.clean.dir) {
            Some(dir) => dir,
            None => default_iconset_dir()?,
        };

        Ok(Self { dir, threshold })
    }
}

/// `DevTools.iconset` in the directory holding the running executable
pub fn default_iconset_dir() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(|e| ConfigError::ExeDir(e.to_string()))?;
    let parent = exe
        .parent()
        .ok_or_else(|| ConfigError::ExeDir(format!("{} has no parent directory", exe.display())))?;
    Ok(parent.join(DEFAULT_ICONSET))
}

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
    ExeDir(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::ExeDir(e) => write!(f, "Cannot locate executable directory: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
