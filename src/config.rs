//! User configuration stored as TOML.
//!
//! Location: `$WLR_CONFIG` if set, else `<config dir>/wlr/config.toml`.
//! Missing files and missing fields fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{ModelSettings, DEFAULT_LANGUAGE};
use crate::patterns::{self, Profile};
use crate::rewriter::DEFAULT_SUFFIX_FORMAT;

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "WLR_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Two-letter language assumed when a file carries no language suffix.
    pub default_language: String,
    /// Which migration job wrote the log.
    pub profile: Profile,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            profile: Profile::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Only write the statistics report.
    pub stats_only: bool,
    /// chrono format of the timestamp appended to rewritten file names.
    pub suffix_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            stats_only: false,
            suffix_format: DEFAULT_SUFFIX_FORMAT.to_string(),
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(dir.join("wlr").join("config.toml"))
    }

    /// Loads the user config, or defaults when no file exists.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, toml::to_string_pretty(self)?)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !patterns::is_language_code(&self.engine.default_language) {
            bail!(
                "engine.default_language must be two letters, got '{}'",
                self.engine.default_language
            );
        }
        if self.output.suffix_format.trim().is_empty() {
            bail!("output.suffix_format must not be empty");
        }
        Ok(())
    }

    /// Engine settings with optional command-line overrides applied.
    pub fn settings(&self, language: Option<&str>, profile: Option<Profile>) -> Result<ModelSettings> {
        let language = language.unwrap_or(&self.engine.default_language);
        let settings = ModelSettings::new(language, profile.unwrap_or(self.engine.profile))?;
        Ok(settings)
    }
}
