//! Subcommand handlers

pub mod completions;
pub mod config;
pub mod rewrite;
pub mod stats;

use anyhow::Result;
use wlr::cli::EngineArgs;
use wlr::{Config, ModelSettings};

/// Effective engine settings: command-line flags over the config file.
pub fn engine_settings(config: &Config, engine: &EngineArgs) -> Result<ModelSettings> {
    config.settings(engine.default_language.as_deref(), engine.profile)
}
