// statlab/src/commands/mod.rs
//! Command implementations for the statlab CLI.

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use statlab_core::{AppConfig, ConfigOverrides};

pub mod compute;
pub mod serve;

/// Builds the effective configuration.
///
/// Layers, lowest first: built-in defaults, the user config file, the
/// `STATLAB_*` environment variables and finally command-line flags.
pub fn resolve_config(path: Option<&Path>, cli_overrides: ConfigOverrides) -> Result<AppConfig> {
    let env_overrides = ConfigOverrides::from_env().context("Invalid STATLAB_* environment variable")?;
    let config = AppConfig::load(path)?
        .with_overrides(env_overrides)?
        .with_overrides(cli_overrides)?;
    debug!("Effective configuration: {:?}", config);
    Ok(config)
}
