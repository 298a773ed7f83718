//! CLI utility functions.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::config::settings::apply_env_overrides;
use crate::config::{AgentConfig, LogLevel};
use crate::InspectorError;

/// Load the configuration file, optionally applying `DEVNET_INSPECTOR_*` overrides
pub fn load_config(config_path: &Path, with_overrides: bool) -> Result<AgentConfig> {
    let mut config = AgentConfig::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    if with_overrides {
        let applied = apply_env_overrides(&mut config)
            .map_err(InspectorError::from)
            .context("Invalid configuration override in environment")?;
        if !applied.is_empty() {
            info!("Applied {} environment override(s)", applied.len());
        }
    }

    Ok(config)
}

/// Log level recorded in the config file.
///
/// Read before logging is up, so the caller decides when to report a failure.
/// The command itself loads the file again; the two reads are independent.
pub fn configured_log_level(config_path: &Path) -> Result<LogLevel> {
    let config = AgentConfig::load(config_path)
        .with_context(|| format!("Failed to read log level from {}", config_path.display()))?;
    Ok(config.log_level())
}

/// Exit code for an error returned by [`crate::cli::Cli::run`]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<InspectorError>()
        .map(InspectorError::exit_code)
        .unwrap_or(1)
}
