//! CLI command implementations.

use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

use crate::config::{AgentConfig, ConfigFormat, Environment};
use crate::InspectorError;

use super::utils::load_config;

/// Print the effective configuration
pub fn show(config_path: &Path, format: Option<ConfigFormat>) -> Result<()> {
    let config = load_config(config_path, true)?;
    let format = match format {
        Some(format) => format,
        None => ConfigFormat::from_path(config_path)?,
    };

    println!("{}", format.encode(&config)?);
    Ok(())
}

/// Validate the configuration file, listing every invalid field
pub fn validate(config_path: &Path) -> Result<()> {
    match load_config(config_path, true) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!("{}", config);
            Ok(())
        }
        Err(e) => {
            if let Some(validation) = e
                .downcast_ref::<InspectorError>()
                .and_then(InspectorError::validation_errors)
            {
                println!("✗ Configuration has {} invalid field(s):", validation.len());
                for field_error in validation.errors() {
                    println!("  - {}", field_error);
                }
            } else {
                error!("Configuration validation failed: {:#}", e);
            }
            Err(e)
        }
    }
}

/// Write a default configuration for `environment`
pub fn init(config_path: &Path, environment: Environment, force: bool) -> Result<()> {
    // reject the extension before touching the filesystem
    ConfigFormat::from_path(config_path)?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    AgentConfig::new(environment).save(config_path)?;

    println!("✓ Configuration initialized at {}", config_path.display());
    Ok(())
}

/// Append a monitoring target and save
pub fn add_target(config_path: &Path, host: &str, port: u16) -> Result<()> {
    let mut config = load_config(config_path, false)?;
    config
        .add_target(host, port)
        .map_err(InspectorError::from)?;
    config.save(config_path)?;

    println!("✓ Added target {}:{}", host.trim(), port);
    Ok(())
}

/// Remove every matching target and save
pub fn remove_target(config_path: &Path, host: &str, port: u16) -> Result<()> {
    let mut config = load_config(config_path, false)?;
    let removed = config.remove_target(host, port);

    if removed == 0 {
        println!("No target {}:{} configured; nothing to remove", host.trim(), port);
        return Ok(());
    }

    config.save(config_path)?;
    println!("✓ Removed {} target(s) matching {}:{}", removed, host.trim(), port);
    Ok(())
}

/// List configured targets
pub fn list_targets(config_path: &Path) -> Result<()> {
    let config = load_config(config_path, true)?;
    info!("Listing {} target(s)", config.targets().len());

    if config.targets().is_empty() {
        println!("No targets configured.");
        return Ok(());
    }

    for (i, target) in config.targets().iter().enumerate() {
        println!("{:>3}. {}", i + 1, target);
    }
    Ok(())
}

/// Show version information
pub fn version() -> Result<()> {
    println!("DevNet Inspector {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
