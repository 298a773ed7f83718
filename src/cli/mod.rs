//! CLI interface for DevNet Inspector.
//!
//! Inspects and edits the agent configuration file.

mod commands;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::settings::{self, CONFIG_PATH_ENV};
use crate::config::{ConfigFormat, Environment, LogLevel};

pub use commands::*;
pub use utils::*;

#[derive(Parser)]
#[command(name = "devnet-inspector")]
#[command(about = "Manage the DevNet Inspector agent configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (DEBUG, INFO, WARNING, ERROR, CRITICAL); defaults to the config's level
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Configuration file path (.json or .yaml)
    #[arg(long, short = 'c', global = true, env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration
    Show {
        /// Output format (json or yaml); defaults to the file's own format
        #[arg(long, short = 'f')]
        format: Option<ConfigFormat>,
    },

    /// Check the configuration file and report every invalid field
    Validate,

    /// Write a default configuration file
    Init {
        #[arg(long, short = 'e', default_value = "dev")]
        environment: Environment,

        #[arg(long)]
        force: bool,
    },

    /// Manage monitoring targets
    Target {
        #[command(subcommand)]
        action: TargetAction,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum TargetAction {
    /// Append a target (duplicates are kept)
    Add { host: String, port: u16 },

    /// Remove every target matching host and port
    Remove { host: String, port: u16 },

    /// List configured targets
    List,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Config file this invocation works on
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(settings::config_path)
    }

    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        let config_path = self.config_path();

        match self.command {
            Commands::Show { format } => show(&config_path, format),
            Commands::Validate => validate(&config_path),
            Commands::Init { environment, force } => init(&config_path, environment, force),
            Commands::Target { action } => match action {
                TargetAction::Add { host, port } => add_target(&config_path, &host, port),
                TargetAction::Remove { host, port } => remove_target(&config_path, &host, port),
                TargetAction::List => list_targets(&config_path),
            },
            Commands::Version => version(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_add() {
        let cli = Cli::try_parse_from([
            "devnet-inspector",
            "--config",
            "/tmp/agent.json",
            "target",
            "add",
            "example.com",
            "443",
        ])
        .unwrap();

        assert_eq!(cli.config_path(), PathBuf::from("/tmp/agent.json"));
        match cli.command {
            Commands::Target {
                action: TargetAction::Add { host, port },
            } => {
                assert_eq!(host, "example.com");
                assert_eq!(port, 443);
            }
            _ => panic!("Expected target add"),
        }
    }

    #[test]
    fn test_parse_enums() {
        let cli = Cli::try_parse_from([
            "devnet-inspector",
            "--log-level",
            "debug",
            "init",
            "--environment",
            "qa",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(matches!(
            cli.command,
            Commands::Init {
                environment: Environment::Qa,
                force: false
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_environment() {
        let result = Cli::try_parse_from(["devnet-inspector", "init", "-e", "staging"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_show_format_flag() {
        let cli = Cli::try_parse_from(["devnet-inspector", "show", "-f", "yaml"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Show {
                format: Some(ConfigFormat::Yaml)
            }
        ));
    }
}
