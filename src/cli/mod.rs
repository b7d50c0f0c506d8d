//! CLI Module
//!
//! Command-line interface for AppForge using Clap v4.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::wizard::GuideKind;

/// AppForge - turn a website into a configured mobile app wrapper
#[derive(Parser, Debug)]
#[command(name = "appforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug mode (creates log files in .appforge/logs/)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive wizard (default)
    Wizard {
        /// Draft preset to start from
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Website URL to pre-fill
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Render a build guide without the wizard
    Guide {
        /// Which guide to produce
        #[arg(value_enum)]
        kind: GuideKind,

        /// Draft preset to start from
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Field override, e.g. --set app_name="Crab Shop"
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,

        /// Write the guide into this directory instead of printing it
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write passwords into the signing guide in plaintext
        #[arg(long)]
        include_passwords: bool,
    },

    /// Print the device preview model as JSON
    Preview {
        /// Draft preset to start from
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Field override, e.g. --set navigation_style=tabs
        #[arg(short, long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Print the report link for a website
    ReportUrl {
        /// Draft preset to start from
        #[arg(short, long)]
        preset: Option<PathBuf>,

        /// Website URL (overrides the preset)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration
    Config,

    /// Log management operations
    Logs {
        #[command(subcommand)]
        operation: LogCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Show log file location and status
    Status,
    /// View recent log entries (requires debug mode)
    View {
        /// Number of lines to show (default: 50)
        #[arg(short, long, default_value = "50")]
        lines: usize,
    },
    /// Clean up old log files
    Clean {
        /// Maximum age in days (default: 7)
        #[arg(short = 'a', long, default_value = "7")]
        days: u64,
    },
}

/// Main CLI entry point
pub async fn run(cli: Cli, config: Config) -> Result<()> {
    if cli.debug {
        tracing::info!("Debug mode enabled");
    }

    match cli.command {
        None => commands::cmd_wizard(config, None, None).await,
        Some(Commands::Wizard { preset, url }) => commands::cmd_wizard(config, preset, url).await,
        Some(Commands::Guide {
            kind,
            preset,
            set,
            out,
            include_passwords,
        }) => {
            commands::cmd_guide(&config, kind, preset, &set, out, include_passwords).await
        }
        Some(Commands::Preview { preset, set }) => {
            commands::cmd_preview(&config, preset, &set).await
        }
        Some(Commands::ReportUrl { preset, url }) => {
            commands::cmd_report_url(&config, preset, url).await
        }
        Some(Commands::Init { force }) => commands::cmd_init(force).await,
        Some(Commands::Config) => commands::cmd_config(&config).await,
        Some(Commands::Logs { operation }) => commands::cmd_logs(operation).await,
    }
}

/// Load configuration from file or defaults
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config = if let Some(path) = config_path {
        tracing::info!("Loading configuration from custom path: {}", path);
        Config::load_from_path(path)?
    } else {
        tracing::debug!("Loading default configuration");
        Config::load()?
    };

    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_wizard() {
        let cli = Cli::try_parse_from(["appforge"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_guide_args() {
        let cli = Cli::try_parse_from([
            "appforge",
            "-d",
            "guide",
            "signing",
            "--set",
            "app_name=Crab Shop",
            "--set",
            "keystore_alias=release",
            "--out",
            "dist",
        ])
        .unwrap();
        assert!(cli.debug);
        let Some(Commands::Guide { kind, set, out, include_passwords, .. }) = cli.command else {
            unreachable!("guide subcommand expected");
        };
        assert_eq!(kind, GuideKind::Signing);
        assert_eq!(set.len(), 2);
        assert_eq!(out, Some(PathBuf::from("dist")));
        assert!(!include_passwords);
    }

    #[test]
    fn test_guide_kind_names() {
        let cli = Cli::try_parse_from(["appforge", "guide", "debug-apk"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Guide { kind: GuideKind::DebugApk, .. })
        ));
        assert!(Cli::try_parse_from(["appforge", "guide", "release"]).is_err());
    }

    #[test]
    fn test_load_config_from_custom_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("appforge.toml");
        std::fs::write(&path, "[export]\ndelay_ms = 250\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.export.delay_ms, 250);
    }

    #[test]
    fn test_load_config_rejects_invalid_level() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("appforge.toml");
        std::fs::write(&path, "[logging]\nlevel = \"loud\"\n").unwrap();

        assert!(load_config(path.to_str()).is_err());
    }

    #[test]
    fn test_logs_clean_days() {
        let cli = Cli::try_parse_from(["appforge", "logs", "clean", "-a", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Logs { operation: LogCommands::Clean { days: 3 } })
        ));
    }
}
