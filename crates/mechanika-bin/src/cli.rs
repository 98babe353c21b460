// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! This module provides the command-line interface for MyMechanika using
//! clap. It supports multiple subcommands for different operations:
//!
//! - `run`: Start the service (default)
//! - `validate`: Validate configuration file
//! - `credentials`: List the demo login accounts
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "mechanika.yaml";

// =============================================================================
// Main CLI Structure
// =============================================================================

/// MyMechanika - workshop management dashboard service
///
/// Serves the dashboard's access-control core: role-gated navigation,
/// session management, and the request gate over the auth cookie.
#[derive(Parser, Debug)]
#[command(
    name = "mymechanika",
    author = "Sylvex <contact@sylvex.io>",
    version = mechanika_core::VERSION,
    about = "MyMechanika workshop management service",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = DEFAULT_CONFIG_FILE,
        env = "MECHANIKA_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        default_value = "info",
        env = "MECHANIKA_LOG_LEVEL",
        global = true
    )]
    pub log_level: String,

    /// Log format (text, json, compact)
    #[arg(long, default_value = "text", env = "MECHANIKA_LOG_FORMAT", global = true)]
    pub log_format: LogFormat,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the MyMechanika CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the service
    ///
    /// This is the default command when no subcommand is specified.
    /// It starts the HTTP server with the request gate and auth endpoints.
    Run(RunArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without starting the
    /// service. Useful for checking configuration before deployment.
    Validate(ValidateArgs),

    /// List the demo login accounts
    ///
    /// Prints the seeded fixture credentials, one per role.
    Credentials(CredentialsArgs),

    /// Show detailed version information
    ///
    /// Displays version information for all workspace components.
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `run` command.
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the session state file
    #[arg(long)]
    pub state_file: Option<PathBuf>,

    /// Development mode: in-memory session state, no simulated login latency
    #[arg(long)]
    pub dev: bool,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Strict mode: treat warnings as errors
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the `credentials` command.
#[derive(Args, Debug, Default, Clone)]
pub struct CredentialsArgs {
    /// Output format for the listing
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Run` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or_else(|| Commands::Run(RunArgs::default()))
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level based on flags.
    pub fn effective_log_level(&self) -> &str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            &self.log_level
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["mymechanika"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Run(_)));
    }

    #[test]
    fn test_run_command_with_port() {
        let cli = Cli::parse_from(["mymechanika", "run", "--port", "8080"]);
        if let Some(Commands::Run(args)) = cli.command {
            assert_eq!(args.port, Some(8080));
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_validate_command() {
        let cli = Cli::parse_from(["mymechanika", "validate", "--strict"]);
        if let Some(Commands::Validate(args)) = cli.command {
            assert!(args.strict);
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_credentials_command_json() {
        let cli = Cli::parse_from(["mymechanika", "credentials", "-f", "json"]);
        if let Some(Commands::Credentials(args)) = cli.command {
            assert_eq!(args.format, OutputFormat::Json);
        } else {
            panic!("Expected Credentials command");
        }
    }

    #[test]
    fn test_config_path() {
        let cli = Cli::parse_from(["mymechanika", "-c", "/etc/mechanika/service.yaml"]);
        assert_eq!(cli.config, PathBuf::from("/etc/mechanika/service.yaml"));
    }

    #[test]
    fn test_quiet_mode() {
        let cli = Cli::parse_from(["mymechanika", "-q"]);
        assert!(cli.quiet);
        assert_eq!(cli.effective_log_level(), "warn");
    }

    #[test]
    fn test_verbose_mode() {
        let cli = Cli::parse_from(["mymechanika", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.effective_log_level(), "debug");
    }

    #[test]
    fn test_explicit_log_level() {
        let cli = Cli::parse_from(["mymechanika", "-l", "trace"]);
        assert_eq!(cli.effective_log_level(), "trace");
    }
}
