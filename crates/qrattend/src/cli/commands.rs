//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

/// Register command arguments.
#[derive(Debug, Args)]
pub struct RegisterCommand {
    /// Unique roll number of the student
    pub roll_number: String,

    /// Student name
    pub name: String,
}

/// Scan command arguments.
#[derive(Debug, Args)]
pub struct ScanCommand {
    /// Directory containing QR code images
    pub dir: PathBuf,

    /// Day to record attendance for (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,
}

/// Report command arguments.
#[derive(Debug, Args)]
pub struct ReportCommand {
    /// CSV destination (defaults to the configured report path)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only print the report, don't write the CSV file
    #[arg(long)]
    pub no_export: bool,

    /// Output format for the printed report
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Students command arguments.
#[derive(Debug, Args)]
pub struct StudentsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// QR regeneration arguments.
#[derive(Debug, Args)]
pub struct QrCommand {
    /// Roll number of a registered student
    pub roll_number: String,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain CSV text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_register_command_debug() {
        let cmd = RegisterCommand {
            roll_number: "101".to_string(),
            name: "Alice".to_string(),
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("roll_number"));
        assert!(debug_str.contains("Alice"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
