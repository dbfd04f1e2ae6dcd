//! Command-line interface for qrattend.
//!
//! This module provides the CLI structure for the `qrattend` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, OutputFormat, QrCommand, RegisterCommand, ReportCommand, ScanCommand,
    StatusCommand, StudentsCommand,
};

/// qrattend - Student attendance from QR code images
///
/// Register students to get a QR code each, scan a folder of photographed
/// codes to mark the day's attendance, and export the attendance report.
#[derive(Debug, Parser)]
#[command(name = "qrattend")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a student and generate their QR code
    #[command(visible_alias = "add")]
    Register(RegisterCommand),

    /// Mark attendance from a folder of QR code images
    Scan(ScanCommand),

    /// Print and export the attendance report
    Report(ReportCommand),

    /// List registered students
    Students(StudentsCommand),

    /// Regenerate the QR code of a registered student
    Qr(QrCommand),

    /// Show database statistics
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use clap::CommandFactory;

    fn status_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            database: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "qrattend");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        use crate::logging::Verbosity;

        assert_eq!(status_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(status_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(status_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(status_cli(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from(["qrattend", "register", "101", "Alice Smith"]).unwrap();
        match cli.command {
            Command::Register(cmd) => {
                assert_eq!(cmd.roll_number, "101");
                assert_eq!(cmd.name, "Alice Smith");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_alias() {
        let cli = Cli::try_parse_from(["qrattend", "add", "101", "Alice"]).unwrap();
        assert!(matches!(cli.command, Command::Register(_)));
    }

    #[test]
    fn test_parse_scan_with_date() {
        let cli =
            Cli::try_parse_from(["qrattend", "scan", "photos", "--date", "2024-01-01"]).unwrap();
        match cli.command {
            Command::Scan(cmd) => {
                assert_eq!(cmd.dir, PathBuf::from("photos"));
                assert_eq!(cmd.date, NaiveDate::from_ymd_opt(2024, 1, 1));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_scan_rejects_bad_date() {
        assert!(Cli::try_parse_from(["qrattend", "scan", "photos", "--date", "01/02/2024"]).is_err());
    }

    #[test]
    fn test_parse_report_defaults() {
        let cli = Cli::try_parse_from(["qrattend", "report"]).unwrap();
        match cli.command {
            Command::Report(cmd) => {
                assert!(cmd.output.is_none());
                assert!(!cmd.no_export);
                assert_eq!(cmd.format, OutputFormat::Table);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "qrattend",
            "students",
            "--database",
            "/tmp/a.db",
            "-c",
            "/custom/config.toml",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/a.db")));
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["qrattend", "config", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
