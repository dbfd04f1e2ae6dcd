//! `qrattend` - CLI for QR code based attendance
//!
//! Each command opens the attendance database, performs one logical
//! operation and closes it again on return.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;

use qrattend::cli::{
    Cli, Command, ConfigCommand, OutputFormat, RegisterCommand, ReportCommand, ScanCommand,
};
use qrattend::qr::{QrGenerator, QrImageDecoder};
use qrattend::report::{self, ReportBuilder};
use qrattend::{
    enroll, init_logging, regenerate_qr, AttendanceLedger, Config, Result, Scanner, Storage,
    StudentRegistry,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_from(cli.config.clone())?;
    if let Some(database) = cli.database {
        config.storage.database_path = Some(database);
    }

    match cli.command {
        Command::Register(cmd) => handle_register(&config, &cmd),
        Command::Scan(cmd) => handle_scan(&config, &cmd),
        Command::Report(cmd) => handle_report(&config, &cmd),
        Command::Students(cmd) => handle_students(&config, cmd.json),
        Command::Qr(cmd) => handle_qr(&config, &cmd.roll_number),
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Config(cmd) => handle_config(&config, cli.config, cmd),
    }
}

fn open_storage(config: &Config) -> Result<Storage> {
    Storage::open(config.database_path())
}

fn handle_register(config: &Config, cmd: &RegisterCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let registry = StudentRegistry::new(&storage, &config.registry)?;
    let generator = QrGenerator::new(&config.qr);

    let enrollment = enroll(&storage, &registry, &generator, &cmd.roll_number, &cmd.name)?;
    println!(
        "Registered {} ({}), QR code: {}",
        enrollment.student.name,
        enrollment.student.roll_number,
        enrollment.qr_path.display()
    );
    Ok(())
}

fn handle_scan(config: &Config, cmd: &ScanCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let registry = StudentRegistry::new(&storage, &config.registry)?;
    let scanner = Scanner::new(
        &registry,
        AttendanceLedger::new(&storage),
        QrImageDecoder::new(),
        &config.scan,
    );

    let date = cmd
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let summary = scanner.scan_directory(&cmd.dir, date)?;

    println!(
        "{}: {} marked, {} already marked, {} skipped ({} files)",
        date,
        summary.marked,
        summary.already_marked,
        summary.unknown + summary.no_code + summary.failed,
        summary.files
    );
    Ok(())
}

fn handle_report(config: &Config, cmd: &ReportCommand) -> Result<()> {
    let storage = open_storage(config)?;
    let rows = ReportBuilder::new(&storage).build_report()?;

    match cmd.format {
        OutputFormat::Table => print!("{}", report::render_table(&rows)),
        OutputFormat::Plain => report::write_csv(&rows, std::io::stdout().lock())?,
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    if !cmd.no_export {
        let path = cmd
            .output
            .clone()
            .unwrap_or_else(|| config.report.output_path.clone());
        report::export_csv(&rows, &path)?;
        println!("Report saved as {}", path.display());
    }
    Ok(())
}

fn handle_students(config: &Config, json: bool) -> Result<()> {
    let storage = open_storage(config)?;
    let students = StudentRegistry::new(&storage, &config.registry)?.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&students)?);
    } else if students.is_empty() {
        println!("No students registered.");
    } else {
        for student in &students {
            println!("{:<12} {}", student.roll_number, student.name);
        }
    }
    Ok(())
}

fn handle_qr(config: &Config, roll_number: &str) -> Result<()> {
    let storage = open_storage(config)?;
    let registry = StudentRegistry::new(&storage, &config.registry)?;
    let path = regenerate_qr(&registry, &QrGenerator::new(&config.qr), roll_number)?;
    println!("QR code saved as {}", path.display());
    Ok(())
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let storage = open_storage(config)?;
    let stats = storage.stats()?;

    if json {
        let status = serde_json::json!({
            "database_path": storage.path(),
            "qr_output_dir": config.qr.output_dir,
            "stats": stats,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("qrattend status");
        println!("---------------");
        println!("Database:      {}", storage.path().display());
        println!("QR codes:      {}", config.qr.output_dir.display());
        println!("Students:      {}", stats.students);
        println!("Attendance:    {}", stats.attendance_records);
        println!(
            "Last scan day: {}",
            stats.last_date.as_deref().unwrap_or("never")
        );
        println!("Size:          {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

fn handle_config(
    config: &Config,
    config_path: Option<std::path::PathBuf>,
    cmd: ConfigCommand,
) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Registry]");
                println!(
                    "  Roll number format: {}",
                    config.registry.roll_number_pattern
                );
                println!();
                println!("[QR]");
                println!("  Output directory:   {}", config.qr.output_dir.display());
                println!("  Module size (px):   {}", config.qr.module_size);
                println!("  Quiet zone:         {}", config.qr.quiet_zone);
                println!();
                println!("[Scan]");
                println!("  Extensions:         {}", config.scan.extensions.join(", "));
                println!("  Report unknown:     {}", config.scan.report_unknown);
                println!();
                println!("[Report]");
                println!(
                    "  Output path:        {}",
                    config.report.output_path.display()
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
