//! `qrattend` - CLI for the QR attendance tracker
//!
//! This binary runs the console menu or terminal dashboard, and offers
//! one-shot commands for scanning, logging and listing attendance.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::warn;

use qrattend::cli::{Cli, Command, ConfigCommand, OutputFormat};
use qrattend::frontend::{run_dashboard, ConsoleMenu};
use qrattend::{
    init_logging, AttendanceRecord, AttendanceService, AttendanceStore, Config, Controller,
    StorageBackend,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbosity = match cli.command {
        Command::Dashboard => cli.verbosity().for_dashboard(),
        _ => cli.verbosity(),
    };
    init_logging(verbosity);

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Menu => handle_menu(&config),
        Command::Dashboard => handle_dashboard(&config),
        Command::Scan(cmd) => handle_scan(&config, cmd.source.as_deref()),
        Command::Log(cmd) => handle_log(&config, &cmd.student_id),
        Command::List(cmd) => handle_list(&config, cmd.format),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_menu(config: &Config) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config);
    let mut menu = ConsoleMenu::new(io::stdin().lock(), io::stdout().lock());
    menu.run(&mut controller)?;
    Ok(())
}

fn handle_dashboard(config: &Config) -> anyhow::Result<()> {
    let mut controller = Controller::from_config(config);
    run_dashboard(&mut controller).context("dashboard failed")?;
    Ok(())
}

fn connected_service(
    config: &Config,
) -> anyhow::Result<AttendanceService<Box<dyn AttendanceStore>>> {
    if config.storage.backend == StorageBackend::Memory {
        warn!("memory backend selected; records are discarded when this command exits");
    }
    let mut service = AttendanceService::from_config(config);
    service.connect().context("failed to connect attendance store")?;
    Ok(service)
}

fn handle_scan(config: &Config, source: Option<&str>) -> anyhow::Result<()> {
    let scanner = qrattend::scanner::build_scanner(config.scanner.backend);
    let source = source.unwrap_or(config.scanner.sample_source.as_str());

    let mut service = connected_service(config)?;
    let record = service
        .scan_and_log(&*scanner, source)
        .with_context(|| format!("failed to log scan of {source}"))?;
    println!("Logged: {record}");
    service.close()?;
    Ok(())
}

fn handle_log(config: &Config, student_id: &str) -> anyhow::Result<()> {
    let mut service = connected_service(config)?;
    let record = service
        .log(student_id)
        .with_context(|| format!("failed to log {student_id}"))?;
    println!("Logged: {record}");
    service.close()?;
    Ok(())
}

fn handle_list(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let records = AttendanceService::from_config(config)
        .list()
        .context("failed to read attendance records")?;

    match format {
        OutputFormat::Plain => {
            for record in &records {
                println!("{record}");
            }
        }
        OutputFormat::Table => print_table(&records),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
    }
    Ok(())
}

fn print_table(records: &[AttendanceRecord]) {
    let width = records
        .iter()
        .map(|r| r.student_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("Student ID".len());

    println!("{:>5}  {:<width$}  {:<8}  Timestamp", "Id", "Student ID", "Status");
    println!("{}", "-".repeat(5 + 2 + width + 2 + 8 + 2 + 23));
    for record in records {
        let id = record.id.map_or_else(|| "-".to_string(), |id| id.to_string());
        println!(
            "{:>5}  {:<width$}  {:<8}  {}",
            id,
            record.student_id,
            record.status.as_str(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!();
    println!("{} record(s)", records.len());
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Backend:            {}", config.storage.backend);
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Scanner]");
                println!("  Backend:            {}", config.scanner.backend);
                println!("  Sample source:      {}", config.scanner.sample_source);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path)).context("configuration is invalid")?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
