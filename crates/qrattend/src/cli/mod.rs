//! Command-line interface for qrattend.
//!
//! This module provides the CLI structure for the `qrattend` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, ListCommand, LogCommand, OutputFormat, ScanCommand};

/// qrattend - Log attendance from scanned QR codes
///
/// Scans student QR codes, records each scan as PRESENT with a timestamp,
/// and lists the records back from memory or a SQLite database.
#[derive(Debug, Parser)]
#[command(name = "qrattend")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// Run the numbered console menu
    Menu,

    /// Run the full-screen terminal dashboard
    Dashboard,

    /// Scan a source and log the decoded student
    Scan(ScanCommand),

    /// Log a student as present without scanning
    Log(LogCommand),

    /// List attendance records
    List(ListCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
