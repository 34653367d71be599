//! CLI command definitions
//!
//! Defines the clap commands for the relay CLI.

use clap::Subcommand;
use std::path::PathBuf;

use crate::common::config::OutputFormat;

#[derive(Subcommand)]
pub enum Commands {
    /// Replay a recorded callback sequence and print the normalized events
    Replay {
        /// Path to the YAML scenario
        scenario: PathBuf,

        /// Worker id stamped on events (overrides scenario and config)
        #[arg(long)]
        cid: Option<String>,

        /// Keep noise lines in failure stack traces
        #[arg(long)]
        no_clean_stack: bool,

        /// Output format (default from config, else json)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Remove noise lines from a stack trace
    CleanStack {
        /// File holding the trace (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Merge a failed command's stack trace into the trace saved at its call site
    MergeStack {
        /// File holding the call-site trace
        #[arg(long)]
        saved: PathBuf,

        /// File holding the command-site trace
        #[arg(long)]
        command: Option<PathBuf>,

        /// Error name for the command-site error
        #[arg(long, default_value = "Error")]
        name: String,

        /// Error message for the command-site error
        #[arg(long, short)]
        message: Option<String>,
    },
}
