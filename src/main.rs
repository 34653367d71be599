//! Spec relay CLI
//!
//! Replays recorded suite/spec callbacks as normalized reporter events and
//! cleans up stack traces from failed test runs.

use clap::Parser;
use relay::commands::Commands;
use relay::{cli, common};

#[derive(Parser)]
#[command(name = "relay", about = "Normalize test lifecycle callbacks into reporter events")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    match cli::dispatch(cli.command) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
