//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive city prompt and configuration
//! - Human-friendly output formatting

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.verbose);
    cmd.run().await
}
