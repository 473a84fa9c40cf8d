//! Binary crate for the `fetchdemo` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Driving a fetch controller and printing each state it publishes
//! - Interactive configuration

use clap::Parser;

mod cli;
mod render;
mod telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    telemetry::init(cmd.verbose);
    cmd.run().await
}
