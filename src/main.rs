//! cellcalc - formula cell store with recursive reference resolution

mod cli;
mod config;
mod telemetry;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(e) = cli::run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(cli::exit_code(&e));
    }
}
