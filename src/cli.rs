use anyhow::{Context, Result};
use cellcalc_core::storage;
use cellcalc_core::{
    Backend, CellcalcError, Expansion, PutOutcome, ResolvedExpression, Sheet, WolframSolver,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;
use crate::telemetry;

#[derive(Parser, Debug)]
#[command(name = "cellcalc", version, about = "Store formula cells and compute their values")]
pub struct Cli {
    /// Config file (default: <config_dir>/cellcalc/config.toml)
    #[arg(long, global = true, env = "CELLCALC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Storage backend: memory, sqlite or firebase
    #[arg(long, global = true)]
    pub backend: Option<Backend>,

    /// Database file for the sqlite backend
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or overwrite a cell
    Put { id: String, formula: String },
    /// Compute a cell's value
    Get {
        id: String,
        /// Print the resolved expression instead of evaluating it
        #[arg(long)]
        expression: bool,
    },
    /// Print the fully expanded expression for a cell
    Resolve { id: String },
    /// Delete a cell
    Delete { id: String },
    /// List all cell ids
    List,
    /// Delete every cell
    Reset,
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        let mut config = if self.no_config {
            Config::default()
        } else {
            Config::load(self.config.as_deref())?
        };
        config.apply_env(|name| std::env::var(name).ok());
        if let Some(backend) = self.backend {
            config.store.backend = backend;
        }
        if let Some(path) = &self.database {
            config.store.path = path.clone();
        }
        Ok(config)
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.load_config()?;
    telemetry::init(cli.verbose, &config.logging);

    let store = storage::open(&config.store)
        .with_context(|| format!("opening {} cell store", config.store.backend))?;
    let mut sheet = Sheet::new(store).with_options(config.resolver);

    match cli.command {
        Command::Put { id, formula } => {
            let report = sheet.put(&id, &formula)?;
            match report.outcome {
                PutOutcome::Created => println!("Created {}", id),
                PutOutcome::Updated => println!("Updated {}", id),
            }
            if let Some(cycle) = report.cycle {
                eprintln!("Warning: reference cycle {}", cycle.join(" -> "));
            }
        }
        Command::Get { id, expression } => {
            let resolved = resolve_checked(&sheet, &id)?;
            if expression {
                println!("{}", resolved.expression);
            } else {
                let solver = WolframSolver::new(&config.solver)?;
                sheet = sheet.with_evaluator(Box::new(solver));
                let reading = sheet.evaluate(resolved)?;
                println!("{}", reading.value);
            }
        }
        Command::Resolve { id } => {
            println!("{}", resolve_checked(&sheet, &id)?.expression);
        }
        Command::Delete { id } => {
            if !sheet.delete(&id)? {
                return Err(CellcalcError::NotFound(id).into());
            }
            println!("Deleted {}", id);
        }
        Command::List => {
            for id in sheet.list()? {
                println!("{}", id);
            }
        }
        Command::Reset => {
            sheet.reset()?;
            println!("Cleared all cells");
        }
    }
    Ok(())
}

fn resolve_checked(sheet: &Sheet, id: &str) -> Result<ResolvedExpression> {
    let resolved = sheet.resolve(id)?;
    if resolved.expansion == Expansion::Capped {
        eprintln!(
            "Warning: expansion of {} stopped after {} substitutions; unresolved references were set to 0",
            resolved.id, resolved.substitutions
        );
    }
    Ok(resolved)
}

/// Process exit status for an error returned by [`run`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<CellcalcError>() {
        Some(e) if e.is_not_found() => 2,
        _ => 1,
    }
}
