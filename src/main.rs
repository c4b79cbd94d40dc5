use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sdo_consolidate::config::{Config, DEFAULT_DOCUMENT};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Consolidate syntax-directed operations defined across many clauses
/// into one clause per operation, one git commit per operation
#[derive(Parser, Debug)]
#[command(name = "sdo-consolidate", version)]
struct Args {
    /// Document to rewrite in place
    #[arg(value_name = "PATH", default_value = DEFAULT_DOCUMENT)]
    document: PathBuf,

    /// Rewrite without committing after each operation
    #[arg(long)]
    no_commit: bool,

    /// Consolidate at most one operation
    #[arg(long)]
    once: bool,

    /// Print the operations that would be consolidated and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config {
        document: args.document,
        commit: !args.no_commit,
        max_steps: args.once.then_some(1),
    };

    if args.list {
        let groups = sdo_consolidate::report(&config)
            .with_context(|| format!("could not plan {}", config.document.display()))?;
        for group in &groups {
            println!("{} ({} clauses)", group.operation, group.len());
        }
        return Ok(());
    }

    let consolidated = sdo_consolidate::run(&config)
        .with_context(|| format!("could not consolidate {}", config.document.display()))?;
    for operation in &consolidated {
        println!("Rewrote {operation}");
    }
    if config.max_steps.is_none() || consolidated.is_empty() {
        println!("out of clauses!");
    }
    Ok(())
}
