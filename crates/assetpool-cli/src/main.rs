mod cli;
mod commands;
mod config;
mod shutdown;

use anyhow::{Context, Result};
use assetpool::{MemoryReader, ProcessHandle};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::commands::export::ExportTarget;
use crate::config::TargetConfig;
use crate::shutdown::ShutdownSignal;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("assetpool=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match TargetConfig::load(&cli.config) {
        Ok(c) => {
            info!("Loaded config from {:?}", cli.config);
            c
        }
        Err(e) => {
            warn!("Failed to load config: {:#}, using defaults", e);
            TargetConfig::default()
        }
    };
    let registry = config.registry()?;

    let process = match cli.pid {
        Some(pid) => ProcessHandle::open(pid),
        None => ProcessHandle::find_and_open(&config.process_name),
    }
    .with_context(|| format!("Failed to attach to {}", config.process_name))?;
    info!(
        "Attached to pid {} (base: {:#x})",
        process.pid, process.base_address
    );

    let reader = MemoryReader::new(&process);
    let base_address = process.base_address;

    match cli.command {
        Command::Pools(selection) => {
            let schemas = commands::select(&registry, &selection)?;
            commands::pools::run(&reader, base_address, &config.pool_table, &schemas)
        }
        Command::List { selection, json } => {
            let schemas = commands::select(&registry, &selection)?;
            commands::list::run(&reader, base_address, &config.pool_table, &schemas, json)
        }
        Command::Export {
            selection,
            format,
            output,
        } => {
            let schemas = commands::select(&registry, &selection)?;
            let shutdown = ShutdownSignal::install()?;
            let target = ExportTarget {
                base_address,
                table: &config.pool_table,
                output_dir: &config.output_dir,
            };
            commands::export::run(
                &reader,
                &target,
                &schemas,
                format,
                output.as_deref(),
                &shutdown,
            )
            .map(|_| ())
        }
    }
}
