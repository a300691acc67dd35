//! qioboot - SPI flash quad I/O enablement
//!
//! Host-side front end for the boot-stage quad I/O enable sequence. The
//! sequence itself lives in `qioboot-core` and runs here against the
//! simulated controller from `qioboot-dummy`, which makes it possible to see
//! exactly which flash commands a given chip would receive at boot.

mod cli;
mod commands;
mod config;

use clap::Parser;
use cli::{Cli, Commands};
use config::SimConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger, verbosity raises the default filter
    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Enable(args) => {
            let config = SimConfig::from_args(&args)?;
            commands::run_enable(&config)
        }
        Commands::Lookup { mfg_id, device_id } => {
            commands::run_lookup(mfg_id, device_id);
            Ok(())
        }
        Commands::ListChips => {
            commands::list_chips();
            Ok(())
        }
    }
}
