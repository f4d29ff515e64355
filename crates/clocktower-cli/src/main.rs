//! Clocktower CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use clocktower_cli::cli::{Cli, Commands};
use clocktower_cli::commands;
use clocktower_core::config::load_env_files;
use clocktower_core::ClocktowerConfig;

fn main() {
    // Credentials and ports usually live in .env.local
    load_env_files();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));
    fmt().with_env_filter(filter).with_target(false).init();

    let result = match cli.command {
        Some(Commands::Ports) => commands::cmd_ports(),
        Some(Commands::Diagram) => {
            let variant = match cli.variant {
                Some(variant) => Ok(variant),
                None => ClocktowerConfig::from_env().map(|c| c.variant),
            };
            match variant {
                Ok(variant) => commands::cmd_diagram(variant),
                Err(e) => Err(e.into()),
            }
        }
        Some(Commands::Run) | None => commands::cmd_run(&cli),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
