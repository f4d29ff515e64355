//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clocktower_core::config::STATE_DIR_ENV;
use clocktower_core::{ClocktowerConfig, Variant};

/// Version with git hash and build date, e.g. "0.2.0 (abc1234, 2026-10-19)".
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

fn parse_variant(s: &str) -> Result<Variant, String> {
    s.parse::<Variant>().map_err(|e| e.to_string())
}

/// Clocktower - game session orchestrator for lights, sound and the status panel
#[derive(Parser, Debug)]
#[command(name = "clocktower")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = STATE_DIR_ENV, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Serial port of the status panel
    #[arg(short, long)]
    pub port: Option<String>,

    /// Machine variant (full or reduced)
    #[arg(long, value_parser = parse_variant, global = true)]
    pub variant: Option<Variant>,

    /// Rehearse without hardware: panel commands are printed, not sent
    #[arg(long, conflicts_with_all = ["port", "no_panel"])]
    pub dry_run: bool,

    /// Run without a status panel
    #[arg(long)]
    pub no_panel: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run a game session (the default)
    Run,

    /// List serial ports
    Ports,

    /// Print the phase machine as a Mermaid state diagram
    Diagram,
}

/// How the session reaches the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelChoice {
    /// Open this serial port.
    Port(String),
    /// Ask the operator, from the list of available ports.
    Prompt,
    /// In-memory panel for rehearsal.
    DryRun,
    None,
}

impl Cli {
    /// Apply command-line overrides on top of environment configuration.
    pub fn apply(&self, config: &mut ClocktowerConfig) {
        if let Some(dir) = &self.state_dir {
            config.state_dir = dir.clone();
        }
        if let Some(port) = &self.port {
            config.panel_port = Some(port.clone());
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
    }

    pub fn panel_choice(&self, config: &ClocktowerConfig) -> PanelChoice {
        if self.no_panel {
            PanelChoice::None
        } else if self.dry_run {
            PanelChoice::DryRun
        } else {
            match &config.panel_port {
                Some(port) => PanelChoice::Port(port.clone()),
                None => PanelChoice::Prompt,
            }
        }
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["clocktower"]);
        assert!(cli.command.is_none());
        assert!(!cli.dry_run);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_cli_parse_subcommands() {
        let cli = Cli::parse_from(["clocktower", "ports"]);
        assert_eq!(cli.command, Some(Commands::Ports));

        let cli = Cli::parse_from(["clocktower", "diagram", "--variant", "reduced"]);
        assert_eq!(cli.command, Some(Commands::Diagram));
        assert_eq!(cli.variant, Some(Variant::Reduced));
    }

    #[test]
    fn test_cli_rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["clocktower", "--variant", "deluxe"]).is_err());
    }

    #[test]
    fn test_dry_run_conflicts_with_port() {
        assert!(Cli::try_parse_from(["clocktower", "--dry-run", "--port", "/dev/ttyACM0"]).is_err());
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let cli = Cli::parse_from([
            "clocktower",
            "--port",
            "/dev/ttyUSB1",
            "--variant",
            "reduced",
            "--state-dir",
            "/tmp/ct",
        ]);
        let mut config = ClocktowerConfig::default();
        cli.apply(&mut config);

        assert_eq!(config.panel_port.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.variant, Variant::Reduced);
        assert_eq!(config.state_dir, PathBuf::from("/tmp/ct"));
        assert_eq!(
            cli.panel_choice(&config),
            PanelChoice::Port("/dev/ttyUSB1".into())
        );
    }

    #[test]
    fn test_panel_choice() {
        let config = ClocktowerConfig::default();
        let cli = Cli::parse_from(["clocktower"]);
        assert_eq!(cli.panel_choice(&config), PanelChoice::Prompt);

        let cli = Cli::parse_from(["clocktower", "--no-panel"]);
        assert_eq!(cli.panel_choice(&config), PanelChoice::None);

        let cli = Cli::parse_from(["clocktower", "--dry-run"]);
        assert_eq!(cli.panel_choice(&config), PanelChoice::DryRun);
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["clocktower", "-vv"]);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_cli_help() {
        Cli::command().debug_assert();
    }
}
