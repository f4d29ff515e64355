//! Command handlers and session assembly.

use clocktower_core::diagram::mermaid;
use clocktower_core::{
    ClocktowerConfig, GameSession, SessionController, Stage, TransitionTable, Variant,
};
use clocktower_effects::{EffectRouter, HomeAssistant, MediaPlayer, SmartThingsLights};
use clocktower_panel::{
    available_ports, MemoryLink, PanelSession, PanelSettings, PanelTiming,
};
use tracing::{info, warn};

use crate::cli::{Cli, PanelChoice};
use crate::repl::Repl;

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// `clocktower ports`
pub fn cmd_ports() -> Result<()> {
    let ports = available_ports()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        for port in ports {
            println!("{}", port);
        }
    }
    Ok(())
}

/// `clocktower diagram`
pub fn cmd_diagram(variant: Variant) -> Result<()> {
    println!("{}", mermaid(&TransitionTable::new(variant.options())));
    Ok(())
}

/// `clocktower run`: assemble a session from configuration and drive it.
pub fn cmd_run(cli: &Cli) -> Result<()> {
    let mut config = ClocktowerConfig::from_env()?;
    cli.apply(&mut config);

    let history_path = match config.ensure_state_dir() {
        Ok(_) => Some(config.history_path()),
        Err(e) => {
            warn!(error = %e, "state directory unavailable, history disabled");
            None
        }
    };
    let mut repl = Repl::new(history_path)?;

    let (panel, dry_run_link) = match cli.panel_choice(&config) {
        PanelChoice::Port(port) => (open_serial(&port), None),
        PanelChoice::Prompt => {
            let ports = available_ports().unwrap_or_default();
            match repl.choose_port(&ports)? {
                Some(port) => (open_serial(&port), None),
                None => (None, None),
            }
        }
        PanelChoice::DryRun => {
            let link = MemoryLink::new();
            let panel = PanelSession::new(
                Box::new(link.clone()),
                &PanelSettings::default(),
                PanelTiming::immediate(),
            )?;
            (Some(panel), Some(link))
        }
        PanelChoice::None => (None, None),
    };

    let effects = build_effects(&config)?;
    let stage = Stage::new(Box::new(effects), panel);
    let mut controller = SessionController::new(GameSession::new(config.variant.options(), stage));

    repl.run(&mut controller, dry_run_link.as_ref())?;
    Ok(())
}

/// Open the panel, or report why not and carry on without it.
fn open_serial(port: &str) -> Option<PanelSession> {
    match PanelSession::open(port, &PanelSettings::default(), PanelTiming::default()) {
        Ok(panel) => {
            println!("Connected to panel on {}", port);
            Some(panel)
        }
        Err(e) => {
            eprintln!("Could not open panel on {}: {}", port, e);
            eprintln!("Continuing without the panel.");
            None
        }
    }
}

/// Register an effect adapter for every configured service.
pub fn build_effects(config: &ClocktowerConfig) -> Result<EffectRouter> {
    let mut router = EffectRouter::new();

    if let Some(ha) = &config.home_assistant {
        router.push(Box::new(HomeAssistant::connect(&ha.url, &ha.token)?));
        if let Some(entity) = &ha.media_player {
            router.push(Box::new(MediaPlayer::connect(&ha.url, &ha.token, entity)?));
        }
    }

    if let Some(st) = &config.smartthings {
        router.push(Box::new(SmartThingsLights::new(
            &st.token,
            st.device_ids.clone(),
            st.timeout,
        )?));
    }

    if router.is_empty() {
        warn!("no effect services configured; lights and sound are disabled");
    } else {
        info!(dispatchers = ?router.names(), "effects ready");
    }
    Ok(router)
}
