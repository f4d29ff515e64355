//! Error types for the session core.

use clocktower_models::GamePhase;
use clocktower_panel::PanelError;
use thiserror::Error;

use crate::PhaseEvent;

/// Errors that can occur while driving a game session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The current phase has no edge for this event. The phase is unchanged.
    #[error("cannot {event} during {phase}")]
    IllegalTransition { phase: GamePhase, event: PhaseEvent },

    /// The action or event name is not recognised.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The action exists but is not offered in the current phase.
    #[error("'{action}' is not available during {phase}")]
    ActionUnavailable { action: String, phase: GamePhase },

    /// The action needs a player id and none was given.
    #[error("'{0}' needs a player id")]
    MissingPlayer(String),

    /// The action drives the panel but no panel is connected.
    #[error("no panel connected")]
    NoPanel,

    #[error("panel error: {0}")]
    Panel(#[from] PanelError),

    /// A configuration value could not be understood.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
