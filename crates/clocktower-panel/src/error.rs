//! Error types for panel operations.

use thiserror::Error;

use crate::mode::{ModeAction, PanelMode};

/// Errors that can occur while driving the panel.
#[derive(Error, Debug)]
pub enum PanelError {
    /// Explicit player selection outside `[0, player_count)`. Nothing was sent.
    #[error("player index {index} is out of range (0..{player_count})")]
    InvalidPlayerIndex { index: usize, player_count: usize },

    /// A sub-mode was requested while another one is still active.
    #[error("panel is busy in {0} mode")]
    Busy(PanelMode),

    /// The action does not exist in the current sub-mode. Nothing was sent.
    #[error("'{action}' is not available in {mode} mode")]
    UnsupportedAction { action: ModeAction, mode: PanelMode },

    /// Configuration tried to register more devices than the panel supports.
    #[error("panel supports at most {0} players")]
    RosterFull(usize),

    /// Failed to open or query the serial port.
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error on the link.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a wire line.
    #[error("parse error: {0}")]
    ParseError(String),
}

/// Result type alias for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;
