//! The serial conversation with the status panel.

use std::thread;

use clocktower_models::Team;
use tracing::{debug, info, warn};

use crate::link::{PanelLink, SerialLink};
use crate::{
    ModeAction, PanelCommand, PanelError, PanelMode, PanelSettings, PanelTiming, PlayerCursor,
    Result,
};

/// Longest unterminated inbound line kept; beyond this it is flushed as a
/// line of its own.
pub const MAX_LINE_BYTES: usize = 1024;

/// Owns the command/response exchange with one panel.
///
/// Strictly single-threaded: a command is written, then (where the protocol
/// calls for it) the session sleeps for the settle delay and drains every
/// buffered line. Responses are never matched to commands.
pub struct PanelSession {
    link: Box<dyn PanelLink>,
    timing: PanelTiming,
    max_players: usize,
    mode: PanelMode,
    cursor: PlayerCursor,
    /// Bytes of an incomplete inbound line.
    partial: Vec<u8>,
    /// Drained lines not yet collected by the caller.
    responses: Vec<String>,
}

impl std::fmt::Debug for PanelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelSession")
            .field("mode", &self.mode)
            .field("cursor", &self.cursor)
            .field("max_players", &self.max_players)
            .field("pending_responses", &self.responses.len())
            .finish()
    }
}

impl PanelSession {
    /// Create a session over an existing link.
    ///
    /// Anything already buffered on the link is drained first. The roster
    /// starts at `settings.max_players` until configuration says otherwise.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::Io` if the initial drain fails.
    pub fn new(
        link: Box<dyn PanelLink>,
        settings: &PanelSettings,
        timing: PanelTiming,
    ) -> Result<Self> {
        let mut session = Self {
            link,
            timing,
            max_players: settings.max_players,
            mode: PanelMode::Idle,
            cursor: PlayerCursor::new(settings.max_players),
            partial: Vec::new(),
            responses: Vec::new(),
        };
        session.drain()?;
        Ok(session)
    }

    /// Open a serial port and create a session on it.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::Serial` if the port cannot be opened.
    pub fn open(port_name: &str, settings: &PanelSettings, timing: PanelTiming) -> Result<Self> {
        let link = SerialLink::open(port_name, settings)?;
        info!(port = %port_name, "panel connected");
        Self::new(Box::new(link), settings, timing)
    }

    pub fn mode(&self) -> PanelMode {
        self.mode
    }

    pub fn cursor(&self) -> PlayerCursor {
        self.cursor
    }

    /// Number of configured players.
    pub fn player_count(&self) -> usize {
        self.cursor.player_count()
    }

    pub fn timing(&self) -> PanelTiming {
        self.timing
    }

    /// Returns and clears every response line drained so far.
    pub fn take_responses(&mut self) -> Vec<String> {
        std::mem::take(&mut self.responses)
    }

    // ==================== Wire ====================

    /// Write one command. No drain.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::Io` if the link write fails.
    pub fn send(&mut self, command: PanelCommand) -> Result<()> {
        let line = command.to_line();
        debug!(command = %line, "sending panel command");
        self.link.write_line(&line)?;
        Ok(())
    }

    /// Wait for the settle delay, then collect every complete line the panel
    /// has printed.
    ///
    /// Lines are right-trimmed, logged, and also kept for [`take_responses`].
    /// A trailing partial line stays buffered until its terminator arrives,
    /// unless it grows past [`MAX_LINE_BYTES`].
    ///
    /// [`take_responses`]: PanelSession::take_responses
    pub fn drain(&mut self) -> Result<Vec<String>> {
        if !self.timing.settle_delay.is_zero() {
            thread::sleep(self.timing.settle_delay);
        }

        loop {
            let chunk = self.link.read_available()?;
            if chunk.is_empty() {
                break;
            }
            self.partial.extend_from_slice(&chunk);
        }

        let mut lines = Vec::new();
        while let Some(pos) = self.partial.iter().position(|b| *b == b'\n') {
            let raw: Vec<u8> = self.partial.drain(..=pos).collect();
            push_line(&mut lines, &raw);
        }
        if self.partial.len() >= MAX_LINE_BYTES {
            warn!(bytes = self.partial.len(), "unterminated panel output, flushing");
            let raw = std::mem::take(&mut self.partial);
            push_line(&mut lines, &raw);
        }

        self.responses.extend(lines.iter().cloned());
        Ok(lines)
    }

    fn send_and_drain(&mut self, command: PanelCommand) -> Result<()> {
        self.send(command)?;
        self.drain()?;
        Ok(())
    }

    // ==================== One-shot Signals ====================

    /// Session start; also used to restart the panel for a new game.
    pub fn signal_start(&mut self) -> Result<()> {
        self.send(PanelCommand::Start)
    }

    pub fn signal_day(&mut self) -> Result<()> {
        self.send(PanelCommand::Day)
    }

    pub fn signal_night(&mut self) -> Result<()> {
        self.send(PanelCommand::Night)
    }

    pub fn signal_pre_reveal(&mut self) -> Result<()> {
        self.send(PanelCommand::PreReveal)
    }

    pub fn signal_end_game(&mut self) -> Result<()> {
        self.send(PanelCommand::EndGame)
    }

    /// Switch the panel display off.
    pub fn signal_off(&mut self) -> Result<()> {
        self.send(PanelCommand::Off)
    }

    pub fn declare_winner(&mut self, team: Team) -> Result<()> {
        match team {
            Team::Good => self.send(PanelCommand::GoodWins),
            Team::Evil => self.send(PanelCommand::EvilWins),
        }
    }

    /// Mark a player dead by id.
    ///
    /// # Errors
    ///
    /// Returns `PanelError::InvalidPlayerIndex` without sending anything if
    /// `id` is not on the roster.
    pub fn mark_dead(&mut self, id: usize) -> Result<()> {
        self.cursor.validate(id)?;
        self.send(PanelCommand::Dead(Some(id)))
    }

    /// Mark a player alive by id. Validated like [`PanelSession::mark_dead`].
    pub fn mark_alive(&mut self, id: usize) -> Result<()> {
        self.cursor.validate(id)?;
        self.send(PanelCommand::Alive(Some(id)))
    }

    /// Mark a dead player's last vote as used. Validated like [`PanelSession::mark_dead`].
    pub fn mark_dead_vote_used(&mut self, id: usize) -> Result<()> {
        self.cursor.validate(id)?;
        self.send(PanelCommand::DeadVoteUsed(Some(id)))
    }

    // ==================== Sub-modes ====================

    fn ensure_idle(&self) -> Result<()> {
        if self.mode.is_idle() {
            Ok(())
        } else {
            Err(PanelError::Busy(self.mode))
        }
    }

    /// Enter device configuration. The configured count starts from zero.
    pub fn begin_configuration(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.send_and_drain(PanelCommand::StartConfig)?;
        self.mode = PanelMode::Configuration { configured: 0 };
        info!("panel configuration started");
        Ok(())
    }

    pub fn begin_kill(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.send_and_drain(PanelCommand::StartKill)?;
        self.mode = PanelMode::Kill;
        Ok(())
    }

    pub fn begin_revive(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.send_and_drain(PanelCommand::StartRevive)?;
        self.mode = PanelMode::Revive;
        Ok(())
    }

    /// Enter nomination configuration with the cursor back on player 0.
    pub fn begin_nomination_config(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.send(PanelCommand::StartNominationConfig)?;
        self.cursor.reset();
        self.mode = PanelMode::NominationConfig;
        Ok(())
    }

    /// Run one operation in the current sub-mode and return the mode after it.
    ///
    /// Commands are sent before local state changes, so an I/O failure
    /// leaves both the mode and the cursor where they were.
    ///
    /// # Errors
    ///
    /// - `PanelError::UnsupportedAction` if the mode has no such operation
    /// - `PanelError::InvalidPlayerIndex` for an out-of-range `SetPlayer`
    /// - `PanelError::RosterFull` when configuring beyond the panel's slots
    /// - `PanelError::Io` on link failure
    pub fn perform(&mut self, action: ModeAction) -> Result<PanelMode> {
        if !self.mode.accepts(action) {
            return Err(PanelError::UnsupportedAction {
                action,
                mode: self.mode,
            });
        }

        match (self.mode, action) {
            // Configuration
            (PanelMode::Configuration { configured }, ModeAction::SetDevice) => {
                if configured >= self.max_players {
                    return Err(PanelError::RosterFull(self.max_players));
                }
                self.send_and_drain(PanelCommand::SetDevice)?;
                self.mode = PanelMode::Configuration {
                    configured: configured + 1,
                };
            }
            (PanelMode::Configuration { .. }, ModeAction::NextDevice) => {
                self.send_and_drain(PanelCommand::NextDevice)?;
            }
            (PanelMode::Configuration { configured }, ModeAction::EndConfiguration) => {
                self.send_and_drain(PanelCommand::EndConfig)?;
                self.cursor = PlayerCursor::new(configured);
                self.mode = PanelMode::Idle;
                info!(players = configured, "panel configuration complete");
            }

            // Cursor movement, shared by kill, revive and nomination configuration
            (_, ModeAction::NextPlayer) => {
                self.send(PanelCommand::NextPlayer)?;
                self.cursor.advance();
                self.drain()?;
            }
            (_, ModeAction::PreviousPlayer) => {
                self.send(PanelCommand::PreviousPlayer)?;
                self.cursor.retreat();
                self.drain()?;
            }
            (_, ModeAction::SetPlayer(index)) => {
                self.cursor.validate(index)?;
                self.send(PanelCommand::SetPlayer(index))?;
                self.cursor.set(index)?;
                self.drain()?;
            }

            // Kill / revive
            (PanelMode::Kill, ModeAction::MarkCurrent) => {
                self.send_and_drain(PanelCommand::Dead(None))?;
            }
            (PanelMode::Revive, ModeAction::MarkCurrent) => {
                self.send_and_drain(PanelCommand::Alive(None))?;
            }
            (PanelMode::Kill, ModeAction::Cancel) => {
                self.send_and_drain(PanelCommand::EndKill)?;
                self.mode = PanelMode::Idle;
            }
            (PanelMode::Revive, ModeAction::Cancel) => {
                self.send_and_drain(PanelCommand::EndRevive)?;
                self.mode = PanelMode::Idle;
            }

            // Nomination configuration
            (PanelMode::NominationConfig, ModeAction::StartNominations) => {
                self.send(PanelCommand::StartNominations)?;
                self.mode = PanelMode::NominationVoting;
            }
            (PanelMode::NominationConfig, ModeAction::Cancel) => {
                self.send(PanelCommand::EndNominations)?;
                self.mode = PanelMode::Idle;
            }

            // Voting: each vote moves on to the next player
            (PanelMode::NominationVoting, ModeAction::VoteYes) => self.vote(PanelCommand::VoteYes)?,
            (PanelMode::NominationVoting, ModeAction::VoteNo) => self.vote(PanelCommand::VoteNo)?,
            (PanelMode::NominationVoting, ModeAction::VoteSkip) => {
                self.vote(PanelCommand::VoteSkip)?
            }
            (PanelMode::NominationVoting, ModeAction::EndNominations) => {
                self.send(PanelCommand::Day)?;
                // The firmware needs the day signal to settle before the end marker
                thread::sleep(self.timing.nomination_end_pause);
                self.send(PanelCommand::EndNominations)?;
                self.mode = PanelMode::Idle;
                info!("nominations ended");
            }

            (mode, action) => return Err(PanelError::UnsupportedAction { action, mode }),
        }

        Ok(self.mode)
    }

    fn vote(&mut self, command: PanelCommand) -> Result<()> {
        self.send(command)?;
        self.cursor.advance();
        Ok(())
    }
}

fn push_line(lines: &mut Vec<String>, raw: &[u8]) {
    let line = String::from_utf8_lossy(raw).trim_end().to_string();
    if !line.is_empty() {
        debug!(response = %line, "panel");
        lines.push(line);
    }
}
