//! One live game session.

use clocktower_models::{GamePhase, Team};
use clocktower_panel::{ModeAction, PanelMode};
use tracing::info;

use crate::actions::{action_surface, available_actions, declared_actions, ActionEntry};
use crate::{
    MachineOptions, PhaseEvent, PhaseMachine, Result, SessionError, Stage, StageAction,
    TransitionTable,
};

/// A game session: the phase machine and the stage it drives.
///
/// Constructed once per game and owned by the driving loop.
#[derive(Debug)]
pub struct GameSession {
    options: MachineOptions,
    machine: PhaseMachine<Stage>,
    stage: Stage,
}

impl GameSession {
    /// Create a session and run the initial phase's entry hook.
    pub fn new(options: MachineOptions, stage: Stage) -> Self {
        let machine = PhaseMachine::new(TransitionTable::new(options), Stage::hooks(options));
        let mut session = Self {
            options,
            machine,
            stage,
        };
        session.machine.activate(&mut session.stage);
        info!(phase = %session.phase(), "session started");
        session
    }

    pub fn phase(&self) -> GamePhase {
        self.machine.current()
    }

    pub fn options(&self) -> MachineOptions {
        self.options
    }

    pub fn table(&self) -> &TransitionTable {
        self.machine.table()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// The numbered menu for the current phase.
    pub fn actions(&self) -> Vec<ActionEntry> {
        action_surface(
            self.machine.table(),
            self.options,
            self.phase(),
            self.stage.has_panel(),
        )
    }

    /// Fire a phase event.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IllegalTransition` if the event is not legal
    /// from the current phase.
    pub fn fire(&mut self, event: PhaseEvent) -> Result<GamePhase> {
        self.machine.fire(event, &mut self.stage)
    }

    /// Fire a phase event by name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownAction` for an unrecognised name, or
    /// the error of [`GameSession::fire`].
    pub fn fire_named(&mut self, name: &str) -> Result<GamePhase> {
        let event: PhaseEvent = name.parse()?;
        self.fire(event)
    }

    /// Run a non-transitioning action listed for the current phase.
    ///
    /// `player` is required by the `mark_*` actions and ignored by the rest.
    ///
    /// # Errors
    ///
    /// - `SessionError::ActionUnavailable` if the phase does not list it
    /// - `SessionError::NoPanel` for panel actions without a panel
    /// - `SessionError::MissingPlayer` when a player id is needed
    /// - `SessionError::Panel` when the panel rejects or fails the command
    pub fn run_action(&mut self, action: StageAction, player: Option<usize>) -> Result<()> {
        let phase = self.phase();
        if !declared_actions(self.options, phase).contains(&action) {
            return Err(SessionError::ActionUnavailable {
                action: action.to_string(),
                phase,
            });
        }
        if action.needs_panel() && !self.stage.has_panel() {
            return Err(SessionError::NoPanel);
        }
        if action.needs_player() && player.is_none() {
            return Err(SessionError::MissingPlayer(action.to_string()));
        }

        info!(action = %action, phase = %phase, "running action");
        match action {
            StageAction::SetEdition(edition) => self.stage.set_edition(edition),
            StageAction::StopAllAudio => self.stage.stop_all_audio(),
            StageAction::GoodWins => self.stage.declare_winner(Team::Good),
            StageAction::EvilWins => self.stage.declare_winner(Team::Evil),
            _ => {
                let panel = self.stage.panel_mut().ok_or(SessionError::NoPanel)?;
                match (action, player) {
                    (StageAction::ConfigurePanel, _) => panel.begin_configuration()?,
                    (StageAction::KillPlayer, _) => panel.begin_kill()?,
                    (StageAction::RevivePlayer, _) => panel.begin_revive()?,
                    (StageAction::NominationConfig, _) => panel.begin_nomination_config()?,
                    (StageAction::MarkDead, Some(id)) => panel.mark_dead(id)?,
                    (StageAction::MarkAlive, Some(id)) => panel.mark_alive(id)?,
                    (StageAction::MarkDeadVoteUsed, Some(id)) => panel.mark_dead_vote_used(id)?,
                    (other, _) => return Err(SessionError::MissingPlayer(other.to_string())),
                }
            }
        }
        Ok(())
    }

    /// Run a non-transitioning action by name.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownAction` for an unrecognised name, or
    /// the error of [`GameSession::run_action`].
    pub fn run_named_action(&mut self, name: &str, player: Option<usize>) -> Result<()> {
        let action: StageAction = name.parse()?;
        self.run_action(action, player)
    }

    /// Actions offered now, after capability filtering.
    pub fn available_actions(&self) -> Vec<StageAction> {
        available_actions(self.options, self.phase(), self.stage.has_panel())
    }

    /// Panel sub-mode, `Idle` without a panel.
    pub fn panel_mode(&self) -> PanelMode {
        self.stage.panel_mode()
    }

    /// Run one operation of the panel's current sub-mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPanel` or the panel's own error.
    pub fn panel_action(&mut self, action: ModeAction) -> Result<PanelMode> {
        let panel = self.stage.panel_mut().ok_or(SessionError::NoPanel)?;
        Ok(panel.perform(action)?)
    }
}
