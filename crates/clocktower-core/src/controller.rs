//! Turns operator input into session operations.
//!
//! The controller never reads the terminal itself. The driving loop asks it
//! for the current [`Menu`], passes back whatever the operator typed, and
//! renders the [`Outcome`]. Unrecognised input is a no-op.

use clocktower_models::GamePhase;
use clocktower_panel::{MenuChoice, MenuOption, ModeAction, PanelMode};
use tracing::warn;

use crate::actions::{find_entry, ActionEntry, ActionKind};
use crate::{GameSession, SessionError, StageAction};

/// What the operator should be shown next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Menu {
    /// The phase's action surface.
    Phase {
        phase: GamePhase,
        entries: Vec<ActionEntry>,
    },
    /// A panel sub-mode has control until it exits.
    Panel {
        mode: PanelMode,
        options: &'static [MenuOption],
    },
}

/// An operation waiting for a player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPlayer {
    Action(StageAction),
    SetPlayer,
}

/// Result of one submission.
#[derive(Debug)]
pub enum Outcome {
    Transitioned(GamePhase),
    ActionDone(StageAction),
    /// A panel sub-mode operation ran; this is the mode after it.
    PanelStep(PanelMode),
    /// Ask for a player id and call [`SessionController::submit_player`].
    NeedsPlayer(PendingPlayer),
    /// The input matched nothing. State is unchanged.
    Invalid(String),
    /// The operation was attempted and failed.
    Failed(SessionError),
}

/// Dispatches operator input to the session.
#[derive(Debug)]
pub struct SessionController {
    session: GameSession,
}

impl SessionController {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn into_session(self) -> GameSession {
        self.session
    }

    pub fn menu(&self) -> Menu {
        let mode = self.session.panel_mode();
        if mode.is_idle() {
            Menu::Phase {
                phase: self.session.phase(),
                entries: self.session.actions(),
            }
        } else {
            Menu::Panel {
                mode,
                options: mode.menu(),
            }
        }
    }

    /// Handle one line of operator input against the current menu.
    pub fn submit(&mut self, input: &str) -> Outcome {
        let mode = self.session.panel_mode();
        if !mode.is_idle() {
            return match mode.find_option(input) {
                Some(option) => match option.choice {
                    MenuChoice::Action(action) => self.panel_step(action),
                    MenuChoice::PromptPlayer => Outcome::NeedsPlayer(PendingPlayer::SetPlayer),
                },
                None => invalid(input),
            };
        }

        let entries = self.session.actions();
        let Some(entry) = find_entry(&entries, input) else {
            return invalid(input);
        };

        match entry.kind {
            ActionKind::Transition(event) => match self.session.fire(event) {
                Ok(phase) => Outcome::Transitioned(phase),
                Err(e) => failed(e),
            },
            ActionKind::Action(action) if action.needs_player() => {
                Outcome::NeedsPlayer(PendingPlayer::Action(action))
            }
            ActionKind::Action(action) => match self.session.run_action(action, None) {
                Ok(()) => Outcome::ActionDone(action),
                Err(e) => failed(e),
            },
        }
    }

    /// Complete an operation that asked for a player id.
    pub fn submit_player(&mut self, pending: PendingPlayer, input: &str) -> Outcome {
        let Ok(id) = input.trim().parse::<usize>() else {
            return Outcome::Invalid(format!(
                "'{}' is not a player id; expected a non-negative integer",
                input.trim()
            ));
        };

        match pending {
            PendingPlayer::Action(action) => match self.session.run_action(action, Some(id)) {
                Ok(()) => Outcome::ActionDone(action),
                Err(e) => failed(e),
            },
            PendingPlayer::SetPlayer => self.panel_step(ModeAction::SetPlayer(id)),
        }
    }

    /// Everything the panel printed since the last call.
    pub fn panel_output(&mut self) -> Vec<String> {
        self.session.stage_mut().panel_output()
    }

    /// Switch the panel off before exiting.
    pub fn shutdown(&mut self) {
        self.session.stage_mut().shutdown();
    }

    fn panel_step(&mut self, action: ModeAction) -> Outcome {
        match self.session.panel_action(action) {
            Ok(mode) => Outcome::PanelStep(mode),
            Err(e) => failed(e),
        }
    }
}

fn invalid(input: &str) -> Outcome {
    Outcome::Invalid(format!("'{}' is not an option", input.trim()))
}

fn failed(e: SessionError) -> Outcome {
    warn!(error = %e, "operation failed");
    Outcome::Failed(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MachineOptions, Stage};

    fn controller() -> SessionController {
        SessionController::new(GameSession::new(MachineOptions::full(), Stage::bare()))
    }

    #[test]
    fn test_unrecognised_input_changes_nothing() {
        let mut c = controller();
        let before = c.menu();
        assert!(matches!(c.submit("99"), Outcome::Invalid(_)));
        assert!(matches!(c.submit(""), Outcome::Invalid(_)));
        assert_eq!(c.menu(), before);
    }

    #[test]
    fn test_number_fires_transition() {
        let mut c = controller();
        assert!(matches!(
            c.submit("1"),
            Outcome::Transitioned(GamePhase::PreGame)
        ));
        match c.menu() {
            Menu::Phase { phase, entries } => {
                assert_eq!(phase, GamePhase::PreGame);
                assert_eq!(entries.len(), 1);
            }
            other => panic!("unexpected menu {:?}", other),
        }
    }

    #[test]
    fn test_player_prompt_rejects_garbage() {
        let mut c = controller();
        let outcome = c.submit_player(PendingPlayer::Action(StageAction::MarkDead), "three");
        assert!(matches!(outcome, Outcome::Invalid(_)));
    }

    #[test]
    fn test_action_by_name() {
        let mut c = controller();
        assert!(matches!(
            c.submit("set_sects_and_violets"),
            Outcome::ActionDone(StageAction::SetEdition(_))
        ));
        assert_eq!(c.session().phase(), GamePhase::Configuration);
    }
}
