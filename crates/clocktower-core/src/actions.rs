//! The operator's action surface.
//!
//! For every phase the operator sees one numbered list: the transition
//! table's outgoing events first, then the phase's declared
//! non-transitioning actions.

use std::fmt;
use std::str::FromStr;

use clocktower_models::{Edition, GamePhase};

use crate::{MachineOptions, PhaseEvent, Result, SessionError, TransitionTable};

/// An action that triggers side effects without changing the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageAction {
    SetEdition(Edition),
    StopAllAudio,
    ConfigurePanel,
    KillPlayer,
    RevivePlayer,
    NominationConfig,
    MarkDead,
    MarkAlive,
    MarkDeadVoteUsed,
    GoodWins,
    EvilWins,
}

impl StageAction {
    pub const ALL: [StageAction; 13] = [
        StageAction::SetEdition(Edition::TroubleBrewing),
        StageAction::SetEdition(Edition::BadMoonRising),
        StageAction::SetEdition(Edition::SectsAndViolets),
        StageAction::StopAllAudio,
        StageAction::ConfigurePanel,
        StageAction::KillPlayer,
        StageAction::RevivePlayer,
        StageAction::NominationConfig,
        StageAction::MarkDead,
        StageAction::MarkAlive,
        StageAction::MarkDeadVoteUsed,
        StageAction::GoodWins,
        StageAction::EvilWins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StageAction::SetEdition(Edition::TroubleBrewing) => "set_trouble_brewing",
            StageAction::SetEdition(Edition::BadMoonRising) => "set_bad_moon_rising",
            StageAction::SetEdition(Edition::SectsAndViolets) => "set_sects_and_violets",
            StageAction::StopAllAudio => "stop_all_audio",
            StageAction::ConfigurePanel => "configure_panel",
            StageAction::KillPlayer => "kill_player",
            StageAction::RevivePlayer => "revive_player",
            StageAction::NominationConfig => "nomination_config",
            StageAction::MarkDead => "mark_dead",
            StageAction::MarkAlive => "mark_alive",
            StageAction::MarkDeadVoteUsed => "mark_dead_vote_used",
            StageAction::GoodWins => "good_wins",
            StageAction::EvilWins => "evil_wins",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StageAction::SetEdition(Edition::TroubleBrewing) => "Set Trouble Brewing",
            StageAction::SetEdition(Edition::BadMoonRising) => "Set Bad Moon Rising",
            StageAction::SetEdition(Edition::SectsAndViolets) => "Set Sects and Violets",
            StageAction::StopAllAudio => "Stop All Audio",
            StageAction::ConfigurePanel => "Configure Panel Devices",
            StageAction::KillPlayer => "Set Player Dead",
            StageAction::RevivePlayer => "Set Player Alive",
            StageAction::NominationConfig => "Restart Nomination Config",
            StageAction::MarkDead => "Mark Player Dead by ID",
            StageAction::MarkAlive => "Mark Player Alive by ID",
            StageAction::MarkDeadVoteUsed => "Mark Dead Vote Used by ID",
            StageAction::GoodWins => "Good Wins",
            StageAction::EvilWins => "Evil Wins",
        }
    }

    /// Whether the action drives the status panel.
    pub fn needs_panel(&self) -> bool {
        matches!(
            self,
            StageAction::ConfigurePanel
                | StageAction::KillPlayer
                | StageAction::RevivePlayer
                | StageAction::NominationConfig
                | StageAction::MarkDead
                | StageAction::MarkAlive
                | StageAction::MarkDeadVoteUsed
        )
    }

    /// Whether the action takes an explicit player id.
    pub fn needs_player(&self) -> bool {
        matches!(
            self,
            StageAction::MarkDead | StageAction::MarkAlive | StageAction::MarkDeadVoteUsed
        )
    }
}

impl fmt::Display for StageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageAction {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        StageAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| SessionError::UnknownAction(s.to_string()))
    }
}

const EDITIONS: [StageAction; 3] = [
    StageAction::SetEdition(Edition::TroubleBrewing),
    StageAction::SetEdition(Edition::BadMoonRising),
    StageAction::SetEdition(Edition::SectsAndViolets),
];

/// Non-transitioning actions declared for a phase, before capability
/// filtering.
pub fn declared_actions(options: MachineOptions, phase: GamePhase) -> Vec<StageAction> {
    use StageAction::*;

    let mut actions = Vec::new();
    let setup_phase = options.initial_phase();
    if phase == setup_phase {
        actions.extend(EDITIONS);
        actions.push(ConfigurePanel);
    }

    match phase {
        GamePhase::Day => actions.extend([
            KillPlayer,
            RevivePlayer,
            MarkDead,
            MarkAlive,
            MarkDeadVoteUsed,
            StopAllAudio,
        ]),
        GamePhase::Nominations => actions.extend([
            NominationConfig,
            KillPlayer,
            MarkDead,
            MarkAlive,
            MarkDeadVoteUsed,
            StopAllAudio,
        ]),
        GamePhase::Night => {
            actions.extend([KillPlayer, RevivePlayer, MarkDead, MarkAlive, MarkDeadVoteUsed])
        }
        GamePhase::PostGame => actions.extend([GoodWins, EvilWins]),
        _ => {}
    }
    actions
}

/// Non-transitioning actions actually offered, given whether a panel is
/// connected.
pub fn available_actions(
    options: MachineOptions,
    phase: GamePhase,
    has_panel: bool,
) -> Vec<StageAction> {
    declared_actions(options, phase)
        .into_iter()
        .filter(|action| has_panel || !action.needs_panel())
        .collect()
}

// ==================== Surface ====================

/// What choosing an entry does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Transition(PhaseEvent),
    Action(StageAction),
}

impl ActionKind {
    pub fn is_transition(&self) -> bool {
        matches!(self, ActionKind::Transition(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Transition(event) => event.as_str(),
            ActionKind::Action(action) => action.as_str(),
        }
    }
}

/// One numbered menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEntry {
    pub input: String,
    pub label: &'static str,
    pub kind: ActionKind,
}

/// The ordered menu for `phase`, numbered from 1.
pub fn action_surface(
    table: &TransitionTable,
    options: MachineOptions,
    phase: GamePhase,
    has_panel: bool,
) -> Vec<ActionEntry> {
    let transitions = table
        .outgoing(phase)
        .map(|t| (t.event.label(), ActionKind::Transition(t.event)));
    let actions = available_actions(options, phase, has_panel)
        .into_iter()
        .map(|a| (a.label(), ActionKind::Action(a)));

    transitions
        .chain(actions)
        .enumerate()
        .map(|(i, (label, kind))| ActionEntry {
            input: (i + 1).to_string(),
            label,
            kind,
        })
        .collect()
}

/// Find the entry for an operator input. Matches either the number or the
/// action/event name.
pub fn find_entry<'a>(entries: &'a [ActionEntry], input: &str) -> Option<&'a ActionEntry> {
    let input = input.trim();
    entries
        .iter()
        .find(|e| e.input == input || e.kind.name() == input)
}
