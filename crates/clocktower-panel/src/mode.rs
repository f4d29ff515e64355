//! Interactive panel sub-modes and their menus.

use std::fmt;

/// The sub-mode the panel conversation is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelMode {
    /// No sub-mode; one-shot commands only.
    Idle,
    /// Assigning player slots to devices. Tracks how many were set so far.
    Configuration { configured: usize },
    /// Marking players dead.
    Kill,
    /// Marking players alive again.
    Revive,
    /// Choosing who starts the nomination round.
    NominationConfig,
    /// Recording votes, one player at a time.
    NominationVoting,
}

/// An operation inside a sub-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeAction {
    SetDevice,
    NextDevice,
    EndConfiguration,
    NextPlayer,
    PreviousPlayer,
    /// Kill or revive the highlighted player, depending on the mode.
    MarkCurrent,
    SetPlayer(usize),
    StartNominations,
    VoteYes,
    VoteNo,
    VoteSkip,
    /// Leave kill, revive or nomination configuration without further changes.
    Cancel,
    EndNominations,
}

/// What picking a menu option does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    /// Run the action directly.
    Action(ModeAction),
    /// Ask the operator for a player index, then run `SetPlayer`.
    PromptPlayer,
}

/// One numbered option in a sub-mode menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub input: &'static str,
    pub label: &'static str,
    pub choice: MenuChoice,
}

const fn option(input: &'static str, label: &'static str, choice: MenuChoice) -> MenuOption {
    MenuOption {
        input,
        label,
        choice,
    }
}

static CONFIGURATION_MENU: &[MenuOption] = &[
    option("1", "Set Device", MenuChoice::Action(ModeAction::SetDevice)),
    option("2", "Next Device", MenuChoice::Action(ModeAction::NextDevice)),
    option("3", "End Configuration", MenuChoice::Action(ModeAction::EndConfiguration)),
];

static KILL_MENU: &[MenuOption] = &[
    option("1", "Next Player", MenuChoice::Action(ModeAction::NextPlayer)),
    option("2", "Previous Player", MenuChoice::Action(ModeAction::PreviousPlayer)),
    option("3", "Kill Current", MenuChoice::Action(ModeAction::MarkCurrent)),
    option("4", "Cancel", MenuChoice::Action(ModeAction::Cancel)),
    option("5", "Set Player", MenuChoice::PromptPlayer),
];

static REVIVE_MENU: &[MenuOption] = &[
    option("1", "Next Player", MenuChoice::Action(ModeAction::NextPlayer)),
    option("2", "Previous Player", MenuChoice::Action(ModeAction::PreviousPlayer)),
    option("3", "Revive Current", MenuChoice::Action(ModeAction::MarkCurrent)),
    option("4", "Cancel", MenuChoice::Action(ModeAction::Cancel)),
    option("5", "Set Player", MenuChoice::PromptPlayer),
];

static NOMINATION_CONFIG_MENU: &[MenuOption] = &[
    option("1", "Next Player", MenuChoice::Action(ModeAction::NextPlayer)),
    option("2", "Previous Player", MenuChoice::Action(ModeAction::PreviousPlayer)),
    option("3", "Start Nominations", MenuChoice::Action(ModeAction::StartNominations)),
    option("4", "Cancel", MenuChoice::Action(ModeAction::Cancel)),
    option("5", "Set Player", MenuChoice::PromptPlayer),
];

static NOMINATION_VOTING_MENU: &[MenuOption] = &[
    option("1", "Voted Yes", MenuChoice::Action(ModeAction::VoteYes)),
    option("2", "Voted No", MenuChoice::Action(ModeAction::VoteNo)),
    option("3", "Skipped", MenuChoice::Action(ModeAction::VoteSkip)),
    option("4", "End Nominations", MenuChoice::Action(ModeAction::EndNominations)),
];

impl PanelMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, PanelMode::Idle)
    }

    /// Menu title shown above the options.
    pub fn title(&self) -> &'static str {
        match self {
            PanelMode::Idle => "Panel",
            PanelMode::Configuration { .. } => "Configuration Options",
            PanelMode::Kill => "Kill Player",
            PanelMode::Revive => "Revive Player",
            PanelMode::NominationConfig => "Nomination Configuration Options",
            PanelMode::NominationVoting => "Nominations Options",
        }
    }

    /// Options offered in this mode, in display order. Empty when idle.
    pub fn menu(&self) -> &'static [MenuOption] {
        match self {
            PanelMode::Idle => &[],
            PanelMode::Configuration { .. } => CONFIGURATION_MENU,
            PanelMode::Kill => KILL_MENU,
            PanelMode::Revive => REVIVE_MENU,
            PanelMode::NominationConfig => NOMINATION_CONFIG_MENU,
            PanelMode::NominationVoting => NOMINATION_VOTING_MENU,
        }
    }

    /// Looks up the option for an operator input token.
    pub fn find_option(&self, input: &str) -> Option<&'static MenuOption> {
        let input = input.trim();
        self.menu().iter().find(|opt| opt.input == input)
    }

    /// Whether the mode accepts `action` at all.
    pub fn accepts(&self, action: ModeAction) -> bool {
        use ModeAction::*;
        match self {
            PanelMode::Idle => false,
            PanelMode::Configuration { .. } => {
                matches!(action, SetDevice | NextDevice | EndConfiguration)
            }
            PanelMode::Kill | PanelMode::Revive => matches!(
                action,
                NextPlayer | PreviousPlayer | MarkCurrent | SetPlayer(_) | Cancel
            ),
            PanelMode::NominationConfig => matches!(
                action,
                NextPlayer | PreviousPlayer | SetPlayer(_) | StartNominations | Cancel
            ),
            PanelMode::NominationVoting => {
                matches!(action, VoteYes | VoteNo | VoteSkip | EndNominations)
            }
        }
    }
}

impl fmt::Display for PanelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelMode::Idle => f.write_str("idle"),
            PanelMode::Configuration { .. } => f.write_str("configuration"),
            PanelMode::Kill => f.write_str("kill"),
            PanelMode::Revive => f.write_str("revive"),
            PanelMode::NominationConfig => f.write_str("nomination configuration"),
            PanelMode::NominationVoting => f.write_str("nomination voting"),
        }
    }
}

impl fmt::Display for ModeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeAction::SetDevice => f.write_str("set device"),
            ModeAction::NextDevice => f.write_str("next device"),
            ModeAction::EndConfiguration => f.write_str("end configuration"),
            ModeAction::NextPlayer => f.write_str("next player"),
            ModeAction::PreviousPlayer => f.write_str("previous player"),
            ModeAction::MarkCurrent => f.write_str("mark current"),
            ModeAction::SetPlayer(id) => write!(f, "set player {}", id),
            ModeAction::StartNominations => f.write_str("start nominations"),
            ModeAction::VoteYes => f.write_str("vote yes"),
            ModeAction::VoteNo => f.write_str("vote no"),
            ModeAction::VoteSkip => f.write_str("vote skip"),
            ModeAction::Cancel => f.write_str("cancel"),
            ModeAction::EndNominations => f.write_str("end nominations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_action_is_accepted() {
        let modes = [
            PanelMode::Configuration { configured: 0 },
            PanelMode::Kill,
            PanelMode::Revive,
            PanelMode::NominationConfig,
            PanelMode::NominationVoting,
        ];
        for mode in modes {
            for opt in mode.menu() {
                let action = match opt.choice {
                    MenuChoice::Action(action) => action,
                    MenuChoice::PromptPlayer => ModeAction::SetPlayer(0),
                };
                assert!(mode.accepts(action), "{} should accept {}", mode, action);
            }
        }
    }

    #[test]
    fn test_idle_has_no_menu() {
        assert!(PanelMode::Idle.menu().is_empty());
        assert!(!PanelMode::Idle.accepts(ModeAction::Cancel));
    }

    #[test]
    fn test_find_option_trims_input() {
        let opt = PanelMode::Kill.find_option(" 3 ").unwrap();
        assert_eq!(opt.choice, MenuChoice::Action(ModeAction::MarkCurrent));
        assert!(PanelMode::Kill.find_option("9").is_none());
    }

    #[test]
    fn test_voting_rejects_cursor_moves() {
        assert!(!PanelMode::NominationVoting.accepts(ModeAction::NextPlayer));
    }
}
