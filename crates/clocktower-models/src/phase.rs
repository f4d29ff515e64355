//! Game phase types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discrete stage of the game session lifecycle.
///
/// Exactly one phase is current at any time. Which phases exist in a given
/// session depends on the machine variant; `Configuration` and `PreReveal`
/// are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Hardware and edition setup before players sit down.
    Configuration,
    /// Players seated, waiting for the storyteller to start.
    PreGame,
    /// The first night of the game.
    FirstNight,
    /// Daytime discussion.
    Day,
    /// Nominations and voting.
    Nominations,
    /// Lights come up before the day's deaths are revealed.
    PreReveal,
    /// Any night after the first.
    Night,
    /// The game is over.
    PostGame,
}

impl GamePhase {
    /// All phases, in lifecycle order.
    pub const ALL: [GamePhase; 8] = [
        GamePhase::Configuration,
        GamePhase::PreGame,
        GamePhase::FirstNight,
        GamePhase::Day,
        GamePhase::Nominations,
        GamePhase::PreReveal,
        GamePhase::Night,
        GamePhase::PostGame,
    ];

    /// Stable identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Configuration => "configuration",
            GamePhase::PreGame => "pre_game",
            GamePhase::FirstNight => "first_night",
            GamePhase::Day => "day",
            GamePhase::Nominations => "nominations",
            GamePhase::PreReveal => "pre_reveal",
            GamePhase::Night => "night",
            GamePhase::PostGame => "post_game",
        }
    }

    /// Human-readable name for menus.
    pub fn label(&self) -> &'static str {
        match self {
            GamePhase::Configuration => "Game Configuration",
            GamePhase::PreGame => "Pre-Game",
            GamePhase::FirstNight => "First Night",
            GamePhase::Day => "Day Phase",
            GamePhase::Nominations => "Nominations Phase",
            GamePhase::PreReveal => "Pre-Day Reveal Phase",
            GamePhase::Night => "Night Phase",
            GamePhase::PostGame => "Post-Game",
        }
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_matches_as_str() {
        for phase in GamePhase::ALL {
            let json = serde_json::to_string(&phase).unwrap();
            assert_eq!(json, format!("\"{}\"", phase.as_str()));
        }
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(GamePhase::PreReveal.to_string(), "Pre-Day Reveal Phase");
    }
}
