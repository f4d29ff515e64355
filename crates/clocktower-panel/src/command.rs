//! Panel command vocabulary and wire encoding.

use std::fmt;

use crate::{PanelError, Result};

/// A single command understood by the panel firmware.
///
/// Commands that take an optional player id (`Dead`, `DeadVoteUsed`, `Alive`)
/// act on the highlighted player when the id is omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Start,
    Day,
    Night,
    Off,
    PreReveal,
    StartConfig,
    NextDevice,
    SetDevice,
    EndConfig,
    StartKill,
    EndKill,
    StartRevive,
    EndRevive,
    Dead(Option<usize>),
    DeadVoteUsed(Option<usize>),
    Alive(Option<usize>),
    NextPlayer,
    PreviousPlayer,
    SetPlayer(usize),
    StartNominationConfig,
    StartNominations,
    EndNominations,
    VoteYes,
    VoteNo,
    VoteSkip,
    EndGame,
    GoodWins,
    EvilWins,
}

impl PanelCommand {
    /// The wire token, without argument or line terminator.
    pub fn token(&self) -> &'static str {
        match self {
            PanelCommand::Start => "start",
            PanelCommand::Day => "day",
            PanelCommand::Night => "night",
            PanelCommand::Off => "off",
            PanelCommand::PreReveal => "prerev",
            PanelCommand::StartConfig => "sconfig",
            PanelCommand::NextDevice => "ndevice",
            PanelCommand::SetDevice => "sdevice",
            PanelCommand::EndConfig => "econfig",
            PanelCommand::StartKill => "skill",
            PanelCommand::EndKill => "ekill",
            PanelCommand::StartRevive => "srevive",
            PanelCommand::EndRevive => "erevive",
            PanelCommand::Dead(_) => "dead",
            PanelCommand::DeadVoteUsed(_) => "dvote",
            PanelCommand::Alive(_) => "alive",
            PanelCommand::NextPlayer => "nplayer",
            PanelCommand::PreviousPlayer => "pplayer",
            PanelCommand::SetPlayer(_) => "splayer",
            PanelCommand::StartNominationConfig => "snomcon",
            PanelCommand::StartNominations => "snomin",
            PanelCommand::EndNominations => "enomin",
            PanelCommand::VoteYes => "vyes",
            PanelCommand::VoteNo => "vno",
            PanelCommand::VoteSkip => "vskip",
            PanelCommand::EndGame => "endgame",
            PanelCommand::GoodWins => "goodwins",
            PanelCommand::EvilWins => "evilwins",
        }
    }

    /// The integer argument, if any.
    pub fn argument(&self) -> Option<usize> {
        match self {
            PanelCommand::Dead(id) | PanelCommand::DeadVoteUsed(id) | PanelCommand::Alive(id) => *id,
            PanelCommand::SetPlayer(id) => Some(*id),
            _ => None,
        }
    }

    /// Encodes the command as a wire line (without the trailing newline).
    pub fn to_line(&self) -> String {
        match self.argument() {
            Some(arg) => format!("{},{}", self.token(), arg),
            None => self.token().to_string(),
        }
    }

    /// Parses a wire line back into a command.
    ///
    /// Expected format: `token` or `token,<int>`
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim_end();
        let (token, arg) = match line.split_once(',') {
            Some((token, raw)) => {
                let arg: usize = raw.trim().parse().map_err(|_| {
                    PanelError::ParseError(format!("invalid argument: {}", raw))
                })?;
                (token, Some(arg))
            }
            None => (line, None),
        };

        let command = match (token, arg) {
            ("start", None) => PanelCommand::Start,
            ("day", None) => PanelCommand::Day,
            ("night", None) => PanelCommand::Night,
            ("off", None) => PanelCommand::Off,
            ("prerev", None) => PanelCommand::PreReveal,
            ("sconfig", None) => PanelCommand::StartConfig,
            ("ndevice", None) => PanelCommand::NextDevice,
            ("sdevice", None) => PanelCommand::SetDevice,
            ("econfig", None) => PanelCommand::EndConfig,
            ("skill", None) => PanelCommand::StartKill,
            ("ekill", None) => PanelCommand::EndKill,
            ("srevive", None) => PanelCommand::StartRevive,
            ("erevive", None) => PanelCommand::EndRevive,
            ("dead", arg) => PanelCommand::Dead(arg),
            ("dvote", arg) => PanelCommand::DeadVoteUsed(arg),
            ("alive", arg) => PanelCommand::Alive(arg),
            ("nplayer", None) => PanelCommand::NextPlayer,
            ("pplayer", None) => PanelCommand::PreviousPlayer,
            ("splayer", Some(id)) => PanelCommand::SetPlayer(id),
            ("snomcon", None) => PanelCommand::StartNominationConfig,
            ("snomin", None) => PanelCommand::StartNominations,
            ("enomin", None) => PanelCommand::EndNominations,
            ("vyes", None) => PanelCommand::VoteYes,
            ("vno", None) => PanelCommand::VoteNo,
            ("vskip", None) => PanelCommand::VoteSkip,
            ("endgame", None) => PanelCommand::EndGame,
            ("goodwins", None) => PanelCommand::GoodWins,
            ("evilwins", None) => PanelCommand::EvilWins,
            _ => {
                return Err(PanelError::ParseError(format!(
                    "unknown command: {}",
                    line
                )))
            }
        };
        Ok(command)
    }
}

impl fmt::Display for PanelCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
