//! Editions and ambient lighting colours.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// Brightness used whenever a colour is selected without one.
pub const FULL_BRIGHTNESS: u8 = 100;

/// An RGB colour plus brightness percentage for the mood lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodLight {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Brightness in percent (0-100).
    pub brightness: u8,
}

impl MoodLight {
    /// Creates a mood light colour at full brightness.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            brightness: FULL_BRIGHTNESS,
        }
    }

    /// Returns a copy with a different brightness, clamped to 100.
    pub fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness.min(FULL_BRIGHTNESS);
        self
    }
}

impl Default for MoodLight {
    fn default() -> Self {
        Edition::default().colour()
    }
}

/// A script edition. Each edition has its own palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    #[default]
    TroubleBrewing,
    BadMoonRising,
    SectsAndViolets,
}

impl Edition {
    /// All editions in menu order.
    pub const ALL: [Edition; 3] = [
        Edition::TroubleBrewing,
        Edition::BadMoonRising,
        Edition::SectsAndViolets,
    ];

    /// The edition's mood light colour at full brightness.
    pub const fn colour(&self) -> MoodLight {
        match self {
            Edition::TroubleBrewing => MoodLight::rgb(159, 9, 36),
            Edition::BadMoonRising => MoodLight::rgb(206, 111, 37),
            Edition::SectsAndViolets => MoodLight::rgb(76, 54, 130),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Edition::TroubleBrewing => "trouble_brewing",
            Edition::BadMoonRising => "bad_moon_rising",
            Edition::SectsAndViolets => "sects_and_violets",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Edition::TroubleBrewing => "Trouble Brewing",
            Edition::BadMoonRising => "Bad Moon Rising",
            Edition::SectsAndViolets => "Sects and Violets",
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Edition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "trouble_brewing" | "tb" => Ok(Edition::TroubleBrewing),
            "bad_moon_rising" | "bmr" => Ok(Edition::BadMoonRising),
            "sects_and_violets" | "snv" => Ok(Edition::SectsAndViolets),
            other => Err(ModelError::UnknownEdition(other.to_string())),
        }
    }
}

/// The side declared as winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Good,
    Evil,
}

impl Team {
    /// Colour the mood lights switch to when this team wins.
    pub const fn colour(&self) -> MoodLight {
        match self {
            Team::Good => MoodLight::rgb(0, 255, 0),
            Team::Evil => MoodLight::rgb(255, 0, 0),
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Good => f.write_str("Good"),
            Team::Evil => f.write_str("Evil"),
        }
    }
}
