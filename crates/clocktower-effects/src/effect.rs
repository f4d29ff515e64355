//! Effect vocabulary and the dispatcher capability.

use std::fmt;
use std::str::FromStr;

use clocktower_models::MoodLight;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{EffectError, Result};

/// Parameter map passed alongside an effect name.
pub type EffectParams = Map<String, Value>;

/// Brightness used when the room lights come back on for the day.
pub const DAY_LIGHT_BRIGHTNESS: u8 = 40;

/// Track played by the nomination gong.
pub const GONG_SONG: &str = "Chuch Bells Version 2 by Digiffects Sound Effects Library";

/// Default volume ramp used on phase changes.
pub const VOLUME_RAMP: VolumeRamp = VolumeRamp {
    steps: 50,
    interval_ms: 50,
};

/// Every effect the session knows how to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectName {
    LightsOn,
    LightsOff,
    MoodLightOn,
    MoodLightOff,
    Gong,
    StopAllAudio,
    PlaybackPause,
    PlaybackResume,
    NextTrack,
    VolumeDownRamp,
    VolumeUpRamp,
}

impl EffectName {
    pub const ALL: [EffectName; 11] = [
        EffectName::LightsOn,
        EffectName::LightsOff,
        EffectName::MoodLightOn,
        EffectName::MoodLightOff,
        EffectName::Gong,
        EffectName::StopAllAudio,
        EffectName::PlaybackPause,
        EffectName::PlaybackResume,
        EffectName::NextTrack,
        EffectName::VolumeDownRamp,
        EffectName::VolumeUpRamp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EffectName::LightsOn => "lights_on",
            EffectName::LightsOff => "lights_off",
            EffectName::MoodLightOn => "mood_light_on",
            EffectName::MoodLightOff => "mood_light_off",
            EffectName::Gong => "gong",
            EffectName::StopAllAudio => "stop_all_audio",
            EffectName::PlaybackPause => "playback_pause",
            EffectName::PlaybackResume => "playback_resume",
            EffectName::NextTrack => "next_track",
            EffectName::VolumeDownRamp => "volume_down_ramp",
            EffectName::VolumeUpRamp => "volume_up_ramp",
        }
    }
}

impl fmt::Display for EffectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectName {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self> {
        EffectName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| EffectError::UnknownEffect(s.to_string()))
    }
}

// ==================== Parameters ====================

/// Parameters for `lights_on`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightsOnParams {
    pub brightness: u8,
    /// Mood light to restore alongside the room lights.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<MoodLight>,
}

/// Parameters for `gong`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GongParams {
    pub song_name: String,
}

/// Parameters for the volume ramps: `steps` single-notch changes,
/// `interval_ms` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeRamp {
    pub steps: u32,
    pub interval_ms: u64,
}

/// Decode a parameter map into the typed parameters of an effect.
///
/// # Errors
///
/// Returns `EffectError::InvalidParams` if the map does not match `T`.
pub fn decode_params<T: DeserializeOwned>(name: EffectName, params: &EffectParams) -> Result<T> {
    serde_json::from_value(Value::Object(params.clone())).map_err(|e| EffectError::InvalidParams {
        effect: name.to_string(),
        reason: e.to_string(),
    })
}

fn encode_params<T: Serialize>(value: &T) -> EffectParams {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => EffectParams::new(),
    }
}

// ==================== Effect ====================

/// A fully specified effect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LightsOn(LightsOnParams),
    LightsOff,
    MoodLightOn(MoodLight),
    MoodLightOff,
    Gong(GongParams),
    StopAllAudio,
    PlaybackPause,
    PlaybackResume,
    NextTrack,
    VolumeDownRamp(VolumeRamp),
    VolumeUpRamp(VolumeRamp),
}

impl Effect {
    /// Day lighting with the given mood light restored.
    pub fn day_lights(mood: MoodLight) -> Self {
        Effect::LightsOn(LightsOnParams {
            brightness: DAY_LIGHT_BRIGHTNESS,
            mood: Some(mood),
        })
    }

    pub fn gong() -> Self {
        Effect::Gong(GongParams {
            song_name: GONG_SONG.to_string(),
        })
    }

    pub fn name(&self) -> EffectName {
        match self {
            Effect::LightsOn(_) => EffectName::LightsOn,
            Effect::LightsOff => EffectName::LightsOff,
            Effect::MoodLightOn(_) => EffectName::MoodLightOn,
            Effect::MoodLightOff => EffectName::MoodLightOff,
            Effect::Gong(_) => EffectName::Gong,
            Effect::StopAllAudio => EffectName::StopAllAudio,
            Effect::PlaybackPause => EffectName::PlaybackPause,
            Effect::PlaybackResume => EffectName::PlaybackResume,
            Effect::NextTrack => EffectName::NextTrack,
            Effect::VolumeDownRamp(_) => EffectName::VolumeDownRamp,
            Effect::VolumeUpRamp(_) => EffectName::VolumeUpRamp,
        }
    }

    pub fn params(&self) -> EffectParams {
        match self {
            Effect::LightsOn(p) => encode_params(p),
            Effect::MoodLightOn(mood) => encode_params(mood),
            Effect::Gong(p) => encode_params(p),
            Effect::VolumeDownRamp(ramp) | Effect::VolumeUpRamp(ramp) => encode_params(ramp),
            _ => EffectParams::new(),
        }
    }
}

// ==================== Dispatcher ====================

/// Capability for triggering physical-world effects.
///
/// Implementations are free to ignore effects they do not support; callers
/// can ask first with [`EffectDispatcher::supports`].
pub trait EffectDispatcher: Send {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Whether this dispatcher acts on `effect`.
    fn supports(&self, effect: EffectName) -> bool;

    /// Fire an effect by name.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::UnknownEffect` for names outside the vocabulary,
    /// `EffectError::InvalidParams` for malformed parameters, or the
    /// transport error of the underlying service.
    fn trigger_named_effect(&self, name: &str, params: &EffectParams) -> Result<()>;

    /// Fire a typed effect.
    ///
    /// # Errors
    ///
    /// See [`EffectDispatcher::trigger_named_effect`].
    fn trigger(&self, effect: &Effect) -> Result<()> {
        self.trigger_named_effect(effect.name().as_str(), &effect.params())
    }
}
