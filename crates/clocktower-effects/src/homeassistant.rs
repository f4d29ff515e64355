//! Home Assistant script adapter for lighting and announcements.

use serde_json::{json, Value};
use tracing::info;

use clocktower_models::MoodLight;

use crate::effect::decode_params;
use crate::{
    EffectDispatcher, EffectError, EffectName, EffectParams, GongParams, LightsOnParams,
    RestClient, Result,
};

/// Script entity ids the adapter runs.
pub mod scripts {
    pub const TURN_OFF_ALL_LIGHTS: &str = "script.turn_off_all_lights";
    pub const TURN_ON_ALL_LIGHTS: &str = "script.turn_on_all_lights";
    pub const TRIGGER_BELL_SOUNDS: &str = "script.trigger_bell_sounds";
    pub const STOP_ALL_ALEXA: &str = "script.stop_all_alexa";
    pub const SET_MOOD_LIGHTING: &str = "script.set_mood_lighting";
    pub const SET_MOOD_LIGHTING_OFF: &str = "script.set_mood_lighting_off";
}

const SCRIPT_SERVICE: &str = "api/services/script/turn_on";

/// Runs Home Assistant scripts for the lighting and sound effects.
#[derive(Debug, Clone)]
pub struct HomeAssistant {
    client: RestClient,
}

impl HomeAssistant {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Connect to a Home Assistant instance with a long-lived access token.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` for a malformed base URL.
    pub fn connect(base_url: &str, token: &str) -> Result<Self> {
        Ok(Self::new(RestClient::new(base_url, token)?))
    }

    /// Run a script, optionally with variables.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error from the service call.
    pub fn run_script(&self, entity_id: &str, variables: Option<Value>) -> Result<Value> {
        let body = match variables {
            Some(variables) => json!({ "entity_id": entity_id, "variables": variables }),
            None => json!({ "entity_id": entity_id }),
        };
        self.client.post_json(SCRIPT_SERVICE, &body)
    }

    /// The mood script reads `r`, `g`, `b` and `brightness` variables.
    fn set_mood(&self, mood: MoodLight) -> Result<()> {
        self.run_script(scripts::SET_MOOD_LIGHTING, Some(json!(mood)))?;
        Ok(())
    }
}

impl EffectDispatcher for HomeAssistant {
    fn name(&self) -> &str {
        "homeassistant"
    }

    fn supports(&self, effect: EffectName) -> bool {
        matches!(
            effect,
            EffectName::LightsOn
                | EffectName::LightsOff
                | EffectName::MoodLightOn
                | EffectName::MoodLightOff
                | EffectName::Gong
                | EffectName::StopAllAudio
        )
    }

    fn trigger_named_effect(&self, name: &str, params: &EffectParams) -> Result<()> {
        let effect: EffectName = name.parse()?;
        info!(effect = %effect, "home assistant effect");

        match effect {
            EffectName::LightsOn => {
                let p: LightsOnParams = decode_params(effect, params)?;
                self.run_script(
                    scripts::TURN_ON_ALL_LIGHTS,
                    Some(json!({ "brightness": p.brightness })),
                )?;
                if let Some(mood) = p.mood {
                    self.set_mood(mood)?;
                }
            }
            EffectName::LightsOff => {
                self.run_script(scripts::TURN_OFF_ALL_LIGHTS, None)?;
                self.run_script(scripts::SET_MOOD_LIGHTING_OFF, None)?;
            }
            EffectName::MoodLightOn => {
                let mood: MoodLight = decode_params(effect, params)?;
                self.set_mood(mood)?;
            }
            EffectName::MoodLightOff => {
                self.run_script(scripts::SET_MOOD_LIGHTING_OFF, None)?;
            }
            EffectName::Gong => {
                let p: GongParams = decode_params(effect, params)?;
                self.run_script(
                    scripts::TRIGGER_BELL_SOUNDS,
                    Some(json!({ "song_name": p.song_name })),
                )?;
            }
            EffectName::StopAllAudio => {
                self.run_script(scripts::STOP_ALL_ALEXA, None)?;
            }
            other => {
                return Err(EffectError::Unsupported {
                    dispatcher: self.name().to_string(),
                    effect: other.to_string(),
                })
            }
        }
        Ok(())
    }
}
