//! Playback control through a Home Assistant media player entity.

use std::thread;
use std::time::Duration;

use serde_json::json;
use tracing::{debug, info};

use crate::effect::decode_params;
use crate::{
    EffectDispatcher, EffectError, EffectName, EffectParams, RestClient, Result, VolumeRamp,
};

/// Drives one `media_player` entity.
#[derive(Debug, Clone)]
pub struct MediaPlayer {
    client: RestClient,
    entity_id: String,
}

impl MediaPlayer {
    pub fn new(client: RestClient, entity_id: impl Into<String>) -> Self {
        Self {
            client,
            entity_id: entity_id.into(),
        }
    }

    /// Connect to Home Assistant and drive `entity_id`.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` for a malformed base URL.
    pub fn connect(base_url: &str, token: &str, entity_id: &str) -> Result<Self> {
        Ok(Self::new(RestClient::new(base_url, token)?, entity_id))
    }

    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Call a `media_player` service on the entity.
    ///
    /// # Errors
    ///
    /// Returns the transport or status error from the service call.
    pub fn call_service(&self, service: &str) -> Result<()> {
        debug!(entity = %self.entity_id, service, "media player service");
        self.client.post_json(
            &format!("api/services/media_player/{}", service),
            &json!({ "entity_id": self.entity_id }),
        )?;
        Ok(())
    }

    /// Step the volume `ramp.steps` times, pausing between steps.
    ///
    /// # Errors
    ///
    /// Stops at the first failed step and returns its error.
    pub fn ramp_volume(&self, service: &str, ramp: VolumeRamp) -> Result<()> {
        let interval = Duration::from_millis(ramp.interval_ms);
        for step in 0..ramp.steps {
            self.call_service(service)?;
            if step + 1 < ramp.steps {
                thread::sleep(interval);
            }
        }
        Ok(())
    }
}

impl EffectDispatcher for MediaPlayer {
    fn name(&self) -> &str {
        "media_player"
    }

    fn supports(&self, effect: EffectName) -> bool {
        matches!(
            effect,
            EffectName::PlaybackPause
                | EffectName::PlaybackResume
                | EffectName::NextTrack
                | EffectName::VolumeDownRamp
                | EffectName::VolumeUpRamp
        )
    }

    fn trigger_named_effect(&self, name: &str, params: &EffectParams) -> Result<()> {
        let effect: EffectName = name.parse()?;
        info!(effect = %effect, entity = %self.entity_id, "media effect");

        match effect {
            EffectName::PlaybackPause => self.call_service("media_pause"),
            EffectName::PlaybackResume => self.call_service("media_play"),
            EffectName::NextTrack => self.call_service("media_next_track"),
            EffectName::VolumeDownRamp => {
                let ramp: VolumeRamp = decode_params(effect, params)?;
                self.ramp_volume("volume_down", ramp)
            }
            EffectName::VolumeUpRamp => {
                let ramp: VolumeRamp = decode_params(effect, params)?;
                self.ramp_volume("volume_up", ramp)
            }
            other => Err(EffectError::Unsupported {
                dispatcher: self.name().to_string(),
                effect: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_effects() {
        let player = MediaPlayer::connect("http://localhost:8123", "t", "media_player.den").unwrap();
        assert_eq!(player.entity_id(), "media_player.den");
        assert!(player.supports(EffectName::VolumeUpRamp));
        assert!(!player.supports(EffectName::LightsOn));
    }

    #[test]
    fn test_zero_step_ramp_makes_no_requests() {
        // Unreachable base: any request would fail
        let player = MediaPlayer::connect("http://127.0.0.1:9", "t", "media_player.den").unwrap();
        let ramp = VolumeRamp {
            steps: 0,
            interval_ms: 10,
        };
        assert!(player.ramp_volume("volume_up", ramp).is_ok());
    }
}
