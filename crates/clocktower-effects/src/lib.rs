//! Physical-world effects for Clocktower.
//!
//! The session core only knows one capability, [`EffectDispatcher`]: fire an
//! effect by name with a parameter map. This crate provides that interface
//! and the adapters behind it:
//!
//! - **effect**: effect names, typed parameters, and the dispatcher trait
//! - **router**: fans one effect out to every adapter that supports it
//! - **homeassistant**: lighting and announcement scripts on Home Assistant
//! - **media**: playback control through a Home Assistant media player
//! - **smartthings**: room lights switched through SmartThings
//! - **batch**: concurrent fan-out of independent REST commands
//!
//! Failures are reported to the caller as [`EffectError`]; whether they
//! abort anything is the caller's decision.

pub mod batch;
pub mod client;
pub mod effect;
pub mod error;
pub mod homeassistant;
pub mod media;
pub mod router;
pub mod smartthings;

pub use batch::{BatchCommandDispatcher, BatchFailure, BatchOutcome, BatchReport, RemoteCommand};
pub use client::RestClient;
pub use effect::{
    Effect, EffectDispatcher, EffectName, EffectParams, GongParams, LightsOnParams, VolumeRamp,
    DAY_LIGHT_BRIGHTNESS, GONG_SONG, VOLUME_RAMP,
};
pub use error::{EffectError, Result};
pub use homeassistant::HomeAssistant;
pub use media::MediaPlayer;
pub use router::EffectRouter;
pub use smartthings::SmartThingsLights;
