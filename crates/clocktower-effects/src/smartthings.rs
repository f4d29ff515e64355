//! SmartThings room lights, switched as one concurrent batch.

use std::time::Duration;

use serde_json::json;
use tokio::runtime::Runtime;
use tracing::info;

use crate::{
    BatchCommandDispatcher, BatchReport, EffectDispatcher, EffectError, EffectName, EffectParams,
    RemoteCommand, Result,
};

/// Public SmartThings REST endpoint.
pub const SMARTTHINGS_API_URL: &str = "https://api.smartthings.com/v1/";

/// Switches a set of SmartThings devices on or off together.
///
/// Owns a small runtime so the blocking session loop can await a batch.
pub struct SmartThingsLights {
    batch: BatchCommandDispatcher,
    device_ids: Vec<String>,
    runtime: Runtime,
}

impl SmartThingsLights {
    /// Create an adapter against the public SmartThings API.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::Io` if the runtime cannot be started.
    pub fn new(token: &str, device_ids: Vec<String>, timeout: Option<Duration>) -> Result<Self> {
        Self::with_base_url(SMARTTHINGS_API_URL, token, device_ids, timeout)
    }

    /// Create an adapter against an arbitrary base URL.
    ///
    /// # Errors
    ///
    /// Returns `EffectError::InvalidUrl` or `EffectError::Io`.
    pub fn with_base_url(
        base_url: &str,
        token: &str,
        device_ids: Vec<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;
        Ok(Self {
            batch: BatchCommandDispatcher::new(base_url, token)?.with_timeout(timeout),
            device_ids,
            runtime,
        })
    }

    pub fn device_ids(&self) -> &[String] {
        &self.device_ids
    }

    /// Send `command` (`on` or `off`) to every device concurrently.
    pub fn switch_all(&self, command: &str) -> BatchReport {
        let commands = self
            .device_ids
            .iter()
            .map(|id| {
                RemoteCommand::new(
                    format!("devices/{}/commands", id),
                    json!({
                        "commands": [{
                            "component": "main",
                            "capability": "switch",
                            "command": command,
                        }]
                    }),
                )
            })
            .collect();
        self.runtime.block_on(self.batch.dispatch(commands))
    }
}

impl std::fmt::Debug for SmartThingsLights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmartThingsLights")
            .field("device_ids", &self.device_ids)
            .field("timeout", &self.batch.timeout())
            .finish()
    }
}

impl EffectDispatcher for SmartThingsLights {
    fn name(&self) -> &str {
        "smartthings"
    }

    fn supports(&self, effect: EffectName) -> bool {
        matches!(effect, EffectName::LightsOn | EffectName::LightsOff)
    }

    fn trigger_named_effect(&self, name: &str, _params: &EffectParams) -> Result<()> {
        let effect: EffectName = name.parse()?;
        let command = match effect {
            EffectName::LightsOn => "on",
            EffectName::LightsOff => "off",
            other => {
                return Err(EffectError::Unsupported {
                    dispatcher: self.name().to_string(),
                    effect: other.to_string(),
                })
            }
        };

        info!(command, devices = self.device_ids.len(), "switching smartthings lights");
        self.switch_all(command).into_result()?;
        Ok(())
    }
}
