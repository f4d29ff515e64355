//! Session configuration.
//!
//! Everything the session needs from the outside world is collected into a
//! typed [`ClocktowerConfig`]. Values come from environment variables, which
//! the binary loads from `.env.local` / `.env` before anything else runs.
//!
//! # Environment Variables
//!
//! - `HA_URL`, `HA_TOKEN`: Home Assistant base URL and long-lived token
//! - `HA_MEDIA_PLAYER`: media player entity for playback effects
//! - `SMARTTHINGS_PAT` (or `PAT`): SmartThings personal access token
//! - `SMARTTHINGS_DEVICE_IDS` (or `DEVICE_IDS`): comma-separated device ids
//! - `SMARTTHINGS_TIMEOUT_MS`: per-command timeout for SmartThings batches
//! - `CLOCKTOWER_PANEL_PORT`: serial port of the status panel
//! - `CLOCKTOWER_VARIANT`: `full` or `reduced`
//! - `CLOCKTOWER_STATE_DIR`: state directory, default `~/.clocktower`

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::{MachineOptions, Result, SessionError};

pub const HA_URL_ENV: &str = "HA_URL";
pub const HA_TOKEN_ENV: &str = "HA_TOKEN";
pub const HA_MEDIA_PLAYER_ENV: &str = "HA_MEDIA_PLAYER";
pub const SMARTTHINGS_TOKEN_ENV: &str = "SMARTTHINGS_PAT";
pub const SMARTTHINGS_DEVICES_ENV: &str = "SMARTTHINGS_DEVICE_IDS";
pub const SMARTTHINGS_TIMEOUT_ENV: &str = "SMARTTHINGS_TIMEOUT_MS";
pub const PANEL_PORT_ENV: &str = "CLOCKTOWER_PANEL_PORT";
pub const VARIANT_ENV: &str = "CLOCKTOWER_VARIANT";
pub const STATE_DIR_ENV: &str = "CLOCKTOWER_STATE_DIR";

// Older names still accepted
const LEGACY_TOKEN_ENV: &str = "PAT";
const LEGACY_DEVICES_ENV: &str = "DEVICE_IDS";

const DEFAULT_STATE_DIR: &str = ".clocktower";
const HISTORY_FILE: &str = "history.txt";

/// Load `.env.local`, then `.env`, from the working directory. Variables
/// already set in the environment win.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
}

/// Default state directory: `~/.clocktower`, or `.clocktower` when there is
/// no home directory.
pub fn default_state_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(DEFAULT_STATE_DIR))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
}

// ==================== Variant ====================

/// Named machine variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Eight phases, with panel configuration and the pre-reveal phase.
    #[default]
    Full,
    /// Six phases, without configuration and pre-reveal.
    Reduced,
}

impl Variant {
    pub fn options(&self) -> MachineOptions {
        match self {
            Variant::Full => MachineOptions::full(),
            Variant::Reduced => MachineOptions::reduced(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Full => "full",
            Variant::Reduced => "reduced",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => Ok(Variant::Full),
            "reduced" | "lite" => Ok(Variant::Reduced),
            other => Err(SessionError::Config(format!(
                "unknown variant '{}' (expected full or reduced)",
                other
            ))),
        }
    }
}

// ==================== Config ====================

/// Home Assistant connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeAssistantConfig {
    pub url: String,
    pub token: String,
    /// Media player entity used for playback and volume effects.
    pub media_player: Option<String>,
}

/// SmartThings room lights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmartThingsConfig {
    pub token: String,
    pub device_ids: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Everything needed to assemble a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClocktowerConfig {
    pub home_assistant: Option<HomeAssistantConfig>,
    pub smartthings: Option<SmartThingsConfig>,
    pub panel_port: Option<String>,
    pub variant: Variant,
    pub state_dir: PathBuf,
}

impl Default for ClocktowerConfig {
    fn default() -> Self {
        Self {
            home_assistant: None,
            smartthings: None,
            panel_port: None,
            variant: Variant::Full,
            state_dir: default_state_dir(),
        }
    }
}

impl ClocktowerConfig {
    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for malformed values.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration from a dotenv-style file only, ignoring the
    /// process environment.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` if the file cannot be parsed.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        let mut vars = HashMap::new();
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))?;
        for item in iter {
            let (key, value) =
                item.map_err(|e| SessionError::Config(format!("{}: {}", path.display(), e)))?;
            vars.insert(key, value);
        }
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Build configuration from any key lookup.
    ///
    /// Blank values count as unset. A service is configured only when all of
    /// its required values are present.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Config` for an unknown variant or a
    /// non-numeric timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let home_assistant = match (get(HA_URL_ENV), get(HA_TOKEN_ENV)) {
            (Some(url), Some(token)) => Some(HomeAssistantConfig {
                url,
                token,
                media_player: get(HA_MEDIA_PLAYER_ENV),
            }),
            _ => None,
        };

        let token = get(SMARTTHINGS_TOKEN_ENV).or_else(|| get(LEGACY_TOKEN_ENV));
        let devices = get(SMARTTHINGS_DEVICES_ENV).or_else(|| get(LEGACY_DEVICES_ENV));
        let timeout = match get(SMARTTHINGS_TIMEOUT_ENV) {
            Some(ms) => Some(Duration::from_millis(ms.trim().parse().map_err(|_| {
                SessionError::Config(format!("{} must be a number, got '{}'", SMARTTHINGS_TIMEOUT_ENV, ms))
            })?)),
            None => None,
        };
        let smartthings = match (token, devices) {
            (Some(token), Some(devices)) => {
                let device_ids: Vec<String> = devices
                    .split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect();
                (!device_ids.is_empty()).then_some(SmartThingsConfig {
                    token,
                    device_ids,
                    timeout,
                })
            }
            _ => None,
        };

        let variant = match get(VARIANT_ENV) {
            Some(v) => v.parse()?,
            None => Variant::Full,
        };

        let state_dir = get(STATE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(default_state_dir);

        let config = Self {
            home_assistant,
            smartthings,
            panel_port: get(PANEL_PORT_ENV),
            variant,
            state_dir,
        };
        debug!(
            home_assistant = config.home_assistant.is_some(),
            smartthings = config.smartthings.is_some(),
            panel_port = ?config.panel_port,
            variant = %config.variant,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Path of the REPL history file.
    pub fn history_path(&self) -> PathBuf {
        self.state_dir.join(HISTORY_FILE)
    }

    /// Create the state directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Io` if the directory cannot be created.
    pub fn ensure_state_dir(&self) -> Result<&Path> {
        fs::create_dir_all(&self.state_dir)?;
        Ok(&self.state_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_lookup_gives_defaults() {
        let config = ClocktowerConfig::from_lookup(|_| None).unwrap();
        assert!(config.home_assistant.is_none());
        assert!(config.smartthings.is_none());
        assert!(config.panel_port.is_none());
        assert_eq!(config.variant, Variant::Full);
        assert!(config.state_dir.ends_with(".clocktower"));
    }

    #[test]
    fn test_home_assistant_needs_url_and_token() {
        let config = ClocktowerConfig::from_lookup(lookup(&[(HA_URL_ENV, "http://ha:8123")])).unwrap();
        assert!(config.home_assistant.is_none());

        let config = ClocktowerConfig::from_lookup(lookup(&[
            (HA_URL_ENV, "http://ha:8123"),
            (HA_TOKEN_ENV, "abc"),
            (HA_MEDIA_PLAYER_ENV, "media_player.den"),
        ]))
        .unwrap();
        let ha = config.home_assistant.unwrap();
        assert_eq!(ha.token, "abc");
        assert_eq!(ha.media_player.as_deref(), Some("media_player.den"));
    }

    #[test]
    fn test_smartthings_legacy_names_and_device_list() {
        let config = ClocktowerConfig::from_lookup(lookup(&[
            ("PAT", "pat-token"),
            ("DEVICE_IDS", " a, b ,,c "),
            (SMARTTHINGS_TIMEOUT_ENV, "2500"),
        ]))
        .unwrap();
        let st = config.smartthings.unwrap();
        assert_eq!(st.token, "pat-token");
        assert_eq!(st.device_ids, vec!["a", "b", "c"]);
        assert_eq!(st.timeout, Some(Duration::from_millis(2500)));
    }

    #[test]
    fn test_blank_values_count_as_unset() {
        let config = ClocktowerConfig::from_lookup(lookup(&[
            (SMARTTHINGS_TOKEN_ENV, "t"),
            (SMARTTHINGS_DEVICES_ENV, " , "),
            (PANEL_PORT_ENV, "  "),
        ]))
        .unwrap();
        assert!(config.smartthings.is_none());
        assert!(config.panel_port.is_none());
    }

    #[test]
    fn test_bad_values_are_reported() {
        let err = ClocktowerConfig::from_lookup(lookup(&[(VARIANT_ENV, "deluxe")])).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));

        let err =
            ClocktowerConfig::from_lookup(lookup(&[(SMARTTHINGS_TIMEOUT_ENV, "soon")])).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_variant_parse() {
        assert_eq!("Reduced".parse::<Variant>().unwrap(), Variant::Reduced);
        assert_eq!("full".parse::<Variant>().unwrap(), Variant::Full);
        assert!(!Variant::Reduced.options().with_configuration);
    }

    #[test]
    fn test_from_env_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# panel").unwrap();
        writeln!(file, "CLOCKTOWER_PANEL_PORT=/dev/ttyACM0").unwrap();
        writeln!(file, "CLOCKTOWER_VARIANT=reduced").unwrap();
        writeln!(file, "HA_URL=http://ha.local:8123").unwrap();
        writeln!(file, "HA_TOKEN=\"quoted token\"").unwrap();

        let config = ClocktowerConfig::from_env_file(file.path()).unwrap();
        assert_eq!(config.panel_port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(config.variant, Variant::Reduced);
        assert_eq!(config.home_assistant.unwrap().token, "quoted token");
    }

    #[test]
    fn test_missing_env_file() {
        let dir = TempDir::new().unwrap();
        let err = ClocktowerConfig::from_env_file(&dir.path().join("nope.env")).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_state_dir_is_created() {
        let dir = TempDir::new().unwrap();
        let config = ClocktowerConfig {
            state_dir: dir.path().join("nested").join("state"),
            ..Default::default()
        };
        assert!(!config.state_dir.exists());
        config.ensure_state_dir().unwrap();
        assert!(config.state_dir.is_dir());
        assert_eq!(config.history_path(), config.state_dir.join("history.txt"));
    }
}
