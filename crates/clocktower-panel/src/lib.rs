//! Status panel driver for Clocktower.
//!
//! This crate owns the conversation with the hardware status panel, a
//! microcontroller reachable over a serial link:
//! - Write newline-terminated ASCII commands, optionally with `,<int>`
//! - Drain whatever the panel has printed after a fixed settle delay
//! - Track the highlighted player (the cursor) the same way the firmware does
//! - Drive the interactive sub-modes (configuration, kill, revive,
//!   nomination configuration, nomination voting)
//!
//! The protocol has no acknowledgement correlation: a command is written,
//! the session sleeps, and every buffered line is logged. Ordering between a
//! command and its response is assumed, never verified.
//!
//! # Example
//!
//! ```
//! use clocktower_panel::{MemoryLink, ModeAction, PanelSession, PanelSettings, PanelTiming};
//!
//! let link = MemoryLink::new();
//! let mut panel = PanelSession::new(
//!     Box::new(link.clone()),
//!     &PanelSettings::default(),
//!     PanelTiming::immediate(),
//! )
//! .unwrap();
//!
//! panel.begin_kill().unwrap();
//! panel.perform(ModeAction::NextPlayer).unwrap();
//! panel.perform(ModeAction::MarkCurrent).unwrap();
//! panel.perform(ModeAction::Cancel).unwrap();
//!
//! assert_eq!(link.written(), vec!["skill", "nplayer", "dead", "ekill"]);
//! assert_eq!(panel.cursor().index(), Some(1));
//! ```
//!
//! # Opening Real Hardware
//!
//! ```no_run
//! use clocktower_panel::{available_ports, PanelSession, PanelSettings, PanelTiming};
//!
//! for port in available_ports().unwrap() {
//!     println!("found {}", port);
//! }
//! let panel = PanelSession::open("/dev/ttyUSB0", &PanelSettings::default(), PanelTiming::default());
//! ```

pub mod command;
pub mod config;
pub mod cursor;
pub mod error;
pub mod link;
pub mod mode;
pub mod session;

pub use command::PanelCommand;
pub use config::{PanelSettings, PanelTiming};
pub use cursor::PlayerCursor;
pub use error::{PanelError, Result};
pub use link::{available_ports, MemoryLink, PanelLink, SerialLink};
pub use mode::{MenuChoice, MenuOption, ModeAction, PanelMode};
pub use session::PanelSession;
